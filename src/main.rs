use std::process::ExitCode;

fn main() -> ExitCode {
    #[cfg(feature = "telemetry")]
    vc_pulse::init_telemetry();

    match vc_pulse::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
