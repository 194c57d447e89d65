//! Input/output helpers.
//!
//! - raw-record normalization + validation (`ingest`)
//! - year-row exports (CSV/HTML) (`export`, `html`)
//! - chart-data JSON read/write (`chart_data`)

pub mod chart_data;
pub mod export;
pub mod html;
pub mod ingest;

pub use chart_data::*;
pub use export::*;
pub use html::*;
pub use ingest::*;
