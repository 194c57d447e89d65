//! Terminal chart rendering (plain text).

pub mod ascii;

pub use ascii::*;
