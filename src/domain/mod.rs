//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`Dimension`, `Metric`, `ChartMode`)
//! - the canton enumeration and lookups
//! - normalized deal records (`NormalizedDeal`)
//! - aggregation outputs (`YearRow`, `AggregatedSeries`, etc.)

pub mod types;

pub use types::*;
