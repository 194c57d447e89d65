//! Category/year aggregation.
//!
//! Responsibilities:
//!
//! - bucket normalized deals per calendar year
//! - break each year down by one configurable category extractor
//! - compute grand totals on an explicit, possibly wider basis
//!
//! One parameterized aggregation serves every chart (industry, canton, phase,
//! gender); per-chart behavior is only the extractor plus a color table.

pub mod aggregate;

pub use aggregate::*;
