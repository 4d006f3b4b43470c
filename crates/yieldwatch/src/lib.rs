//! Yieldwatch — operations engine for per-subject reading series: stable
//! ordering, contiguous pattern search, and classification by mean.

mod aggregate;
pub mod engine;
pub mod pattern;
pub mod report;
pub mod sorting;
pub mod types;

pub use aggregate::mean;
pub use engine::OperationsEngine;
pub use pattern::{contains_pattern, find_pattern};
pub use report::{NullSink, ReportSink, TracingSink};
pub use sorting::{merge_sort, merge_sort_by_key};
pub use types::*;
