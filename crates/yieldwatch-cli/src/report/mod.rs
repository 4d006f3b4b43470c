//! Report sinks that render engine results for the command line.

pub mod console;
pub mod json;

pub use console::ConsoleReport;
pub use json::JsonReport;

use yieldwatch::ReadingSeries;

/// Space-separated quantities, e.g. `18 20 22`.
pub(crate) fn format_series(series: &ReadingSeries) -> String {
    series
        .iter()
        .map(|r| r.quantity.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
