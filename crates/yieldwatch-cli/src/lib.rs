//! Yieldwatch CLI — simulated herd readings, reports, and the interactive
//! REPL around the yieldwatch operations engine.

pub mod config;
pub mod pipeline;
pub mod repl;
pub mod report;
pub mod sensor;

pub use config::{load_config, resolve_config_path, SimulationConfig};
pub use pipeline::{execute, Operation, RunSummary};
pub use report::{ConsoleReport, JsonReport};
pub use sensor::{build_herd, SensorSimulator};
