// monitoring/mod.rs
pub mod crossing_log;
pub mod status_reporter;

pub use crossing_log::{write_crossing_log, CrossingRow, SimulationSummary};
pub use status_reporter::{render_status, StatusReporter};
