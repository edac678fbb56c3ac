// bridge/mod.rs
pub mod controller;
pub mod queue;
pub mod state;
pub mod vehicle;

pub use controller::{Admission, BridgeController, BridgeGuard};
pub use state::{BridgeSnapshot, BridgeState, LaneSnapshot, VehicleSummary};
pub use vehicle::{Direction, Lane, Vehicle, VehicleId, VehicleKind};
