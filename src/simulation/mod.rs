// simulation/mod.rs
pub mod actor;
pub mod clock;
pub mod generator;
pub mod scheduler;

pub use actor::{CrossingRecord, VehicleActor};
pub use clock::SimClock;
pub use generator::VehicleGenerator;
pub use scheduler::GroupScheduler;
