//! Concurrent admission control for a two-lane, weight-limited bridge.
//!
//! Vehicles arrive in batches, queue in strict FIFO order and cross while the
//! combined weight stays within the bridge capacity. See [`bridge`] for the
//! controller and [`simulation`] for the actors that drive it.

pub mod bridge;
pub mod config;
pub mod monitoring;
pub mod schedule;
pub mod simulation;
