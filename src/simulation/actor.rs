use crate::bridge::{BridgeController, Lane, Vehicle};
use crate::simulation::clock::SimClock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What happened to one vehicle. Times are seconds since simulation start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingRecord {
    pub vehicle: Vehicle,
    pub lane: Lane,
    pub ticket: u64,
    pub admission_order: u64,
    pub arrived_at: f64,
    pub admitted_at: f64,
    pub departed_at: f64,
}

impl CrossingRecord {
    pub fn waiting_time(&self) -> f64 {
        self.admitted_at - self.arrived_at
    }
}

/// One vehicle's trip over the bridge, run as its own task.
pub struct VehicleActor {
    vehicle: Vehicle,
    controller: Arc<BridgeController>,
    clock: SimClock,
}

impl VehicleActor {
    pub fn new(vehicle: Vehicle, controller: Arc<BridgeController>, clock: SimClock) -> Self {
        Self {
            vehicle,
            controller,
            clock,
        }
    }

    /// Arrive, cross, leave. The lock is held throughout except while waiting
    /// to be admitted and while on the bridge.
    pub async fn run(self) -> CrossingRecord {
        let VehicleActor {
            mut vehicle,
            controller,
            clock,
        } = self;

        let mut bridge = controller.lock().await;

        let arrived_at = clock.elapsed_secs();
        println!("{:.2} {} arrived.", arrived_at, vehicle);
        let admission = bridge.arrive(&mut vehicle).await;
        let admitted_at = clock.elapsed_secs();

        println!(
            "{:.2} {} is now crossing the bridge in {} lane.",
            admitted_at, vehicle, admission.lane
        );
        bridge.cross(&vehicle).await;

        let departed_at = clock.elapsed_secs();
        println!("{:.2} {} has exited the bridge.", departed_at, vehicle);
        bridge.leave(&vehicle);
        drop(bridge);

        CrossingRecord {
            vehicle,
            lane: admission.lane,
            ticket: admission.ticket,
            admission_order: admission.order,
            arrived_at,
            admitted_at,
            departed_at,
        }
    }
}
