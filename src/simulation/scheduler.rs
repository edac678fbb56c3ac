use crate::bridge::{BridgeController, Vehicle};
use crate::schedule::Batch;
use crate::simulation::actor::{CrossingRecord, VehicleActor};
use crate::simulation::clock::SimClock;
use crate::simulation::generator::VehicleGenerator;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Releases batches of vehicles onto the bridge.
///
/// Each batch is registered in full while the bridge is closed, so all of
/// its vehicles are queued before any of them can be admitted.
pub struct GroupScheduler {
    controller: Arc<BridgeController>,
    generator: VehicleGenerator,
    clock: SimClock,
    actors: Vec<JoinHandle<CrossingRecord>>,
}

impl GroupScheduler {
    pub fn new(controller: Arc<BridgeController>, generator: VehicleGenerator, clock: SimClock) -> Self {
        Self {
            controller,
            generator,
            clock,
            actors: Vec::new(),
        }
    }

    /// Generates one batch and releases it. Does not wait for the
    /// inter-batch delay.
    pub async fn dispatch(&mut self, batch: &Batch) {
        let vehicles: Vec<Vehicle> = (0..batch.count)
            .map(|_| self.generator.next_vehicle(batch.northbound_probability))
            .collect();
        self.release(vehicles).await;
    }

    /// Spawns an actor per vehicle with the bridge closed and opens it once
    /// every one of them is queued.
    pub async fn release(&mut self, vehicles: Vec<Vehicle>) {
        let mut bridge = self.controller.lock().await;
        bridge.close();
        let already_waiting = bridge.state().waiting_total();
        let count = vehicles.len();

        for vehicle in vehicles {
            let actor = VehicleActor::new(vehicle, Arc::clone(&self.controller), self.clock);
            self.actors.push(tokio::spawn(actor.run()));
        }

        bridge.await_registrations(already_waiting + count).await;
        log::debug!(
            "batch of {} registered ({} were already waiting)",
            count,
            already_waiting
        );
        bridge.open();
    }

    /// Runs every batch in order, then waits for all vehicles to finish.
    pub async fn run(mut self, schedule: &[Batch]) -> Vec<CrossingRecord> {
        for batch in schedule {
            self.dispatch(batch).await;
            sleep(Duration::from_secs(batch.delay_secs)).await;
        }
        self.finish().await
    }

    /// Joins every spawned vehicle. Records come back in spawn order;
    /// vehicles whose task failed are logged and left out.
    pub async fn finish(self) -> Vec<CrossingRecord> {
        let mut records = Vec::with_capacity(self.actors.len());
        for actor in self.actors {
            match actor.await {
                Ok(record) => records.push(record),
                Err(e) => log::error!("vehicle task failed: {}", e),
            }
        }
        records
    }
}
