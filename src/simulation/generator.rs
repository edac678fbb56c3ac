use crate::bridge::{Direction, Vehicle, VehicleId, VehicleKind};
use crate::config::CAR_PROBABILITY;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces vehicles with fresh ids and sampled direction and kind.
#[derive(Debug)]
pub struct VehicleGenerator {
    rng: StdRng,
    next_vehicle_id: u64,
}

impl VehicleGenerator {
    /// A fixed `seed` makes runs reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            next_vehicle_id: 0,
        }
    }

    /// Samples one vehicle; northbound with probability `northbound_probability`.
    pub fn next_vehicle(&mut self, northbound_probability: f64) -> Vehicle {
        let direction = if self.rng.random_bool(northbound_probability.clamp(0.0, 1.0)) {
            Direction::Northbound
        } else {
            Direction::Southbound
        };
        let kind = if self.rng.random_bool(CAR_PROBABILITY) {
            VehicleKind::Car
        } else {
            VehicleKind::Van
        };

        let vehicle = Vehicle::new(VehicleId(self.next_vehicle_id), kind, direction);
        self.next_vehicle_id += 1;
        vehicle
    }

    pub fn generated(&self) -> u64 {
        self.next_vehicle_id
    }
}
