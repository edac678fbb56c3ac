use crate::bridge::queue::WaitQueue;
use crate::bridge::vehicle::{Direction, Lane, Vehicle, VehicleId, VehicleKind};
use crate::config::MAX_WEIGHT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shared bridge bookkeeping.
///
/// Lane counters are signed: positive values count northbound vehicles,
/// negative values count southbound vehicles.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BridgeState {
    pub weight_on_bridge: u32,
    pub lane_a: i32,
    pub lane_b: i32,
    pub waiting_north: usize,
    pub waiting_south: usize,
    pub is_open: bool,
    pub on_bridge: BTreeMap<VehicleId, Vehicle>,
    /// Highest weight ever observed on the bridge.
    pub peak_weight: u32,
}

impl BridgeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waiting_total(&self) -> usize {
        self.waiting_north + self.waiting_south
    }

    pub fn fits(&self, weight: u32) -> bool {
        self.weight_on_bridge + weight <= MAX_WEIGHT
    }

    pub fn lane_count(&self, lane: Lane) -> i32 {
        match lane {
            Lane::A => self.lane_a,
            Lane::B => self.lane_b,
        }
    }

    fn lane_count_mut(&mut self, lane: Lane) -> &mut i32 {
        match lane {
            Lane::A => &mut self.lane_a,
            Lane::B => &mut self.lane_b,
        }
    }

    pub fn add_waiting(&mut self, direction: Direction) {
        match direction {
            Direction::Northbound => self.waiting_north += 1,
            Direction::Southbound => self.waiting_south += 1,
        }
    }

    pub fn remove_waiting(&mut self, direction: Direction) {
        let counter = match direction {
            Direction::Northbound => &mut self.waiting_north,
            Direction::Southbound => &mut self.waiting_south,
        };
        debug_assert!(*counter > 0, "{direction} waiting counter underflow");
        *counter = counter.saturating_sub(1);
    }

    /// Picks the lane for a vehicle being admitted.
    ///
    /// A vehicle takes its direction's default lane unless the other lane has
    /// no traffic against it, is less loaded in the signed sense, and nobody is
    /// waiting to travel the other way.
    pub fn assign_lane(&self, direction: Direction) -> Lane {
        match direction {
            Direction::Southbound => {
                if self.lane_a <= 0 && self.lane_a > self.lane_b && self.waiting_north == 0 {
                    Lane::A
                } else {
                    Lane::B
                }
            }
            Direction::Northbound => {
                if self.lane_b >= 0 && self.lane_b < self.lane_a && self.waiting_south == 0 {
                    Lane::B
                } else {
                    Lane::A
                }
            }
        }
    }

    /// Puts an admitted vehicle on its lane.
    pub fn enter(&mut self, vehicle: Vehicle, lane: Lane) {
        *self.lane_count_mut(lane) += vehicle.direction.sign();
        self.weight_on_bridge += vehicle.weight();
        self.peak_weight = self.peak_weight.max(self.weight_on_bridge);
        self.on_bridge.insert(vehicle.id, Vehicle {
            lane: Some(lane),
            ..vehicle
        });
        debug_assert!(self.weight_on_bridge <= MAX_WEIGHT, "bridge overloaded");
    }

    /// Undoes [`BridgeState::enter`]. Returns the removed vehicle, or `None`
    /// when it was not on the bridge (counters untouched in that case).
    pub fn exit(&mut self, id: VehicleId) -> Option<Vehicle> {
        let vehicle = self.on_bridge.remove(&id)?;
        if let Some(lane) = vehicle.lane {
            *self.lane_count_mut(lane) -= vehicle.direction.sign();
        }
        self.weight_on_bridge -= vehicle.weight();
        Some(vehicle)
    }

    /// Copies the state and queue into a report-friendly snapshot.
    pub fn snapshot(&self, queue: &WaitQueue) -> BridgeSnapshot {
        let lane = |lane: Lane, flow: Direction| LaneSnapshot {
            occupancy: self.lane_count(lane),
            flow,
            vehicles: self
                .on_bridge
                .values()
                .filter(|vehicle| vehicle.lane == Some(lane))
                .map(VehicleSummary::from)
                .collect(),
        };
        let lane_a_flow = if self.lane_a >= 0 {
            Direction::Northbound
        } else {
            Direction::Southbound
        };
        let lane_b_flow = if self.lane_b <= 0 {
            Direction::Southbound
        } else {
            Direction::Northbound
        };

        BridgeSnapshot {
            lane_a: lane(Lane::A, lane_a_flow),
            lane_b: lane(Lane::B, lane_b_flow),
            waiting_north: queue
                .heading(Direction::Northbound)
                .map(VehicleSummary::from)
                .collect(),
            waiting_south: queue
                .heading(Direction::Southbound)
                .map(VehicleSummary::from)
                .collect(),
            weight_on_bridge: self.weight_on_bridge,
            peak_weight: self.peak_weight,
            is_open: self.is_open,
        }
    }
}

/// Identity of a vehicle as shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub kind: VehicleKind,
    pub id: VehicleId,
    pub direction: Direction,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            kind: vehicle.kind,
            id: vehicle.id,
            direction: vehicle.direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub occupancy: i32,
    pub flow: Direction,
    pub vehicles: Vec<VehicleSummary>,
}

/// Read-only copy of the bridge used by reporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSnapshot {
    pub lane_a: LaneSnapshot,
    pub lane_b: LaneSnapshot,
    pub waiting_north: Vec<VehicleSummary>,
    pub waiting_south: Vec<VehicleSummary>,
    pub weight_on_bridge: u32,
    pub peak_weight: u32,
    pub is_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn car(id: u64, direction: Direction) -> Vehicle {
        Vehicle::new(VehicleId(id), VehicleKind::Car, direction)
    }

    fn van(id: u64, direction: Direction) -> Vehicle {
        Vehicle::new(VehicleId(id), VehicleKind::Van, direction)
    }

    #[test]
    fn empty_bridge_uses_default_lanes() {
        let state = BridgeState::new();
        assert_eq!(state.assign_lane(Direction::Southbound), Lane::B);
        assert_eq!(state.assign_lane(Direction::Northbound), Lane::A);
    }

    #[test]
    fn southbound_diverts_when_lane_b_busier() {
        let mut state = BridgeState::new();
        state.enter(car(0, Direction::Southbound), Lane::B);
        assert_eq!(state.lane_b, -1);
        assert_eq!(state.assign_lane(Direction::Southbound), Lane::A);
    }

    #[test]
    fn southbound_stays_when_northbound_waiting() {
        let mut state = BridgeState::new();
        state.enter(car(0, Direction::Southbound), Lane::B);
        state.add_waiting(Direction::Northbound);
        assert_eq!(state.assign_lane(Direction::Southbound), Lane::B);
    }

    #[test]
    fn southbound_never_joins_northbound_flow() {
        let mut state = BridgeState::new();
        state.enter(car(0, Direction::Northbound), Lane::A);
        state.enter(car(1, Direction::Southbound), Lane::B);
        state.enter(car(2, Direction::Southbound), Lane::B);
        assert_eq!(state.assign_lane(Direction::Southbound), Lane::B);
    }

    #[test]
    fn equal_loads_do_not_divert() {
        let mut state = BridgeState::new();
        state.enter(car(0, Direction::Southbound), Lane::B);
        state.enter(car(1, Direction::Southbound), Lane::A);
        assert_eq!(state.lane_a, state.lane_b);
        assert_eq!(state.assign_lane(Direction::Southbound), Lane::B);
    }

    #[test]
    fn northbound_diverts_symmetrically() {
        let mut state = BridgeState::new();
        state.enter(car(0, Direction::Northbound), Lane::A);
        assert_eq!(state.assign_lane(Direction::Northbound), Lane::B);

        state.add_waiting(Direction::Southbound);
        assert_eq!(state.assign_lane(Direction::Northbound), Lane::A);
    }

    #[test]
    fn exit_undoes_enter() {
        let mut state = BridgeState::new();
        let before = state.clone();

        state.enter(van(4, Direction::Northbound), Lane::B);
        assert_eq!(state.weight_on_bridge, 300);
        assert_eq!(state.lane_b, 1);

        let left = state.exit(VehicleId(4)).unwrap();
        assert_eq!(left.lane, Some(Lane::B));
        assert_eq!(state.weight_on_bridge, 0);
        assert_eq!(state.lane_b, 0);
        assert!(state.on_bridge.is_empty());
        assert_eq!(
            BridgeState {
                peak_weight: 0,
                ..state
            },
            before
        );
    }

    #[test]
    fn exit_of_unknown_vehicle_changes_nothing() {
        let mut state = BridgeState::new();
        state.enter(car(1, Direction::Southbound), Lane::B);
        let before = state.clone();
        assert!(state.exit(VehicleId(99)).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn capacity_boundary() {
        let mut state = BridgeState::new();
        for id in 0..5 {
            state.enter(car(id, Direction::Southbound), Lane::B);
        }
        assert_eq!(state.weight_on_bridge, 1000);
        assert!(!state.fits(VehicleKind::Van.weight()));
        assert!(state.fits(VehicleKind::Car.weight()));

        state.exit(VehicleId(0));
        assert!(state.fits(VehicleKind::Van.weight()));
        assert_eq!(state.peak_weight, 1000);
    }

    #[test]
    fn snapshot_lists_lanes_and_waiting() {
        let mut state = BridgeState::new();
        let mut queue = WaitQueue::new();
        state.enter(car(0, Direction::Southbound), Lane::B);
        state.enter(van(1, Direction::Southbound), Lane::A);
        for vehicle in [car(2, Direction::Northbound), van(3, Direction::Southbound)] {
            state.add_waiting(vehicle.direction);
            queue.push_back(vehicle, Arc::new(Notify::new()));
        }

        let snapshot = state.snapshot(&queue);
        assert_eq!(snapshot.lane_a.occupancy, -1);
        assert_eq!(snapshot.lane_a.flow, Direction::Southbound);
        assert_eq!(snapshot.lane_a.vehicles[0].id, VehicleId(1));
        assert_eq!(snapshot.lane_b.flow, Direction::Southbound);
        assert_eq!(snapshot.waiting_north.len(), 1);
        assert_eq!(snapshot.waiting_south[0].id, VehicleId(3));
        assert_eq!(snapshot.weight_on_bridge, 500);
    }
}
