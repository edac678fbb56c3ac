use crate::bridge::vehicle::{Direction, Vehicle, VehicleId};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// A queued vehicle together with the handle used to wake it.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub vehicle: Vehicle,
    pub wake: Arc<Notify>,
}

/// Vehicles waiting to cross, in arrival order.
#[derive(Debug, Default)]
pub struct WaitQueue {
    entries: VecDeque<QueueEntry>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vehicle at the tail. A vehicle may be queued only once.
    pub fn push_back(&mut self, vehicle: Vehicle, wake: Arc<Notify>) {
        debug_assert!(
            !self.contains(vehicle.id),
            "vehicle {} queued twice",
            vehicle.id
        );
        self.entries.push_back(QueueEntry { vehicle, wake });
    }

    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    pub fn head(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    pub fn is_head(&self, id: VehicleId) -> bool {
        self.head().is_some_and(|entry| entry.vehicle.id == id)
    }

    /// Wakes the current head so it re-evaluates admission.
    pub fn wake_head(&self) {
        if let Some(entry) = self.head() {
            entry.wake.notify_one();
        }
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.entries.iter().any(|entry| entry.vehicle.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.entries.iter().map(|entry| &entry.vehicle)
    }

    /// Queued vehicles heading in `direction`, in queue order.
    pub fn heading(&self, direction: Direction) -> impl Iterator<Item = &Vehicle> {
        self.iter().filter(move |vehicle| vehicle.direction == direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::vehicle::VehicleKind;

    fn vehicle(id: u64, direction: Direction) -> Vehicle {
        Vehicle::new(VehicleId(id), VehicleKind::Car, direction)
    }

    #[test]
    fn preserves_arrival_order() {
        let mut queue = WaitQueue::new();
        for id in 0..4 {
            queue.push_back(vehicle(id, Direction::Northbound), Arc::new(Notify::new()));
        }

        assert!(queue.is_head(VehicleId(0)));
        let popped: Vec<u64> = std::iter::from_fn(|| queue.pop_front())
            .map(|entry| entry.vehicle.id.0)
            .collect();
        assert_eq!(popped, vec![0, 1, 2, 3]);
        assert!(queue.is_empty());
        assert!(!queue.is_head(VehicleId(0)));
    }

    #[test]
    fn filters_by_direction_in_queue_order() {
        let mut queue = WaitQueue::new();
        queue.push_back(vehicle(0, Direction::Southbound), Arc::new(Notify::new()));
        queue.push_back(vehicle(1, Direction::Northbound), Arc::new(Notify::new()));
        queue.push_back(vehicle(2, Direction::Southbound), Arc::new(Notify::new()));

        let south: Vec<u64> = queue.heading(Direction::Southbound).map(|v| v.id.0).collect();
        assert_eq!(south, vec![0, 2]);
        assert_eq!(queue.heading(Direction::Northbound).count(), 1);
        assert_eq!(queue.len(), 3);
    }

    #[tokio::test]
    async fn wake_head_targets_only_the_head() {
        let mut queue = WaitQueue::new();
        let first = Arc::new(Notify::new());
        let second = Arc::new(Notify::new());
        queue.push_back(vehicle(0, Direction::Northbound), Arc::clone(&first));
        queue.push_back(vehicle(1, Direction::Northbound), Arc::clone(&second));

        queue.wake_head();

        // The head holds a stored permit, the second entry does not.
        first.notified().await;
        let second_woken = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            second.notified(),
        )
        .await;
        assert!(second_woken.is_err());
    }
}
