//! Bridge admission controller.
//!
//! All bridge bookkeeping lives behind one async mutex. A caller takes the
//! lock with [`BridgeController::lock`] and runs the crossing protocol on the
//! returned [`BridgeGuard`]; the guard gives the lock up only while it is
//! suspended (waiting for admission, crossing, or waiting for a batch to
//! register) and takes it back before returning.

use crate::bridge::queue::WaitQueue;
use crate::bridge::state::{BridgeSnapshot, BridgeState};
use crate::bridge::vehicle::{Lane, Vehicle};
use crate::config::CROSSING_DURATION;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, OwnedMutexGuard};
use tokio::time::sleep;

/// Everything protected by the bridge lock.
#[derive(Debug, Default)]
pub struct Bridge {
    pub state: BridgeState,
    pub queue: WaitQueue,
    next_ticket: u64,
    next_admission: u64,
}

impl Bridge {
    fn admits(&self, vehicle: &Vehicle) -> bool {
        self.state.is_open && self.queue.is_head(vehicle.id) && self.state.fits(vehicle.weight())
    }
}

/// Outcome of a successful `arrive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub lane: Lane,
    /// Position in arrival order across the whole run.
    pub ticket: u64,
    /// Position in admission order across the whole run.
    pub order: u64,
}

pub struct BridgeController {
    bridge: Arc<Mutex<Bridge>>,
    registered: Notify,
    report_requested: Notify,
    report_pending: AtomicBool,
    crossing_duration: Duration,
}

impl Default for BridgeController {
    fn default() -> Self {
        Self::new(CROSSING_DURATION)
    }
}

impl BridgeController {
    /// Creates a closed, empty bridge.
    pub fn new(crossing_duration: Duration) -> Self {
        Self {
            bridge: Arc::new(Mutex::new(Bridge::default())),
            registered: Notify::new(),
            report_requested: Notify::new(),
            report_pending: AtomicBool::new(false),
            crossing_duration,
        }
    }

    pub fn crossing_duration(&self) -> Duration {
        self.crossing_duration
    }

    /// Acquires the bridge lock.
    pub async fn lock(self: &Arc<Self>) -> BridgeGuard {
        let guard = Arc::clone(&self.bridge).lock_owned().await;
        BridgeGuard {
            controller: Arc::clone(self),
            guard: Some(guard),
        }
    }

    pub async fn snapshot(&self) -> BridgeSnapshot {
        let bridge = self.bridge.lock().await;
        bridge.state.snapshot(&bridge.queue)
    }

    /// Resolves once a status report has been requested.
    pub async fn report_requested(&self) {
        self.report_requested.notified().await;
    }

    /// Snapshot for a pending report. Clears the pending flag under the lock
    /// so the next crossing schedules a fresh report.
    pub async fn take_report(&self) -> BridgeSnapshot {
        let bridge = self.bridge.lock().await;
        self.report_pending.store(false, Ordering::Release);
        bridge.state.snapshot(&bridge.queue)
    }

    fn request_report(&self) {
        if !self.report_pending.swap(true, Ordering::AcqRel) {
            self.report_requested.notify_one();
        }
    }
}

/// The held bridge lock plus the protocol operations that need it.
pub struct BridgeGuard {
    controller: Arc<BridgeController>,
    guard: Option<OwnedMutexGuard<Bridge>>,
}

impl BridgeGuard {
    const HELD: &'static str = "bridge lock is only released inside suspension points";

    fn bridge(&mut self) -> &mut Bridge {
        self.guard.as_deref_mut().expect(Self::HELD)
    }

    fn locked(&self) -> &Bridge {
        self.guard.as_deref().expect(Self::HELD)
    }

    /// Read access to the locked state.
    pub fn state(&self) -> &BridgeState {
        &self.locked().state
    }

    pub fn queue(&self) -> &WaitQueue {
        &self.locked().queue
    }

    /// Releases the lock until `notify` fires, then reacquires it.
    async fn suspend(&mut self, notify: &Notify) {
        let notified = notify.notified();
        tokio::pin!(notified);
        // Register before unlocking so a signal sent in between is kept.
        notified.as_mut().enable();
        self.guard = None;
        notified.await;
        self.relock().await;
    }

    /// Releases the lock for `duration`, then reacquires it.
    async fn release_for(&mut self, duration: Duration) {
        self.guard = None;
        sleep(duration).await;
        self.relock().await;
    }

    async fn relock(&mut self) {
        let guard = Arc::clone(&self.controller.bridge).lock_owned().await;
        self.guard = Some(guard);
    }

    /// Queues `vehicle` and waits until it may cross.
    ///
    /// Admission requires the vehicle to be at the head of the queue, the
    /// bridge to be open and enough spare capacity for its weight. The lane is
    /// chosen at the moment of admission and stored on the vehicle.
    pub async fn arrive(&mut self, vehicle: &mut Vehicle) -> Admission {
        let wake = Arc::new(Notify::new());
        let ticket = {
            let bridge = self.bridge();
            bridge.queue.push_back(*vehicle, Arc::clone(&wake));
            bridge.state.add_waiting(vehicle.direction);
            let ticket = bridge.next_ticket;
            bridge.next_ticket += 1;
            ticket
        };
        self.controller.registered.notify_one();
        log::trace!("vehicle {} queued with ticket {}", vehicle.id, ticket);

        while !self.bridge().admits(vehicle) {
            self.suspend(&wake).await;
        }

        let bridge = self.bridge();
        let lane = bridge.state.assign_lane(vehicle.direction);
        let order = bridge.next_admission;
        bridge.next_admission += 1;
        vehicle.lane = Some(lane);

        if vehicle.is_diverted() {
            log::debug!(
                "vehicle {} diverted to lane {:?} (lane A = {}, lane B = {})",
                vehicle.id,
                lane,
                bridge.state.lane_a,
                bridge.state.lane_b
            );
        }
        log::debug!(
            "vehicle {} admitted #{} at weight {}",
            vehicle.id,
            order,
            bridge.state.weight_on_bridge
        );

        Admission {
            lane,
            ticket,
            order,
        }
    }

    /// Moves the admitted head onto the bridge and holds the lock released
    /// for the crossing duration.
    pub async fn cross(&mut self, vehicle: &Vehicle) {
        let Some(lane) = vehicle.lane else {
            log::error!("vehicle {} tried to cross without being admitted", vehicle.id);
            debug_assert!(false, "cross called before arrive for vehicle {}", vehicle.id);
            return;
        };

        let bridge = self.bridge();
        if !bridge.queue.is_head(vehicle.id) {
            log::error!("vehicle {} tried to cross out of turn", vehicle.id);
            debug_assert!(false, "vehicle {} is not the queue head", vehicle.id);
            return;
        }
        bridge.queue.pop_front();
        bridge.state.remove_waiting(vehicle.direction);
        bridge.queue.wake_head();
        bridge.state.enter(*vehicle, lane);

        self.controller.request_report();
        let duration = self.controller.crossing_duration;
        self.release_for(duration).await;
    }

    /// Takes `vehicle` off the bridge and lets the queue head re-check.
    pub fn leave(&mut self, vehicle: &Vehicle) {
        let bridge = self.bridge();
        if bridge.state.exit(vehicle.id).is_none() {
            log::error!("vehicle {} left without being on the bridge", vehicle.id);
            debug_assert!(false, "vehicle {} is not on the bridge", vehicle.id);
            return;
        }
        bridge.queue.wake_head();
    }

    /// Closes the gate; queued vehicles stay queued.
    pub fn close(&mut self) {
        self.bridge().state.is_open = false;
        log::debug!("bridge closed");
    }

    /// Opens the gate and wakes the queue head.
    pub fn open(&mut self) {
        let bridge = self.bridge();
        bridge.state.is_open = true;
        bridge.queue.wake_head();
        log::debug!("bridge opened with {} waiting", bridge.state.waiting_total());
    }

    /// Waits until at least `target` vehicles are queued.
    pub async fn await_registrations(&mut self, target: usize) {
        let controller = Arc::clone(&self.controller);
        while self.state().waiting_total() < target {
            self.suspend(&controller.registered).await;
        }
        log::trace!("{} vehicles registered", target);
    }
}
