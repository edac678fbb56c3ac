use crate::bridge::{BridgeController, BridgeSnapshot, Direction, VehicleSummary};
use crate::config::ReportFormat;
use crate::simulation::SimClock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// A snapshot stamped with the simulation time it was taken at.
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub elapsed_secs: f64,
    pub bridge: &'a BridgeSnapshot,
}

/// Prints the bridge state after crossings, coalescing bursts of changes.
pub struct StatusReporter {
    controller: Arc<BridgeController>,
    clock: SimClock,
    debounce: Duration,
    format: ReportFormat,
}

impl StatusReporter {
    pub fn new(
        controller: Arc<BridgeController>,
        clock: SimClock,
        debounce: Duration,
        format: ReportFormat,
    ) -> Self {
        Self {
            controller,
            clock,
            debounce,
            format,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Waits for a report request, lets the burst settle, then prints one
    /// snapshot. Runs until the task is aborted.
    pub async fn run(self) {
        loop {
            self.controller.report_requested().await;
            sleep(self.debounce).await;
            let snapshot = self.controller.take_report().await;
            if let Some(text) = render_status(self.format, self.clock.elapsed_secs(), &snapshot) {
                println!("{}", text);
            }
        }
    }
}

/// Formats one status report. Returns `None` if JSON encoding fails.
pub fn render_status(format: ReportFormat, elapsed_secs: f64, snapshot: &BridgeSnapshot) -> Option<String> {
    match format {
        ReportFormat::Text => Some(render_text(elapsed_secs, snapshot)),
        ReportFormat::Json => {
            let report = StatusReport {
                elapsed_secs,
                bridge: snapshot,
            };
            match serde_json::to_string(&report) {
                Ok(json) => Some(json),
                Err(e) => {
                    log::error!("failed to serialize status report: {}", e);
                    None
                }
            }
        }
    }
}

fn render_text(elapsed_secs: f64, snapshot: &BridgeSnapshot) -> String {
    format!(
        "\n{:.2} Bridge status: Lane A (north default) - flow: {}: [{}] Lane B (south default) - flow: {}: [{}]\n\tWaiting Northbound: [{}] Waiting Southbound: [{}]\n",
        elapsed_secs,
        flow_name(snapshot.lane_a.flow),
        list(&snapshot.lane_a.vehicles),
        flow_name(snapshot.lane_b.flow),
        list(&snapshot.lane_b.vehicles),
        list(&snapshot.waiting_north),
        list(&snapshot.waiting_south),
    )
}

fn flow_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Northbound => "northbound",
        Direction::Southbound => "southbound",
    }
}

fn list(vehicles: &[VehicleSummary]) -> String {
    vehicles
        .iter()
        .map(|v| format!("{} #{} ({})", v.kind, v.id, v.direction))
        .collect::<Vec<_>>()
        .join(" ")
}
