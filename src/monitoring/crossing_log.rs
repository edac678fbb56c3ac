use crate::bridge::{Direction, Lane, VehicleId, VehicleKind};
use crate::simulation::CrossingRecord;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Flat CSV row for one crossed vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingRow {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub direction: Direction,
    pub lane: Lane,
    pub diverted: bool,
    pub ticket: u64,
    pub admission_order: u64,
    pub arrived_at: f64,
    pub admitted_at: f64,
    pub departed_at: f64,
    pub waiting_secs: f64,
}

impl From<&CrossingRecord> for CrossingRow {
    fn from(record: &CrossingRecord) -> Self {
        Self {
            id: record.vehicle.id,
            kind: record.vehicle.kind,
            direction: record.vehicle.direction,
            lane: record.lane,
            diverted: record.lane != record.vehicle.direction.default_lane(),
            ticket: record.ticket,
            admission_order: record.admission_order,
            arrived_at: record.arrived_at,
            admitted_at: record.admitted_at,
            departed_at: record.departed_at,
            waiting_secs: record.waiting_time(),
        }
    }
}

/// Writes one CSV row per record, in admission order.
pub fn write_crossing_log<P: AsRef<Path>>(path: P, records: &[CrossingRecord]) -> Result<(), Box<dyn Error>> {
    let mut rows: Vec<CrossingRow> = records.iter().map(CrossingRow::from).collect();
    rows.sort_by_key(|row| row.admission_order);

    let mut wtr = csv::Writer::from_path(path)?;
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// End-of-run statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub vehicles: usize,
    pub cars: usize,
    pub vans: usize,
    pub northbound: usize,
    pub southbound: usize,
    pub diverted: usize,
    pub average_wait_secs: f64,
    pub max_wait_secs: f64,
    pub peak_weight: u32,
}

impl SimulationSummary {
    pub fn from_records(records: &[CrossingRecord], peak_weight: u32) -> Self {
        let waits: Vec<f64> = records.iter().map(CrossingRecord::waiting_time).collect();
        let average_wait_secs = if waits.is_empty() {
            0.0
        } else {
            waits.iter().sum::<f64>() / waits.len() as f64
        };

        Self {
            vehicles: records.len(),
            cars: count_where(records, |r| r.vehicle.kind == VehicleKind::Car),
            vans: count_where(records, |r| r.vehicle.kind == VehicleKind::Van),
            northbound: count_where(records, |r| r.vehicle.direction == Direction::Northbound),
            southbound: count_where(records, |r| r.vehicle.direction == Direction::Southbound),
            diverted: count_where(records, |r| r.lane != r.vehicle.direction.default_lane()),
            average_wait_secs,
            max_wait_secs: waits.iter().copied().fold(0.0, f64::max),
            peak_weight,
        }
    }
}

fn count_where(records: &[CrossingRecord], pred: impl Fn(&CrossingRecord) -> bool) -> usize {
    records.iter().filter(|r| pred(r)).count()
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Simulation finished: {} vehicles crossed ({} cars, {} vans; {} northbound, {} southbound), {} diverted. \
             Average wait {:.2}s, longest wait {:.2}s, peak load {}.",
            self.vehicles,
            self.cars,
            self.vans,
            self.northbound,
            self.southbound,
            self.diverted,
            self.average_wait_secs,
            self.max_wait_secs,
            self.peak_weight
        )
    }
}
