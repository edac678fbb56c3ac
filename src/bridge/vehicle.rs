use crate::config::{CAR_WEIGHT, VAN_WEIGHT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, monotonically assigned vehicle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Different types of vehicles crossing the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Car,
    Van,
}

impl VehicleKind {
    pub fn weight(self) -> u32 {
        match self {
            VehicleKind::Car => CAR_WEIGHT,
            VehicleKind::Van => VAN_WEIGHT,
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VehicleKind::Car => write!(f, "Car"),
            VehicleKind::Van => write!(f, "Van"),
        }
    }
}

/// Travel direction over the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Southbound,
    Northbound,
}

impl Direction {
    /// Contribution of one vehicle to a signed lane counter.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Northbound => 1,
            Direction::Southbound => -1,
        }
    }

    /// The lane this direction uses when no diversion happens.
    pub fn default_lane(self) -> Lane {
        match self {
            Direction::Northbound => Lane::A,
            Direction::Southbound => Lane::B,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Southbound => write!(f, "Southbound"),
            Direction::Northbound => write!(f, "Northbound"),
        }
    }
}

/// The two bridge lanes. Lane A defaults to northbound flow, lane B to southbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    A,
    B,
}

impl Lane {
    pub fn default_direction(self) -> Direction {
        match self {
            Lane::A => Direction::Northbound,
            Lane::B => Direction::Southbound,
        }
    }
}

impl fmt::Display for Lane {
    // Named after the direction the lane serves by default.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lane::A => write!(f, "northbound"),
            Lane::B => write!(f, "southbound"),
        }
    }
}

/// A single crossing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub direction: Direction,
    /// Unset until the vehicle is admitted, then fixed for the crossing.
    pub lane: Option<Lane>,
}

impl Vehicle {
    pub fn new(id: VehicleId, kind: VehicleKind, direction: Direction) -> Self {
        Self {
            id,
            kind,
            direction,
            lane: None,
        }
    }

    pub fn weight(&self) -> u32 {
        self.kind.weight()
    }

    /// True once admitted to the lane its direction does not use by default.
    pub fn is_diverted(&self) -> bool {
        self.lane
            .is_some_and(|lane| lane != self.direction.default_lane())
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} #{} ({})", self.kind, self.id, self.direction)
    }
}
