//! Vehicle model.
//!
//! Vehicles are the dispatchable units. Each carries an explicit status
//! tag instead of loose busy/assigned flags, so "busy" and "assigned to
//! a call" can never disagree.
//!
//! # State Machine
//!
//! ```text
//! Idle ──dispatch──▶ Responding(call) ──scene departure──▶ Returning
//!                          │                                   ▲
//!                          └─transport──▶ Transporting(call) ──┘ job complete
//! Returning ──dispatch──▶ Responding(call)
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{CallId, GridCell, StationId, VehicleId};

/// Vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    /// Transport-capable ambulance.
    Ambulance,
    /// Rapid-response car. Cannot transport patients.
    RapidResponse,
}

impl VehicleClass {
    /// Whether this class can carry a patient to hospital.
    pub fn can_transport(self) -> bool {
        matches!(self, VehicleClass::Ambulance)
    }
}

/// Lifecycle state of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Available at base.
    #[default]
    Idle,
    /// Available, travelling back to its home station.
    Returning,
    /// Assigned to a call: travelling to or working at the scene.
    Responding(CallId),
    /// Carrying the patient of a call to hospital, or handing over there.
    Transporting(CallId),
}

impl VehicleStatus {
    /// The call this status is bound to, if any.
    pub fn call(self) -> Option<CallId> {
        match self {
            VehicleStatus::Responding(call) | VehicleStatus::Transporting(call) => Some(call),
            VehicleStatus::Idle | VehicleStatus::Returning => None,
        }
    }
}

/// A dispatchable vehicle and its mutable run state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique vehicle identifier.
    pub id: VehicleId,
    /// Vehicle class.
    pub class: VehicleClass,
    /// Home station.
    pub home_station: StationId,
    /// Current location.
    pub location: GridCell,
    /// Lifecycle state.
    pub status: VehicleStatus,
    /// Remaining waypoints of the current leg; the front is the current cell.
    pub route: VecDeque<GridCell>,
    /// Counter of travel legs started; stale location ticks carry an older value.
    pub leg: u64,
}

impl Vehicle {
    /// Creates an idle vehicle located at `location`.
    pub fn new(
        id: VehicleId,
        class: VehicleClass,
        home_station: StationId,
        location: GridCell,
    ) -> Self {
        Self {
            id,
            class,
            home_station,
            location,
            status: VehicleStatus::Idle,
            route: VecDeque::new(),
            leg: 0,
        }
    }

    /// Creates an idle ambulance.
    pub fn ambulance(id: VehicleId, home_station: StationId, location: GridCell) -> Self {
        Self::new(id, VehicleClass::Ambulance, home_station, location)
    }

    /// Creates an idle rapid-response car.
    pub fn rapid_response(id: VehicleId, home_station: StationId, location: GridCell) -> Self {
        Self::new(id, VehicleClass::RapidResponse, home_station, location)
    }

    /// Busy iff bound to exactly one call.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.status.call().is_some()
    }

    /// The call this vehicle is assigned to.
    #[inline]
    pub fn assigned_call(&self) -> Option<CallId> {
        self.status.call()
    }

    /// Whether a travel leg is in progress.
    pub fn is_travelling(&self) -> bool {
        self.route.len() > 1
    }
}
