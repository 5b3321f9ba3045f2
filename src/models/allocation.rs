//! Per-station fleet allocation.
//!
//! The boundary format between the placement codec and the simulation:
//! station id → vehicle counts per class.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Station, StationId, Vehicle, VehicleClass, VehicleId};
use crate::error::{EmsError, Result};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Vehicle counts for one station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetCounts {
    /// Number of ambulances.
    pub ambulances: u32,
    /// Number of rapid-response cars.
    pub rapid_response: u32,
}

impl FleetCounts {
    /// Creates a count record.
    pub fn new(ambulances: u32, rapid_response: u32) -> Self {
        Self {
            ambulances,
            rapid_response,
        }
    }

    /// Total vehicles.
    pub fn total(&self) -> u32 {
        self.ambulances + self.rapid_response
    }

    /// Count for a vehicle class.
    pub fn of(&self, class: VehicleClass) -> u32 {
        match class {
            VehicleClass::Ambulance => self.ambulances,
            VehicleClass::RapidResponse => self.rapid_response,
        }
    }
}

/// Fleet allocation across stations.
///
/// Ordered by station id so that vehicle materialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Station id → counts.
    pub stations: BTreeMap<StationId, FleetCounts>,
}

impl Allocation {
    /// Creates an empty allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocation with zero counts for each given station.
    pub fn empty_for<I: IntoIterator<Item = StationId>>(station_ids: I) -> Self {
        Self {
            stations: station_ids
                .into_iter()
                .map(|id| (id, FleetCounts::default()))
                .collect(),
        }
    }

    /// Sets the counts for a station.
    pub fn with_station(mut self, station: StationId, counts: FleetCounts) -> Self {
        self.stations.insert(station, counts);
        self
    }

    /// Adds one vehicle of `class` to `station`.
    pub fn add(&mut self, station: StationId, class: VehicleClass) {
        let counts = self.stations.entry(station).or_default();
        match class {
            VehicleClass::Ambulance => counts.ambulances += 1,
            VehicleClass::RapidResponse => counts.rapid_response += 1,
        }
    }

    /// Counts for a station (zero if absent).
    pub fn counts(&self, station: StationId) -> FleetCounts {
        self.stations.get(&station).copied().unwrap_or_default()
    }

    /// Total vehicles of a class across all stations.
    pub fn total_of(&self, class: VehicleClass) -> u32 {
        self.stations.values().map(|c| c.of(class)).sum()
    }

    /// Total vehicles across all stations.
    pub fn total(&self) -> u32 {
        self.stations.values().map(FleetCounts::total).sum()
    }

    /// Materializes idle vehicles at their home stations.
    ///
    /// Ids are assigned sequentially from 0, station by station in
    /// ascending id order, ambulances before rapid-response cars.
    ///
    /// # Errors
    /// Fails if the allocation names a station missing from `stations`.
    pub fn build_vehicles(&self, stations: &BTreeMap<StationId, Station>) -> Result<Vec<Vehicle>> {
        let mut vehicles = Vec::with_capacity(self.total() as usize);
        let mut next_id: VehicleId = 0;

        for (&station_id, counts) in &self.stations {
            let station = stations.get(&station_id).ok_or_else(|| {
                EmsError::Validation(vec![ValidationError::new(
                    ValidationErrorKind::InvalidStationReference,
                    format!("Allocation references unknown station {station_id}"),
                )])
            })?;

            let classes = std::iter::repeat(VehicleClass::Ambulance)
                .take(counts.ambulances as usize)
                .chain(
                    std::iter::repeat(VehicleClass::RapidResponse)
                        .take(counts.rapid_response as usize),
                );
            for class in classes {
                vehicles.push(Vehicle::new(next_id, class, station_id, station.location));
                next_id += 1;
            }
        }

        Ok(vehicles)
    }
}
