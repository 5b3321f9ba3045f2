//! Input validation for dispatch simulations.
//!
//! Checks structural integrity of calls, stations, and vehicles before a
//! run. Detects:
//! - Duplicate IDs
//! - Station map keys that disagree with the station's own id
//! - Vehicles whose home station does not exist
//! - Calls that require no vehicle at all
//! - Negative or non-finite times and durations

use std::collections::{BTreeMap, HashSet};

use crate::models::{Call, Station, StationId, Vehicle};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A station is stored under a key different from its id.
    InconsistentId,
    /// A vehicle or allocation references a station that doesn't exist.
    InvalidStationReference,
    /// A call requires zero vehicles and could never be dispatched.
    EmptyRequirement,
    /// A time or duration is negative or not finite.
    InvalidDuration,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates the input data for a simulation run.
///
/// Checks:
/// 1. Station map keys match station ids
/// 2. No duplicate call IDs
/// 3. No duplicate vehicle IDs
/// 4. Every vehicle's home station exists
/// 5. Every call requires at least one vehicle
/// 6. Call arrival times are finite and durations are finite and non-negative
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    calls: &[Call],
    stations: &BTreeMap<StationId, Station>,
    vehicles: &[Vehicle],
) -> ValidationResult {
    let mut errors = Vec::new();

    for (&key, station) in stations {
        if key != station.id {
            errors.push(ValidationError::new(
                ValidationErrorKind::InconsistentId,
                format!("Station {} stored under key {}", station.id, key),
            ));
        }
    }

    let mut call_ids = HashSet::new();
    for call in calls {
        if !call_ids.insert(call.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate call ID: {}", call.id),
            ));
        }

        if call.total_need() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyRequirement,
                format!("Call {} requires no vehicles", call.id),
            ));
        }

        if !call.arrival_s.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Call {} has non-finite arrival time", call.id),
            ));
        }

        let durations = [
            ("dispatch delay", call.dispatch_delay_s),
            ("scene time", call.scene_time_s),
            ("hospital time", call.hospital_time_s),
            ("handover time", call.handover_time_s),
        ];
        for (label, value) in durations {
            if !value.is_finite() || value < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDuration,
                    format!("Call {} has invalid {label}: {value}", call.id),
                ));
            }
        }
    }

    let mut vehicle_ids = HashSet::new();
    for vehicle in vehicles {
        if !vehicle_ids.insert(vehicle.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate vehicle ID: {}", vehicle.id),
            ));
        }

        if !stations.contains_key(&vehicle.home_station) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidStationReference,
                format!(
                    "Vehicle {} references unknown station {}",
                    vehicle.id, vehicle.home_station
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GridCell;

    fn sample_stations() -> BTreeMap<StationId, Station> {
        [Station::new(0, (10, 10)), Station::new(1, (4, 4))]
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    }

    fn sample_calls() -> Vec<Call> {
        vec![
            Call::new(1, 0.0, GridCell::new(10, 12), GridCell::new(5, 5))
                .with_dispatch_delay(30.0)
                .with_scene_time(600.0),
            Call::new(2, 180.0, GridCell::new(3, 3), GridCell::new(5, 5)).with_need(0, 1),
        ]
    }

    fn sample_vehicles() -> Vec<Vehicle> {
        vec![
            Vehicle::ambulance(0, 0, GridCell::new(10, 10)),
            Vehicle::rapid_response(1, 1, GridCell::new(4, 4)),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_calls(), &sample_stations(), &sample_vehicles()).is_ok());
    }

    #[test]
    fn test_duplicate_call_id() {
        let mut calls = sample_calls();
        calls.push(calls[0].clone());

        let errors = validate_input(&calls, &sample_stations(), &sample_vehicles()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("call")));
    }

    #[test]
    fn test_duplicate_vehicle_id() {
        let vehicles = vec![
            Vehicle::ambulance(0, 0, GridCell::new(10, 10)),
            Vehicle::ambulance(0, 1, GridCell::new(4, 4)),
        ];

        let errors = validate_input(&sample_calls(), &sample_stations(), &vehicles).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("vehicle")));
    }

    #[test]
    fn test_invalid_station_reference() {
        let vehicles = vec![Vehicle::ambulance(0, 42, GridCell::new(0, 0))];

        let errors = validate_input(&sample_calls(), &sample_stations(), &vehicles).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidStationReference));
    }

    #[test]
    fn test_inconsistent_station_key() {
        let mut stations = sample_stations();
        stations.insert(7, Station::new(8, (1, 1)));

        let errors = validate_input(&sample_calls(), &stations, &sample_vehicles()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InconsistentId));
    }

    #[test]
    fn test_empty_requirement() {
        let calls = vec![Call::new(1, 0.0, GridCell::new(0, 0), GridCell::new(0, 0)).with_need(0, 0)];

        let errors = validate_input(&calls, &sample_stations(), &sample_vehicles()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyRequirement));
    }

    #[test]
    fn test_multiple_errors() {
        let calls = vec![Call::new(1, f64::NAN, GridCell::new(0, 0), GridCell::new(0, 0))
            .with_scene_time(-5.0)];
        let vehicles = vec![Vehicle::ambulance(0, 99, GridCell::new(0, 0))];

        let errors = validate_input(&calls, &sample_stations(), &vehicles).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
