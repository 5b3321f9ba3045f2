//! Call (incident) model.
//!
//! A call is a service request with a scene location, a hospital
//! destination, timing parameters, and vehicle requirements.

use serde::{Deserialize, Serialize};

use super::{CallId, GridCell};

/// Patient category, used to select a survival function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PatientCategory {
    /// Cardiac arrest (logistic survival curve).
    Cardiac,
    /// Life-threatening, non-cardiac (8-minute step survival).
    CategoryA,
    /// Non-urgent. Not tracked by the objective.
    #[default]
    CategoryC,
}

impl PatientCategory {
    /// Whether calls of this category contribute to the objective.
    pub fn is_tracked(self) -> bool {
        !matches!(self, PatientCategory::CategoryC)
    }
}

/// An incoming emergency call.
///
/// # Time Representation
/// `arrival_s` is an absolute time on the run's clock. All other time
/// fields are durations in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    /// Unique call identifier.
    pub id: CallId,
    /// Time the call was received.
    pub arrival_s: f64,
    /// Delay between call receipt and vehicle departure.
    pub dispatch_delay_s: f64,
    /// Treatment time on scene.
    pub scene_time_s: f64,
    /// Time spent at hospital. Zero means no transport.
    pub hospital_time_s: f64,
    /// Patient handover time at hospital.
    pub handover_time_s: f64,
    /// Required number of ambulances.
    pub need_ambulances: u32,
    /// Required number of rapid-response cars.
    pub need_rapid_response: u32,
    /// Patient category.
    pub category: PatientCategory,
    /// Scene location.
    pub scene: GridCell,
    /// Destination hospital.
    pub hospital: GridCell,
}

impl Call {
    /// Creates a call needing one ambulance, with zero delays and durations.
    pub fn new(id: CallId, arrival_s: f64, scene: GridCell, hospital: GridCell) -> Self {
        Self {
            id,
            arrival_s,
            dispatch_delay_s: 0.0,
            scene_time_s: 0.0,
            hospital_time_s: 0.0,
            handover_time_s: 0.0,
            need_ambulances: 1,
            need_rapid_response: 0,
            category: PatientCategory::default(),
            scene,
            hospital,
        }
    }

    /// Sets the dispatch delay.
    pub fn with_dispatch_delay(mut self, seconds: f64) -> Self {
        self.dispatch_delay_s = seconds;
        self
    }

    /// Sets the on-scene treatment time.
    pub fn with_scene_time(mut self, seconds: f64) -> Self {
        self.scene_time_s = seconds;
        self
    }

    /// Sets the hospital time.
    pub fn with_hospital_time(mut self, seconds: f64) -> Self {
        self.hospital_time_s = seconds;
        self
    }

    /// Sets the handover time.
    pub fn with_handover_time(mut self, seconds: f64) -> Self {
        self.handover_time_s = seconds;
        self
    }

    /// Sets the vehicle requirements.
    pub fn with_need(mut self, ambulances: u32, rapid_response: u32) -> Self {
        self.need_ambulances = ambulances;
        self.need_rapid_response = rapid_response;
        self
    }

    /// Sets the patient category.
    pub fn with_category(mut self, category: PatientCategory) -> Self {
        self.category = category;
        self
    }

    /// Whether the call ends with a hospital transport.
    ///
    /// Requires an ambulance and a positive hospital time.
    pub fn needs_transport(&self) -> bool {
        self.need_ambulances > 0 && self.hospital_time_s > 0.0
    }

    /// Total number of vehicles required.
    pub fn total_need(&self) -> u32 {
        self.need_ambulances + self.need_rapid_response
    }
}
