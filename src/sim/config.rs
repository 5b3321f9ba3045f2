//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EmsError, Result};

/// Tunables for a simulation run.
///
/// These do not change dispatch semantics; they control movement
/// granularity and the default warm-up length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Period (s) between location updates of a travelling vehicle.
    pub location_update_period_s: f64,
    /// Warm-up length (s) before the measured window.
    pub warmup_buffer_s: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            location_update_period_s: 120.0,
            warmup_buffer_s: 90.0 * 60.0,
        }
    }
}

impl SimConfig {
    /// Sets the location update period.
    pub fn with_location_update_period(mut self, seconds: f64) -> Self {
        self.location_update_period_s = seconds;
        self
    }

    /// Sets the warm-up buffer.
    pub fn with_warmup_buffer(mut self, seconds: f64) -> Self {
        self.warmup_buffer_s = seconds;
        self
    }

    /// Rejects non-positive tick periods and negative warm-up buffers.
    pub fn validate(&self) -> Result<()> {
        if !(self.location_update_period_s.is_finite() && self.location_update_period_s > 0.0) {
            return Err(EmsError::InvalidConfig(format!(
                "location update period must be positive, got {}",
                self.location_update_period_s
            )));
        }
        if !(self.warmup_buffer_s.is_finite() && self.warmup_buffer_s >= 0.0) {
            return Err(EmsError::InvalidConfig(format!(
                "warm-up buffer must be non-negative, got {}",
                self.warmup_buffer_s
            )));
        }
        Ok(())
    }
}
