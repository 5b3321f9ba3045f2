//! 8-neighbour lattice travel model.
//!
//! Distance counts diagonal steps at `√2 × cell` and straight steps at
//! `cell`. Speed comes from a minute-of-week profile when one is set,
//! otherwise from a flat default.

use serde::{Deserialize, Serialize};

use super::TravelModel;
use crate::models::{GridCell, VehicleClass};

/// Minutes in one week; length of a speed profile.
pub const MINUTES_PER_WEEK: usize = 7 * 24 * 60;

const MIN_PROFILE_SPEED_KMPH: f64 = 5.0;
const MIN_DIVISOR_SPEED_KMPH: f64 = 1e-6;

/// Lattice travel model over a `rows × cols` grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeTravelModel {
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Cell edge length (km).
    pub cell_km: f64,
    /// Speed used when no profile is set (km/h).
    pub default_speed_kmph: f64,
    /// Optional speed per minute of the week (km/h), [`MINUTES_PER_WEEK`] entries.
    pub minute_of_week_speeds: Option<Vec<f64>>,
}

impl LatticeTravelModel {
    /// Creates a model with a flat 45 km/h speed.
    pub fn new(rows: u32, cols: u32, cell_km: f64) -> Self {
        Self {
            rows,
            cols,
            cell_km,
            default_speed_kmph: 45.0,
            minute_of_week_speeds: None,
        }
    }

    /// Sets the flat speed.
    pub fn with_default_speed(mut self, kmph: f64) -> Self {
        self.default_speed_kmph = kmph;
        self
    }

    /// Sets a minute-of-week speed profile.
    ///
    /// Profiles of the wrong length are indexed modulo their length.
    pub fn with_speed_profile(mut self, speeds: Vec<f64>) -> Self {
        self.minute_of_week_speeds = Some(speeds);
        self
    }

    /// Speed (km/h) at `departure_s`.
    pub fn speed_kmph(&self, departure_s: f64, _class: VehicleClass) -> f64 {
        match &self.minute_of_week_speeds {
            Some(profile) if !profile.is_empty() => {
                let minute = (departure_s / 60.0).floor().rem_euclid(MINUTES_PER_WEEK as f64)
                    as usize
                    % profile.len();
                profile[minute].max(MIN_PROFILE_SPEED_KMPH)
            }
            _ => self.default_speed_kmph,
        }
    }
}

impl TravelModel for LatticeTravelModel {
    fn distance_km(&self, from: GridCell, to: GridCell) -> f64 {
        let dr = (from.row - to.row).unsigned_abs();
        let dc = (from.col - to.col).unsigned_abs();
        let diagonal = dr.min(dc) as f64;
        let straight = dr.abs_diff(dc) as f64;
        diagonal * self.cell_km * std::f64::consts::SQRT_2 + straight * self.cell_km
    }

    fn travel_time_s(
        &self,
        from: GridCell,
        to: GridCell,
        departure_s: f64,
        class: VehicleClass,
    ) -> f64 {
        let speed = self
            .speed_kmph(departure_s, class)
            .max(MIN_DIVISOR_SPEED_KMPH);
        self.distance_km(from, to) / speed * 3600.0
    }

    fn route(&self, from: GridCell, to: GridCell) -> Vec<GridCell> {
        let mut current = from;
        let mut path = vec![current];
        while current != to {
            current.row += (to.row - current.row).signum();
            current.col += (to.col - current.col).signum();
            path.push(current);
        }
        path
    }
}
