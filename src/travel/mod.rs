//! Travel-time model.
//!
//! The simulation consumes travel estimates through [`TravelModel`] and
//! tolerates any non-negative, monotone implementation. A lattice model
//! with an optional minute-of-week speed profile is provided.
//!
//! # Usage
//!
//! ```
//! use u_ems::models::{GridCell, VehicleClass};
//! use u_ems::travel::{LatticeTravelModel, TravelModel};
//!
//! let travel = LatticeTravelModel::new(26, 22, 2.0).with_default_speed(60.0);
//! let eta = travel.travel_time_s(
//!     GridCell::new(10, 10),
//!     GridCell::new(10, 12),
//!     0.0,
//!     VehicleClass::Ambulance,
//! );
//! assert!((eta - 240.0).abs() < 1e-9);
//! ```

mod lattice;

pub use lattice::LatticeTravelModel;

use std::fmt::Debug;

use crate::models::{GridCell, VehicleClass};

/// Distance, ETA, and route primitives used by dispatch and movement.
///
/// Implementations must be pure: the same inputs always yield the same
/// outputs, so that a simulation run is deterministic.
pub trait TravelModel: Send + Sync + Debug {
    /// Road distance between two cells (km).
    fn distance_km(&self, from: GridCell, to: GridCell) -> f64;

    /// Travel time (s) for a vehicle of `class` departing at `departure_s`.
    fn travel_time_s(
        &self,
        from: GridCell,
        to: GridCell,
        departure_s: f64,
        class: VehicleClass,
    ) -> f64;

    /// Ordered waypoints from `from` to `to`, including both endpoints.
    fn route(&self, from: GridCell, to: GridCell) -> Vec<GridCell>;
}
