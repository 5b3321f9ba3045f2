//! Dispatch policies.
//!
//! A policy decides which idle vehicles serve a call. It either commits
//! a full set of vehicles covering every requirement of the call, or
//! nothing; the simulation then queues the whole call.
//!
//! # Usage
//!
//! ```
//! use u_ems::dispatching::{DispatchContext, DispatchPolicy, NearestEta};
//! use u_ems::models::{Call, GridCell, Vehicle};
//! use u_ems::travel::LatticeTravelModel;
//!
//! let travel = LatticeTravelModel::new(20, 20, 2.0);
//! let vehicles = vec![
//!     Vehicle::ambulance(0, 0, GridCell::new(0, 0)),
//!     Vehicle::ambulance(1, 0, GridCell::new(5, 5)),
//! ];
//! let call = Call::new(1, 0.0, GridCell::new(6, 6), GridCell::new(0, 0));
//!
//! let context = DispatchContext::new(0.0, &travel);
//! assert_eq!(NearestEta.dispatch(&call, &vehicles, &context), Some(vec![1]));
//! ```

mod context;
mod nearest;

pub use context::DispatchContext;
pub use nearest::NearestEta;

use std::fmt::Debug;

use crate::models::{Call, Vehicle, VehicleId};

/// A dispatch policy.
///
/// # Contract
/// - Only vehicles with no current assignment may be selected.
/// - Returns `Some(ids)` only if every requirement of the call is met;
///   `ids` is in assignment order.
/// - Returns `None` otherwise. No partial assignment is ever returned.
/// - Must be deterministic for identical inputs.
pub trait DispatchPolicy: Send + Sync + Debug {
    /// Policy name (e.g., "NEAREST_ETA").
    fn name(&self) -> &'static str;

    /// Selects vehicles for `call`, or `None` if the call must wait.
    fn dispatch(
        &self,
        call: &Call,
        vehicles: &[Vehicle],
        context: &DispatchContext<'_>,
    ) -> Option<Vec<VehicleId>>;

    /// Policy description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
