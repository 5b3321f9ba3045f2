//! Dispatch context passed to policies.

use crate::travel::TravelModel;

/// Runtime state a policy may consult.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Current simulation time (s).
    pub now_s: f64,
    /// Travel model for ETA estimates.
    pub travel: &'a dyn TravelModel,
}

impl<'a> DispatchContext<'a> {
    /// Creates a context at the given time.
    pub fn new(now_s: f64, travel: &'a dyn TravelModel) -> Self {
        Self { now_s, travel }
    }
}
