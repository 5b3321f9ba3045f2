//! Discrete-event dispatch simulation and survival KPIs.
//!
//! # Engine
//!
//! [`Simulation`] processes calls, scene departures, job completions, and
//! location updates in `(time, insertion order)` order from an
//! [`EventQueue`]. A run is a pure function of its inputs: no random source
//! is consulted and same-instant events are handled first-in first-out.
//!
//! # KPI
//!
//! [`SurvivalKpi`] turns recorded response times into the weighted
//! expected-survival objective used as GA fitness.

mod config;
mod engine;
mod event;
mod kpi;

pub use config::SimConfig;
pub use engine::{simulate, Simulation};
pub use event::{Event, EventKind, EventQueue};
pub use kpi::{
    cardiac_survival, category_a_survival, survival, SurvivalKpi, CATEGORY_A_THRESHOLD_S,
};
