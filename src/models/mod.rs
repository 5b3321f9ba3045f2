//! Dispatch domain models.
//!
//! Provides the entity records the simulation reads and mutates:
//! incoming calls, stations, vehicles, and the per-station fleet
//! allocation produced by the placement codec.
//!
//! # Lifecycle
//!
//! | Type | Mutability | Owner |
//! |------|-----------|-------|
//! | Call | Immutable once created | Caller (borrowed by a run) |
//! | Station | Immutable within a run | Run (replaced per candidate) |
//! | Vehicle | Mutable state | Run (rebuilt per candidate) |
//! | Allocation | Derived | Codec output |
//!
//! # Time Representation
//! All times and durations are in seconds on a caller-defined monotonic
//! clock (e.g., epoch seconds).

mod allocation;
mod call;
mod station;
mod vehicle;

pub use allocation::{Allocation, FleetCounts};
pub use call::{Call, PatientCategory};
pub use station::{GridCell, Station};
pub use vehicle::{Vehicle, VehicleClass, VehicleStatus};

/// Call identifier.
pub type CallId = u32;
/// Station identifier.
pub type StationId = u32;
/// Vehicle identifier.
pub type VehicleId = u32;
