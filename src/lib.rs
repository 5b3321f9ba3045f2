//! Emergency medical dispatch simulation with GA-based station placement
//! and fleet allocation.
//!
//! Simulates ambulances and rapid-response vehicles serving a log of
//! emergency calls on a grid region, scores a configuration by the expected
//! survival of time-critical patients, and searches station locations and
//! vehicle allocations with a real-coded genetic algorithm.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Call`, `Station`, `Vehicle`, `Allocation`
//! - **`travel`**: `TravelModel` trait and the 8-neighbour `LatticeTravelModel`
//! - **`dispatching`**: `DispatchPolicy` trait and the `NearestEta` policy
//! - **`sim`**: Event queue, discrete-event engine, survival KPIs
//! - **`ga`**: Genotype codec, GA runner, `PlacementProblem`
//! - **`validation`**: Input integrity checks (duplicate IDs, station refs, durations)
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use u_ems::models::{Allocation, Call, FleetCounts, GridCell, Station, StationId};
//! use u_ems::sim::simulate;
//! use u_ems::travel::LatticeTravelModel;
//!
//! let stations: BTreeMap<StationId, Station> =
//!     [(0, Station::new(0, (5, 5)))].into_iter().collect();
//! let vehicles = Allocation::new()
//!     .with_station(0, FleetCounts::new(1, 0))
//!     .build_vehicles(&stations)
//!     .unwrap();
//! let calls = vec![Call::new(1, 60.0, GridCell::new(5, 6), GridCell::new(5, 5))];
//! let travel = LatticeTravelModel::new(10, 10, 1.0);
//!
//! let kpi = simulate(&calls, stations, vehicles, &travel, 0.0, 3600.0, 0.0).unwrap();
//! assert_eq!(kpi.served_calls, 1);
//! ```
//!
//! # References
//!
//! - McCormack & Coates (2015), "A simulation model to enable the
//!   optimization of ambulance fleet allocation and base station location
//!   for increased patient survival"
//! - De Maio et al. (2003), "Optimal defibrillation response intervals for
//!   maximum out-of-hospital cardiac arrest survival rates"

pub mod dispatching;
pub mod error;
pub mod ga;
pub mod models;
pub mod sim;
pub mod travel;
pub mod validation;

pub use error::{EmsError, Result};
