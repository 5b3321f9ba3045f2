//! GA-based station placement and fleet allocation.
//!
//! A genotype encodes movable station coordinates, the ambulance share of
//! the fleet, and a home station for every vehicle. Fitness is the
//! survival objective of a full simulation run.
//!
//! # Encoding
//!
//! - **Stations**: a (row, col) gene pair per movable station
//! - **Fleet mix**: one ratio gene, absent when the mix is fixed
//! - **Slots**: one station-index gene per vehicle
//!
//! # Submodules
//!
//! - [`operators`]: Population seeding, tournament selection, elitism
//!
//! # Reference
//! - McCormack & Coates (2015), "A simulation model to enable the
//!   optimization of ambulance fleet allocation and base station location
//!   for increased patient survival"
//! - Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and
//!   Interval-Schemata"

mod chromosome;
mod codec;
mod config;
pub mod operators;
mod problem;
mod runner;

pub use chromosome::{
    blend_crossover, complement, random_genotype, reset_mutation, Genotype, BLEND_MAX,
};
pub use codec::{FleetMix, GridDims, Placement, PlacementCodec};
pub use config::GaConfig;
pub use problem::PlacementProblem;
pub use runner::{GaProblem, GaResult, GaRunner, GenerationStats};
