//! Station placement and fleet allocation as a GA problem.
//!
//! Each genotype is decoded by a [`PlacementCodec`], materialized into a
//! fleet of idle vehicles, and scored by a full simulation run. Fitness is
//! the [`SurvivalKpi::objective`].
//!
//! # Reference
//! McCormack & Coates (2015), "A simulation model to enable the
//! optimization of ambulance fleet allocation and base station location
//! for increased patient survival"

use std::sync::Arc;

use super::codec::{Placement, PlacementCodec};
use super::config::GaConfig;
use super::runner::{GaProblem, GaResult, GaRunner};
use crate::dispatching::{DispatchPolicy, NearestEta};
use crate::error::{EmsError, Result};
use crate::models::Call;
use crate::sim::{SimConfig, Simulation, SurvivalKpi};
use crate::travel::TravelModel;

/// GA problem: choose station locations and vehicle allocation to
/// maximize expected survival over a fixed call log.
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use u_ems::ga::{GaConfig, GridDims, PlacementCodec, PlacementProblem};
/// use u_ems::models::{Call, GridCell, PatientCategory, Station, StationId};
/// use u_ems::travel::LatticeTravelModel;
///
/// let stations: BTreeMap<StationId, Station> =
///     [(0, Station::new(0, (5, 5))), (1, Station::new(1, (2, 2)))]
///         .into_iter()
///         .collect();
/// let codec = PlacementCodec::new(stations, vec![1], GridDims::new(10, 10), 2).unwrap();
/// let calls = vec![Call::new(1, 100.0, GridCell::new(4, 4), GridCell::new(5, 5))
///     .with_category(PatientCategory::CategoryA)];
/// let travel = Arc::new(LatticeTravelModel::new(10, 10, 1.0));
///
/// let problem = PlacementProblem::new(calls, codec, travel, 0.0, 3600.0).unwrap();
/// let result = problem
///     .optimize(&GaConfig::default().with_population_size(6).with_max_generations(2))
///     .unwrap();
/// let plan = problem.decode_plan(&result.best_genotype).unwrap();
/// assert_eq!(plan.allocation.total(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PlacementProblem {
    calls: Vec<Call>,
    codec: PlacementCodec,
    travel: Arc<dyn TravelModel>,
    policy: Arc<dyn DispatchPolicy>,
    sim_config: SimConfig,
    start_s: f64,
    end_s: f64,
}

impl PlacementProblem {
    /// Creates a problem over the measured window `[start_s, end_s)`.
    ///
    /// Uses [`NearestEta`] dispatch and the default [`SimConfig`].
    ///
    /// # Errors
    /// [`EmsError::InvalidWindow`] if the window is empty or non-finite.
    pub fn new(
        calls: Vec<Call>,
        codec: PlacementCodec,
        travel: Arc<dyn TravelModel>,
        start_s: f64,
        end_s: f64,
    ) -> Result<Self> {
        let sim_config = SimConfig::default();
        if !(start_s.is_finite() && end_s.is_finite() && start_s < end_s) {
            return Err(EmsError::InvalidWindow {
                start: start_s,
                end: end_s,
                warmup: sim_config.warmup_buffer_s,
            });
        }
        Ok(Self {
            calls,
            codec,
            travel,
            policy: Arc::new(NearestEta),
            sim_config,
            start_s,
            end_s,
        })
    }

    /// Replaces the dispatch policy.
    pub fn with_policy(mut self, policy: Arc<dyn DispatchPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the simulation configuration.
    pub fn with_sim_config(mut self, config: SimConfig) -> Self {
        self.sim_config = config;
        self
    }

    /// The codec in use.
    pub fn codec(&self) -> &PlacementCodec {
        &self.codec
    }

    /// Decodes a genotype without simulating it.
    pub fn decode_plan(&self, genes: &[f64]) -> Result<Placement> {
        self.codec.decode(genes)
    }

    /// Simulates a decoded placement over the measured window.
    pub fn simulate_plan(&self, placement: &Placement) -> Result<SurvivalKpi> {
        let vehicles = placement.allocation.build_vehicles(&placement.stations)?;
        Simulation::new(
            &self.calls,
            placement.stations.clone(),
            vehicles,
            self.travel.as_ref(),
        )?
        .with_policy(self.policy.as_ref())
        .with_config(self.sim_config.clone())
        .run(self.start_s, self.end_s, self.sim_config.warmup_buffer_s)
    }

    /// Decodes and simulates a genotype, returning the full KPIs.
    pub fn evaluate_kpi(&self, genes: &[f64]) -> Result<SurvivalKpi> {
        let placement = self.decode_plan(genes)?;
        self.simulate_plan(&placement)
    }

    /// Runs the GA on this problem.
    pub fn optimize(&self, config: &GaConfig) -> Result<GaResult> {
        GaRunner::run(self, config)
    }
}

impl GaProblem for PlacementProblem {
    fn chromosome_len(&self) -> usize {
        self.codec.chromosome_len()
    }

    fn evaluate(&self, genes: &[f64]) -> Result<f64> {
        Ok(self.evaluate_kpi(genes)?.objective)
    }
}
