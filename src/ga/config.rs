//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EmsError, Result};

/// Genetic search parameters.
///
/// Affects only the search loop, never simulation semantics.
///
/// # Example
/// ```
/// use u_ems::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(16)
///     .with_max_generations(40)
///     .with_seed(123);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Number of generations after the initial population.
    pub max_generations: usize,
    /// Probability that an offspring pair is produced by crossover.
    pub crossover_rate: f64,
    /// Fraction of non-elite genes replaced each generation.
    pub mutation_rate: f64,
    /// Best individuals carried over unchanged.
    pub elite_count: usize,
    /// Individuals drawn per tournament.
    pub tournament_size: usize,
    /// Seed of the search's random generator.
    pub seed: u64,
    /// Evaluate individuals of a generation in parallel.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 25,
            max_generations: 180,
            crossover_rate: 0.85,
            mutation_rate: 0.04,
            elite_count: 1,
            tournament_size: 3,
            seed: 42,
            parallel: true,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation count.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks ranges before a run.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(EmsError::InvalidConfig(format!(
                "population size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.elite_count >= self.population_size {
            return Err(EmsError::InvalidConfig(format!(
                "elite count {} must be below population size {}",
                self.elite_count, self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(EmsError::InvalidConfig(
                "tournament size must be at least 1".into(),
            ));
        }
        for (name, rate) in [
            ("crossover rate", self.crossover_rate),
            ("mutation rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(EmsError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}
