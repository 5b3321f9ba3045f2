//! Generational GA loop.
//!
//! # Algorithm
//!
//! 1. Seed the population ([`initial_population`]) and evaluate it.
//! 2. Each generation:
//!    - copy the `elite_count` fittest individuals unchanged
//!    - fill the rest with tournament-selected parents, recombined by
//!      [`blend_crossover`] with probability `crossover_rate`, else cloned
//!    - apply [`reset_mutation`] to non-elite individuals only
//!    - evaluate, optionally in parallel
//! 3. Track the best individual seen; it only changes on strict improvement.
//!
//! Fitness is maximized. For a fixed seed and a deterministic problem the
//! result is identical whether evaluation runs in parallel or not.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::chromosome::{blend_crossover, reset_mutation, Genotype};
use super::config::GaConfig;
use super::operators::{elite_indices, initial_population, tournament_select};
use crate::error::{EmsError, Result};

/// An optimization problem over real-valued genotypes.
///
/// Evaluation must be free of side effects so that individuals can be
/// scored concurrently.
pub trait GaProblem: Sync {
    /// Number of genes per genotype.
    fn chromosome_len(&self) -> usize;

    /// Fitness of a genotype. Higher is better.
    fn evaluate(&self, genes: &[f64]) -> Result<f64>;
}

/// Fitness summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number; 0 is the initial population.
    pub generation: usize,
    /// Best fitness in this generation.
    pub best: f64,
    /// Mean fitness in this generation.
    pub mean: f64,
    /// Best fitness seen so far.
    pub best_so_far: f64,
}

/// Outcome of a GA run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaResult {
    /// Best genotype found.
    pub best_genotype: Genotype,
    /// Its fitness.
    pub best_fitness: f64,
    /// Generations run after the initial population.
    pub generations: usize,
    /// Per-generation statistics, starting with generation 0.
    pub history: Vec<GenerationStats>,
}

/// Runs the generational GA.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA on `problem`.
    ///
    /// # Errors
    /// - [`EmsError::InvalidConfig`] if `config` is invalid or the problem
    ///   has no genes.
    /// - Any error returned by [`GaProblem::evaluate`].
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult> {
        config.validate()?;
        let len = problem.chromosome_len();
        if len == 0 {
            return Err(EmsError::InvalidConfig("chromosome length is zero".into()));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut population = initial_population(config.population_size, len, &mut rng);
        let mut fitness = evaluate_population(problem, &population, config.parallel)?;

        let first = elite_indices(&fitness, 1)[0];
        let mut best_genotype = population[first].clone();
        let mut best_fitness = fitness[first];
        let mut history = vec![GenerationStats::new(0, &fitness, best_fitness)];

        for generation in 1..=config.max_generations {
            population = breed(&population, &fitness, config, &mut rng);
            fitness = evaluate_population(problem, &population, config.parallel)?;

            let top = elite_indices(&fitness, 1)[0];
            if fitness[top] > best_fitness {
                best_fitness = fitness[top];
                best_genotype = population[top].clone();
            }

            let stats = GenerationStats::new(generation, &fitness, best_fitness);
            debug!(
                "generation {generation}: best {:.6}, mean {:.6}, best so far {:.6}",
                stats.best, stats.mean, stats.best_so_far
            );
            history.push(stats);
        }

        info!(
            "GA finished after {} generations: best fitness {best_fitness:.6}",
            config.max_generations
        );

        Ok(GaResult {
            best_genotype,
            best_fitness,
            generations: config.max_generations,
            history,
        })
    }
}

impl GenerationStats {
    fn new(generation: usize, fitness: &[f64], best_so_far: f64) -> Self {
        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = fitness.iter().sum::<f64>() / fitness.len().max(1) as f64;
        Self {
            generation,
            best,
            mean,
            best_so_far,
        }
    }
}

/// Produces the next generation: elites first, unchanged, then offspring.
fn breed<R: Rng>(
    population: &[Genotype],
    fitness: &[f64],
    config: &GaConfig,
    rng: &mut R,
) -> Vec<Genotype> {
    let size = config.population_size;
    let elite = config.elite_count.min(size);
    let mut next: Vec<Genotype> = elite_indices(fitness, elite)
        .into_iter()
        .map(|i| population[i].clone())
        .collect();

    while next.len() < size {
        if rng.random::<f64>() < config.crossover_rate {
            let a = tournament_select(fitness, config.tournament_size, rng);
            let b = tournament_select(fitness, config.tournament_size, rng);
            let (c1, c2) = blend_crossover(&population[a], &population[b], rng);
            next.push(c1);
            if next.len() < size {
                next.push(c2);
            }
        } else {
            let a = tournament_select(fitness, config.tournament_size, rng);
            next.push(population[a].clone());
        }
    }

    reset_mutation(&mut next[elite..], config.mutation_rate, rng);
    next
}

/// Scores a population, keeping population order.
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &[Genotype],
    parallel: bool,
) -> Result<Vec<f64>> {
    if parallel {
        population.par_iter().map(|g| problem.evaluate(g)).collect()
    } else {
        population.iter().map(|g| problem.evaluate(g)).collect()
    }
}
