//! Population-level operators: seeding, selection, elitism.
//!
//! # Usage
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use u_ems::ga::operators::{initial_population, tournament_select};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let population = initial_population(6, 4, &mut rng);
//! assert_eq!(population.len(), 6);
//!
//! let fitness = [0.1, 0.9, 0.3, 0.2, 0.5, 0.4];
//! let winner = tournament_select(&fitness, 6, &mut rng);
//! assert!(winner < 6);
//! ```

use rand::Rng;

use super::chromosome::{complement, random_genotype, Genotype};

/// Builds the initial population.
///
/// The first half is uniform random, the second half holds their
/// complements (`1 − g`), and an odd remainder is filled randomly.
pub fn initial_population<R: Rng>(size: usize, len: usize, rng: &mut R) -> Vec<Genotype> {
    let half = size / 2;
    let mut population: Vec<Genotype> = (0..half).map(|_| random_genotype(len, rng)).collect();
    let mirrored: Vec<Genotype> = population.iter().map(|g| complement(g)).collect();
    population.extend(mirrored);
    while population.len() < size {
        population.push(random_genotype(len, rng));
    }
    population
}

/// Tournament selection (maximization).
///
/// Draws `size` indices with replacement and returns the fittest. On ties
/// the earliest draw wins.
///
/// # Panics
/// Panics if `fitness` is empty.
pub fn tournament_select<R: Rng>(fitness: &[f64], size: usize, rng: &mut R) -> usize {
    let mut best = rng.random_range(0..fitness.len());
    for _ in 1..size {
        let candidate = rng.random_range(0..fitness.len());
        if fitness[candidate] > fitness[best] {
            best = candidate;
        }
    }
    best
}

/// Indices of the `count` fittest individuals, best first.
///
/// Equal fitness keeps population order.
pub fn elite_indices(fitness: &[f64], count: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..fitness.len()).collect();
    ranked.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
    ranked.truncate(count);
    ranked
}
