//! Real-valued genotype and gene-level operators.
//!
//! # Encoding
//!
//! A genotype is a flat `Vec<f64>` with every gene in `[0, 1]`.
//! [`PlacementCodec`](super::PlacementCodec) gives the genes meaning.
//!
//! # Operators
//! - [`blend_crossover`]: uniform gene swap followed by an extrapolating
//!   blend on half of the positions
//! - [`reset_mutation`]: replaces randomly chosen genes with fresh uniform values
//!
//! # Reference
//! Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and
//! Interval-Schemata"

use rand::seq::index;
use rand::Rng;

/// Flat real-valued chromosome.
pub type Genotype = Vec<f64>;

/// Upper bound of the blend factor β. Values above 1 extrapolate past
/// the other parent.
pub const BLEND_MAX: f64 = 1.1;

/// Creates a genotype of `len` uniform genes in `[0, 1)`.
pub fn random_genotype<R: Rng>(len: usize, rng: &mut R) -> Genotype {
    (0..len).map(|_| rng.random::<f64>()).collect()
}

/// Mirrors every gene: `g → 1 − g`.
pub fn complement(genes: &[f64]) -> Genotype {
    genes.iter().map(|g| 1.0 - g).collect()
}

/// Blend crossover producing two children.
///
/// 1. Each position is swapped between the children with probability ½.
/// 2. `max(1, len/2)` distinct positions are drawn and blended with one
///    shared β ∈ [0, [`BLEND_MAX`]]:
///    `c1 ← c1 + β(c2 − c1)`, `c2 ← c2 + β(c1 − c2)`.
/// 3. All genes are clamped to `[0, 1]`.
///
/// Parents must have equal length.
pub fn blend_crossover<R: Rng>(p1: &[f64], p2: &[f64], rng: &mut R) -> (Genotype, Genotype) {
    debug_assert_eq!(p1.len(), p2.len());
    let mut c1 = p1.to_vec();
    let mut c2 = p2.to_vec();
    let len = c1.len().min(c2.len());
    if len == 0 {
        return (c1, c2);
    }

    for i in 0..len {
        if rng.random_bool(0.5) {
            std::mem::swap(&mut c1[i], &mut c2[i]);
        }
    }

    let beta = rng.random_range(0.0..=BLEND_MAX);
    for i in index::sample(rng, len, (len / 2).max(1)) {
        let (g1, g2) = (c1[i], c2[i]);
        c1[i] = g1 + beta * (g2 - g1);
        c2[i] = g2 + beta * (g1 - g2);
    }

    clamp_unit(&mut c1);
    clamp_unit(&mut c2);
    (c1, c2)
}

/// Random-reset mutation over a group of genotypes.
///
/// Replaces `round(rate × genotypes × len)` randomly chosen genes with
/// fresh uniform values, ties rounding to even. Positions are drawn with
/// replacement.
///
/// Returns the number of resets performed.
pub fn reset_mutation<R: Rng>(genotypes: &mut [Genotype], rate: f64, rng: &mut R) -> usize {
    let Some(len) = genotypes.first().map(Vec::len) else {
        return 0;
    };
    if len == 0 {
        return 0;
    }
    let resets = (rate * genotypes.len() as f64 * len as f64).round_ties_even() as usize;
    for _ in 0..resets {
        let who = rng.random_range(0..genotypes.len());
        let pos = rng.random_range(0..len);
        genotypes[who][pos] = rng.random::<f64>();
    }
    resets
}

fn clamp_unit(genes: &mut [f64]) {
    for g in genes {
        *g = g.clamp(0.0, 1.0);
    }
}
