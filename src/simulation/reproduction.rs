//! Generation building: founding populations and bred offspring.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::genome::{Genome, Sex};

/// Creates a founding population of independent random genomes.
///
/// # Arguments
///
/// * `count` - Number of genomes to draw
/// * `rng` - Random number generator
pub fn found_generation<R: Rng>(count: usize, rng: &mut R) -> Vec<Genome> {
    (0..count).map(|_| Genome::random(rng)).collect()
}

/// Breeds the next generation from a list of parents.
///
/// Parents are split by sex and each side is shuffled. Females and males are
/// then paired one-to-one, so `min(females, males)` pairs breed and the
/// surplus of the larger side goes unpaired. Every pair produces a uniform
/// number of offspring in `[min_offspring, max_offspring]`.
///
/// # Arguments
///
/// * `parents` - Genomes of the fish that reached the spawning grounds
/// * `min_offspring` - Lower bound of offspring per pair, inclusive
/// * `max_offspring` - Upper bound of offspring per pair, inclusive
/// * `rng` - Random number generator
///
/// # Returns
///
/// The offspring genomes. Empty when no pair can be formed.
pub fn breed_generation<R: Rng>(
    parents: &[Genome],
    min_offspring: usize,
    max_offspring: usize,
    rng: &mut R,
) -> Vec<Genome> {
    let (mut females, mut males): (Vec<&Genome>, Vec<&Genome>) = parents
        .iter()
        .partition(|genome| genome.sex() == Sex::Female);

    females.shuffle(rng);
    males.shuffle(rng);

    let mut offspring = Vec::new();
    for (mother, father) in females.iter().zip(males.iter()) {
        let count = if min_offspring >= max_offspring {
            min_offspring
        } else {
            rng.random_range(min_offspring..=max_offspring)
        };
        offspring.extend((0..count).map(|_| Genome::cross(mother, father, rng)));
    }

    debug!(
        females = females.len(),
        males = males.len(),
        offspring = offspring.len(),
        "bred generation"
    );
    offspring
}
