//! Sampling chromosomes from a population.

use std::collections::BTreeMap;

use rand::distr::Uniform;
use rand::Rng;

use forrustts_core::Position;

use crate::error::SimulationError;
use crate::population::DiploidPopulation;
use crate::sfs::Sfs;

/// Neutral mutations found in a sample of chromosomes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    sample_size: u32,
    counts: BTreeMap<Position, u32>,
}

impl Sample {
    /// Number of chromosomes sampled.
    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    /// Number of sampled chromosomes carrying the mutation
    /// at each position.
    ///
    /// Includes mutations carried by every chromosome.
    pub fn counts(&self) -> &BTreeMap<Position, u32> {
        &self.counts
    }

    /// Number of sites with a derived count in `[1, sample_size)`.
    pub fn segregating_sites(&self) -> usize {
        self.counts
            .values()
            .filter(|&&c| c < self.sample_size)
            .count()
    }
}

fn validate_sample_size(pop: &DiploidPopulation, sample_size: u32) -> Result<(), SimulationError> {
    let available = pop.num_chromosomes();
    if sample_size < 2 || sample_size > available {
        Err(SimulationError::SampleSize {
            requested: sample_size,
            available,
        })
    } else {
        Ok(())
    }
}

/// Draw `sample_size` chromosomes, with replacement,
/// and count the neutral mutations they carry.
///
/// # Errors
///
/// [`SimulationError::SampleSize`] unless `2 <= sample_size <= 2N`.
pub fn sample_chromosomes<R: Rng + ?Sized>(
    rng: &mut R,
    pop: &DiploidPopulation,
    sample_size: u32,
) -> Result<Sample, SimulationError> {
    validate_sample_size(pop, sample_size)?;
    let chromosomes = Uniform::new(0, pop.num_chromosomes() as usize)
        .map_err(|e| SimulationError::domain("sample_size", e))?;
    let mut counts = BTreeMap::new();
    for _ in 0..sample_size {
        let chromosome = rng.sample(&chromosomes);
        let gamete = pop.chromosome(chromosome).ok_or(SimulationError::SampleSize {
            requested: sample_size,
            available: pop.num_chromosomes(),
        })?;
        for &k in gamete.mutations() {
            *counts.entry(pop.mutations()[k].position()).or_insert(0) += 1;
        }
    }
    Ok(Sample {
        sample_size,
        counts,
    })
}

/// Site-frequency spectrum of neutral mutations in a
/// sample of `sample_size` chromosomes.
///
/// # Errors
///
/// [`SimulationError::SampleSize`] unless `2 <= sample_size <= 2N`.
///
/// # Examples
///
/// ```
/// let mut rng = forrustts_sfs::Rng::new(101);
/// let pop = forrustts_sfs::evolve(&mut rng, 100, 100, 5.0, 5.0).unwrap();
/// let sfs = forrustts_sfs::sample_sfs(&mut rng, &pop, 10).unwrap();
/// assert_eq!(sfs.len(), 9);
/// assert!(forrustts_sfs::sample_sfs(&mut rng, &pop, 201).is_err());
/// ```
pub fn sample_sfs<R: Rng + ?Sized>(
    rng: &mut R,
    pop: &DiploidPopulation,
    sample_size: u32,
) -> Result<Sfs, SimulationError> {
    let sample = sample_chromosomes(rng, pop, sample_size)?;
    Ok(Sfs::from_sample(&sample))
}
