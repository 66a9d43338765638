//! Independent replicates and the mean site-frequency spectrum.

use forrustts_rng::Rng;

use crate::error::SimulationError;
use crate::population::DiploidPopulation;
use crate::sampling;
use crate::sfs::{MeanSfs, Sfs, SfsAccumulator};
use crate::wright_fisher::{self, SimulationParams, SocialParams};

/// An evolved population and the spectrum
/// of the sample taken from it.
#[derive(Clone, Debug)]
pub struct Replicate<P> {
    population: P,
    sfs: Sfs,
}

impl<P> Replicate<P> {
    pub fn population(&self) -> &P {
        &self.population
    }

    pub fn sfs(&self) -> &Sfs {
        &self.sfs
    }

    pub fn into_parts(self) -> (P, Sfs) {
        (self.population, self.sfs)
    }
}

/// A model that can be evolved and then sampled.
pub trait SfsModel {
    type Population;

    fn evolve(&mut self, rng: &mut Rng) -> Result<Self::Population, SimulationError>;

    fn sample_sfs(
        &mut self,
        rng: &mut Rng,
        population: &Self::Population,
        sample_size: u32,
    ) -> Result<Sfs, SimulationError>;
}

/// Neutral mutations, no selection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NeutralModel(pub SimulationParams);

impl SfsModel for NeutralModel {
    type Population = DiploidPopulation;

    fn evolve(&mut self, rng: &mut Rng) -> Result<Self::Population, SimulationError> {
        wright_fisher::evolve_with_params(rng, &self.0)
    }

    fn sample_sfs(
        &mut self,
        rng: &mut Rng,
        population: &Self::Population,
        sample_size: u32,
    ) -> Result<Sfs, SimulationError> {
        sampling::sample_sfs(rng, population, sample_size)
    }
}

/// Deleterious mutations and snowdrift-game selection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SocialModel(pub SocialParams);

impl SfsModel for SocialModel {
    type Population = DiploidPopulation;

    fn evolve(&mut self, rng: &mut Rng) -> Result<Self::Population, SimulationError> {
        wright_fisher::evolve_social(rng, &self.0)
    }

    fn sample_sfs(
        &mut self,
        rng: &mut Rng,
        population: &Self::Population,
        sample_size: u32,
    ) -> Result<Sfs, SimulationError> {
        sampling::sample_sfs(rng, population, sample_size)
    }
}

/// Evolve one population and sample from it.
pub fn run_replicate<M: SfsModel>(
    model: &mut M,
    rng: &mut Rng,
    sample_size: u32,
) -> Result<Replicate<M::Population>, SimulationError> {
    let population = model.evolve(rng)?;
    let sfs = model.sample_sfs(rng, &population, sample_size)?;
    Ok(Replicate { population, sfs })
}

/// Mean of the spectra returned by `nreps` calls to `replicate`.
///
/// `replicate` receives the zero-based replicate index.
///
/// # Errors
///
/// * [`SimulationError::NoReplicates`] if `nreps == 0`
/// * [`SimulationError::SfsLength`] if a spectrum is not
///   of length `sample_size - 1`
/// * any error returned by `replicate`
///
/// # Examples
///
/// ```
/// use forrustts_sfs::{mean_sfs, Sfs};
///
/// let spectra = [vec![2, 0, 1], vec![0, 2, 1]];
/// let mean = mean_sfs(2, 4, |i| Ok(Sfs::from(spectra[i as usize].clone()))).unwrap();
/// assert_eq!(mean.to_string(), "[1.0, 1.0, 1.0]");
/// ```
pub fn mean_sfs<F>(nreps: u32, sample_size: u32, mut replicate: F) -> Result<MeanSfs, SimulationError>
where
    F: FnMut(u32) -> Result<Sfs, SimulationError>,
{
    let mut accumulator = SfsAccumulator::new(sample_size)?;
    for i in 0..nreps {
        let sfs = replicate(i)?;
        tracing::debug!(
            replicate = i,
            segregating_sites = sfs.segregating_sites(),
            "replicate done"
        );
        accumulator.add(&sfs)?;
    }
    accumulator.mean()
}

/// Mean spectrum of `nreps` independent replicates of `model`.
///
/// Replicates are run in order and share `rng`.
pub fn expected_sfs<M: SfsModel>(
    model: &mut M,
    rng: &mut Rng,
    nreps: u32,
    sample_size: u32,
) -> Result<MeanSfs, SimulationError> {
    tracing::info!(nreps, sample_size, "running replicates");
    mean_sfs(nreps, sample_size, |_| {
        let replicate = run_replicate(model, rng, sample_size)?;
        Ok(replicate.into_parts().1)
    })
}
