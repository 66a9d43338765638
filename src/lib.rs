//! Forward-time population genetic simulation of
//! site-frequency spectra.
//!
//! # Overview
//!
//! Populations of diploids evolve under the Wright-Fisher model
//! with infinitely-many sites mutation and Poisson crossover.
//! Chromosomes are then sampled from the population and the
//! unfolded site-frequency spectrum (SFS) of neutral mutations
//! is computed.  Averaging the SFS over independent replicates
//! estimates its expectation.
//!
//! This package is a port of many ideas from
//! [fwdpp](https://github.com/molpopgen/fwdpp) from C++ to rust.
//!
//! # Example
//!
//! ```
//! use forrustts_sfs::{expected_sfs, NeutralModel, Rng, SimulationParams};
//!
//! let mut rng = Rng::try_new(42).unwrap();
//! let mut model = NeutralModel(SimulationParams::new(50, 100, 2.0, 2.0));
//! let mean = expected_sfs(&mut model, &mut rng, 3, 10).unwrap();
//! assert_eq!(mean.len(), 9);
//! ```

mod error;
pub mod fitness;
mod population;
mod replicates;
mod sampling;
mod sfs;
mod wright_fisher;

pub use error::SimulationError;
pub use population::{Diploid, DiploidPopulation, Gamete, Mutation};
pub use replicates::{
    expected_sfs, mean_sfs, run_replicate, NeutralModel, Replicate, SfsModel, SocialModel,
};
pub use sampling::{sample_chromosomes, sample_sfs, Sample};
pub use sfs::{MeanSfs, Sfs, SfsAccumulator};
pub use wright_fisher::{
    evolve, evolve_social, evolve_with_fitness, evolve_with_params, SimulationParams,
    SocialParams, DEFAULT_GENOME_LENGTH,
};

pub use forrustts_core::{Position, Time};
pub use forrustts_genetics::{InfiniteSites, MutationEffect};
pub use forrustts_rng::{Rng, RngError};

/// Get the forrustts-sfs version number.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
