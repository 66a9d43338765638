//! Error handling
use thiserror::Error;

/// Primary error type.
///
/// Some members of this enum implement ``From``
/// in order to redirect other error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A model parameter is outside of its domain.
    #[error("invalid value for {parameter}: {value}")]
    Domain {
        /// Name of the parameter
        parameter: &'static str,
        /// The rejected value
        value: String,
    },
    /// A sample cannot be taken from the population.
    #[error("sample size {requested} must be in [2, {available}]")]
    SampleSize {
        /// The requested number of chromosomes
        requested: u32,
        /// The number of chromosomes in the population
        available: u32,
    },
    /// A spectrum's length does not match the accumulator.
    #[error("expected a spectrum of length {expected}, got {found}")]
    SfsLength {
        /// Length of the accumulator
        expected: usize,
        /// Length of the rejected spectrum
        found: usize,
    },
    /// A mean was requested before any replicates were added.
    #[error("no replicates have been accumulated")]
    NoReplicates,
    /// Fitnesses cannot be used to choose parents.
    #[error("invalid fitnesses in generation {generation}: {message}")]
    Fitness {
        /// The generation of the parents
        generation: i64,
        /// Why the fitnesses were rejected
        message: String,
    },
    /// A redirection of a [``forrustts_rng::RngError``]
    #[error("{value}")]
    RngError {
        /// The redirected error
        #[from]
        value: forrustts_rng::RngError,
    },
    /// A redirection of a [``forrustts_genetics::GeneticMapError``]
    #[error("{value}")]
    GeneticMapError {
        /// The redirected error
        #[from]
        value: forrustts_genetics::GeneticMapError,
    },
    /// A redirection of a [``forrustts_genetics::MutationModelError``]
    #[error("{value}")]
    MutationModelError {
        /// The redirected error
        #[from]
        value: forrustts_genetics::MutationModelError,
    },
}

impl SimulationError {
    pub(crate) fn domain<T: std::fmt::Display>(parameter: &'static str, value: T) -> Self {
        Self::Domain {
            parameter,
            value: value.to_string(),
        }
    }
}
