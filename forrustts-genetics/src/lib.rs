//! Core types for genetics: how gametes recombine
//! and how new mutations arise.

use thiserror::Error;

mod genetic_maps;
mod mutation_models;

pub use genetic_maps::BernoulliCrossover;
pub use genetic_maps::Breakpoint;
pub use genetic_maps::GenerateBreakpoints;
pub use genetic_maps::GeneticMap;
pub use genetic_maps::GeneticMapBuilder;
pub use genetic_maps::GeneticMapStatus;
pub use genetic_maps::IndependentAssortment;
pub use genetic_maps::PoissonCrossover;
pub use mutation_models::InfiniteSites;
pub use mutation_models::MutationEffect;
pub use mutation_models::NewMutation;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneticMapError {
    #[error("invalid position")]
    InvalidPosition,
    #[error("invalid interval: [{left}, {right})")]
    InvalidInterval { left: i64, right: i64 },
    #[error("invalid crossover rate: {0}")]
    InvalidRate(f64),
    #[error("invalid crossover probability: {0}")]
    InvalidProbability(f64),
    #[error("independent assortment at {0} falls within a crossover region")]
    IndependentAssortmentWithinRegion(i64),
    #[error("{0}")]
    Distribution(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationModelError {
    #[error("genome length must be > 0")]
    InvalidGenomeLength,
    #[error("invalid mutation rate: {0}")]
    InvalidRate(f64),
    #[error("invalid effect size: {0}")]
    InvalidEffectSize(f64),
    #[error("invalid dominance: {0}")]
    InvalidDominance(f64),
    #[error("no free positions remain for new mutations")]
    GenomeSaturated,
    #[error("{0}")]
    Distribution(String),
}
