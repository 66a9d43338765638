//! Gamete-based representation of a population of diploids.
//!
//! Mutations live in a single registry ([`DiploidPopulation::mutations`]).
//! Gametes refer to mutations by their index ("key") into that
//! registry and are shared between individuals via a reference
//! count.  Diploids are pairs of gamete indexes.

use std::collections::HashSet;

use forrustts_core::{Position, Time};
use forrustts_genetics::{MutationEffect, NewMutation};

/// A mutation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mutation {
    position: Position,
    effect_size: f64,
    dominance: f64,
    origin_time: Time,
    neutral: bool,
}

impl Mutation {
    pub(crate) fn new(mutation: NewMutation, origin_time: Time) -> Self {
        let (effect_size, dominance, neutral) = match mutation.effect {
            MutationEffect::Neutral => (0.0, 0.0, true),
            MutationEffect::Selected {
                effect_size,
                dominance,
            } => (effect_size, dominance, false),
        };
        Self {
            position: mutation.position,
            effect_size,
            dominance,
            origin_time,
            neutral,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Selection coefficient/effect size.
    pub fn s(&self) -> f64 {
        self.effect_size
    }

    /// Dominance.
    pub fn h(&self) -> f64 {
        self.dominance
    }

    /// Generation in which the mutation arose.
    pub fn origin_time(&self) -> Time {
        self.origin_time
    }

    pub fn is_neutral(&self) -> bool {
        self.neutral
    }
}

/// A haplotype.
///
/// Both key lists are sorted by mutation position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gamete {
    pub(crate) n: u32,
    pub(crate) mutations: Vec<usize>,
    pub(crate) smutations: Vec<usize>,
}

impl Gamete {
    pub(crate) fn new(n: u32, mutations: Vec<usize>, smutations: Vec<usize>) -> Self {
        Self {
            n,
            mutations,
            smutations,
        }
    }

    /// Number of copies of this gamete in the population.
    ///
    /// A value of zero means that the slot is free
    /// and its key lists are empty.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Keys of neutral mutations.
    pub fn mutations(&self) -> &[usize] {
        &self.mutations
    }

    /// Keys of selected mutations.
    pub fn smutations(&self) -> &[usize] {
        &self.smutations
    }
}

/// A diploid: indexes of its two gametes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diploid {
    pub first: usize,
    pub second: usize,
}

impl From<(usize, usize)> for Diploid {
    fn from(value: (usize, usize)) -> Self {
        Self {
            first: value.0,
            second: value.1,
        }
    }
}

/// A single deme of `N` diploids.
///
/// Returned by the evolution functions.  All views
/// are read-only.
#[derive(Clone, Debug)]
pub struct DiploidPopulation {
    pub(crate) popsize: u32,
    pub(crate) genome_length: Position,
    pub(crate) generation: Time,
    pub(crate) mutations: Vec<Mutation>,
    pub(crate) mcounts: Vec<u32>,
    pub(crate) gametes: Vec<Gamete>,
    pub(crate) diploids: Vec<Diploid>,
    pub(crate) fixations: Vec<Mutation>,
    pub(crate) fixation_times: Vec<Time>,
    pub(crate) mut_lookup: HashSet<Position>,
}

impl DiploidPopulation {
    /// `popsize` diploids, all carrying the same
    /// mutation-free gamete.
    pub(crate) fn new(popsize: u32, genome_length: Position) -> Self {
        Self {
            popsize,
            genome_length,
            generation: Time::default(),
            mutations: vec![],
            mcounts: vec![],
            gametes: vec![Gamete::new(2 * popsize, vec![], vec![])],
            diploids: vec![Diploid::from((0, 0)); popsize as usize],
            fixations: vec![],
            fixation_times: vec![],
            mut_lookup: HashSet::new(),
        }
    }

    /// Number of diploids.
    pub fn popsize(&self) -> u32 {
        self.popsize
    }

    /// Number of chromosomes, `2N`.
    pub fn num_chromosomes(&self) -> u32 {
        2 * self.popsize
    }

    pub fn genome_length(&self) -> Position {
        self.genome_length
    }

    /// Number of generations simulated.
    pub fn generation(&self) -> Time {
        self.generation
    }

    /// The mutation registry.
    ///
    /// Contains extinct mutations, whose entries in
    /// [`DiploidPopulation::mcounts`] are zero.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Number of copies of each mutation.
    pub fn mcounts(&self) -> &[u32] {
        &self.mcounts
    }

    pub fn gametes(&self) -> &[Gamete] {
        &self.gametes
    }

    pub fn diploids(&self) -> &[Diploid] {
        &self.diploids
    }

    /// Mutations that reached frequency one.
    pub fn fixations(&self) -> &[Mutation] {
        &self.fixations
    }

    /// Generation of each fixation.
    pub fn fixation_times(&self) -> &[Time] {
        &self.fixation_times
    }

    /// Mutations currently present in the population,
    /// with their counts.
    pub fn segregating_mutations(&self) -> impl Iterator<Item = (&Mutation, u32)> + '_ {
        self.mutations
            .iter()
            .zip(self.mcounts.iter())
            .filter(|(_, count)| **count > 0)
            .map(|(m, &count)| (m, count))
    }

    /// The gamete carried by chromosome `chromosome`,
    /// with chromosomes numbered `0..2N` so that
    /// diploid `i` carries `2i` and `2i + 1`.
    pub fn chromosome(&self, chromosome: usize) -> Option<&Gamete> {
        let diploid = self.diploids.get(chromosome / 2)?;
        let index = if chromosome % 2 == 0 {
            diploid.first
        } else {
            diploid.second
        };
        self.gametes.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_population() {
        let pop = DiploidPopulation::new(10, Position::new(100).unwrap());
        assert_eq!(pop.popsize(), 10);
        assert_eq!(pop.num_chromosomes(), 20);
        assert_eq!(pop.gametes().len(), 1);
        assert_eq!(pop.gametes()[0].n(), 20);
        assert!(pop.diploids().iter().all(|d| d.first == 0 && d.second == 0));
        assert_eq!(pop.segregating_mutations().count(), 0);
        assert!(pop.chromosome(19).is_some());
        assert!(pop.chromosome(20).is_none());
        assert!(pop.mut_lookup.is_empty());
    }

    #[test]
    fn test_new_mutation() {
        let m = Mutation::new(
            NewMutation {
                position: Position::new(3).unwrap(),
                effect: MutationEffect::Selected {
                    effect_size: -0.01,
                    dominance: 2.0,
                },
            },
            Time::from(7_i64),
        );
        assert!(!m.is_neutral());
        assert_eq!(m.s(), -0.01);
        assert_eq!(m.h(), 2.0);
        assert_eq!(m.origin_time(), Time::from(7_i64));
        assert_eq!(m.position(), 3);
    }
}
