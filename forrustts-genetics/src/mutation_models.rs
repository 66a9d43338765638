use std::collections::HashSet;

use rand::distr::{Bernoulli, Uniform};
use rand::Rng;
use rand_distr::Poisson;

use forrustts_core::Position;

use crate::MutationModelError;

/// The fitness effect carried by a new mutation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MutationEffect {
    Neutral,
    Selected {
        /// Selection coefficient/effect size
        effect_size: f64,
        /// Dominance
        dominance: f64,
    },
}

impl MutationEffect {
    pub fn is_neutral(&self) -> bool {
        matches!(self, MutationEffect::Neutral)
    }
}

/// Output of [`InfiniteSites::generate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NewMutation {
    pub position: Position,
    pub effect: MutationEffect,
}

/// The infinitely-many sites mutation model.
///
/// Every new mutation arises at a position not
/// currently occupied by another mutation.
/// A new mutation is selected with probability
/// `selected_rate / (neutral_rate + selected_rate)`
/// and then carries a fixed effect size and dominance.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use rand::SeedableRng;
/// use forrustts_genetics::InfiniteSites;
///
/// let model = InfiniteSites::neutral(1000, 1e-3).unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(101);
/// let mut lookup = HashSet::new();
/// let m = model.generate(&mut rng, &mut lookup).unwrap();
/// assert!(m.effect.is_neutral());
/// assert!(lookup.contains(&m.position));
/// ```
#[derive(Debug, Clone)]
pub struct InfiniteSites {
    genome_length: Position,
    neutral_rate: f64,
    selected_rate: f64,
    effect_size: f64,
    dominance: f64,
    positions: Uniform<Position>,
    count: Option<Poisson<f64>>,
    selected: Option<Bernoulli>,
}

fn validate_rate(rate: f64) -> Result<f64, MutationModelError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(MutationModelError::InvalidRate(rate))
    }
}

impl InfiniteSites {
    pub fn new<P: TryInto<Position>>(
        genome_length: P,
        neutral_rate: f64,
        selected_rate: f64,
        effect_size: f64,
        dominance: f64,
    ) -> Result<Self, MutationModelError> {
        let genome_length = genome_length
            .try_into()
            .map_err(|_| MutationModelError::InvalidGenomeLength)?;
        if genome_length <= 0 {
            return Err(MutationModelError::InvalidGenomeLength);
        }
        let neutral_rate = validate_rate(neutral_rate)?;
        let selected_rate = validate_rate(selected_rate)?;
        if !effect_size.is_finite() {
            return Err(MutationModelError::InvalidEffectSize(effect_size));
        }
        if !dominance.is_finite() {
            return Err(MutationModelError::InvalidDominance(dominance));
        }
        let zero = Position::new(0).ok_or(MutationModelError::InvalidGenomeLength)?;
        let positions = Uniform::new(zero, genome_length)
            .map_err(|e| MutationModelError::Distribution(e.to_string()))?;
        let total = neutral_rate + selected_rate;
        let count = if total > 0.0 {
            Some(
                Poisson::new(total)
                    .map_err(|e| MutationModelError::Distribution(e.to_string()))?,
            )
        } else {
            None
        };
        let selected = if selected_rate > 0.0 {
            Some(
                Bernoulli::new(selected_rate / total)
                    .map_err(|e| MutationModelError::Distribution(e.to_string()))?,
            )
        } else {
            None
        };
        Ok(Self {
            genome_length,
            neutral_rate,
            selected_rate,
            effect_size,
            dominance,
            positions,
            count,
            selected,
        })
    }

    /// Only neutral mutations, at `rate` per gamete.
    pub fn neutral<P: TryInto<Position>>(
        genome_length: P,
        rate: f64,
    ) -> Result<Self, MutationModelError> {
        Self::new(genome_length, rate, 0.0, 0.0, 0.0)
    }

    pub fn genome_length(&self) -> Position {
        self.genome_length
    }

    pub fn neutral_rate(&self) -> f64 {
        self.neutral_rate
    }

    pub fn selected_rate(&self) -> f64 {
        self.selected_rate
    }

    /// Total mutation rate per gamete.
    pub fn total_rate(&self) -> f64 {
        self.neutral_rate + self.selected_rate
    }

    /// Number of new mutations entering one gamete.
    pub fn num_mutations<T: Rng + ?Sized>(&self, rng: &mut T) -> u32 {
        match &self.count {
            Some(poisson) => rng.sample(poisson) as u32,
            None => 0,
        }
    }

    /// Generate a new mutation.
    ///
    /// The position is guaranteed not to be in
    /// `lookup` and is added to it.
    ///
    /// # Errors
    ///
    /// [`MutationModelError::GenomeSaturated`] if every
    /// position of the genome is already occupied.
    pub fn generate<T: Rng + ?Sized>(
        &self,
        rng: &mut T,
        lookup: &mut HashSet<Position>,
    ) -> Result<NewMutation, MutationModelError> {
        if lookup.len() as i64 >= self.genome_length.raw() {
            return Err(MutationModelError::GenomeSaturated);
        }
        let mut position = rng.sample(&self.positions);
        while lookup.contains(&position) {
            position = rng.sample(&self.positions);
        }
        lookup.insert(position);
        let effect = match &self.selected {
            Some(selected) if rng.sample(selected) => MutationEffect::Selected {
                effect_size: self.effect_size,
                dominance: self.dominance,
            },
            _ => MutationEffect::Neutral,
        };
        Ok(NewMutation { position, effect })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_invalid_parameters() {
        assert!(InfiniteSites::neutral(0, 1e-3).is_err());
        assert!(InfiniteSites::neutral(-1, 1e-3).is_err());
        assert!(InfiniteSites::neutral(10, -1e-3).is_err());
        assert!(InfiniteSites::neutral(10, f64::NAN).is_err());
        assert!(InfiniteSites::new(10, 0.0, 1e-3, f64::INFINITY, 0.5).is_err());
        assert!(InfiniteSites::new(10, 0.0, 1e-3, 0.1, f64::NAN).is_err());
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let model = InfiniteSites::neutral(10, 0.0).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(model.num_mutations(&mut rng), 0);
        }
    }

    #[test]
    fn test_positions_are_unique_until_saturation() {
        let model = InfiniteSites::neutral(5, 1.0).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let mut lookup = HashSet::new();
        for _ in 0..5 {
            model.generate(&mut rng, &mut lookup).unwrap();
        }
        assert_eq!(lookup.len(), 5);
        assert!(matches!(
            model.generate(&mut rng, &mut lookup),
            Err(MutationModelError::GenomeSaturated)
        ));
    }

    #[test]
    fn test_only_selected() {
        let model = InfiniteSites::new(1000, 0.0, 1.0, -0.1, 0.25).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut lookup = HashSet::new();
        for _ in 0..10 {
            let m = model.generate(&mut rng, &mut lookup).unwrap();
            assert_eq!(
                m.effect,
                MutationEffect::Selected {
                    effect_size: -0.1,
                    dominance: 0.25
                }
            );
        }
    }
}
