//! Fitness models.
//!
//! A [`FitnessModel`] assigns a fitness to every diploid of the parental
//! generation.  Parents are then chosen with probability proportional to
//! fitness.

use crate::population::{DiploidPopulation, Gamete, Mutation};

pub trait FitnessModel {
    /// Fill `fitnesses` with one value per diploid,
    /// in the order of [`DiploidPopulation::diploids`].
    fn fitnesses(&mut self, pop: &DiploidPopulation, fitnesses: &mut Vec<f64>);
}

/// Walk the selected mutations of two gametes.
///
/// `homozygous` is applied once for each mutation
/// carried by both gametes and `heterozygous` for each
/// mutation carried by only one of them.
pub fn site_dependent_fitness<HOM, HET>(
    first: &Gamete,
    second: &Gamete,
    mutations: &[Mutation],
    starting_value: f64,
    mut homozygous: HOM,
    mut heterozygous: HET,
) -> f64
where
    HOM: FnMut(&mut f64, &Mutation),
    HET: FnMut(&mut f64, &Mutation),
{
    let mut value = starting_value;
    let (a, b) = (first.smutations(), second.smutations());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let (left, right) = (&mutations[a[i]], &mutations[b[j]]);
        if a[i] == b[j] {
            homozygous(&mut value, left);
            i += 1;
            j += 1;
        } else if left.position() < right.position() {
            heterozygous(&mut value, left);
            i += 1;
        } else {
            heterozygous(&mut value, right);
            j += 1;
        }
    }
    for &k in a[i..].iter().chain(b[j..].iter()) {
        heterozygous(&mut value, &mutations[k]);
    }
    value
}

fn diploid_gametes(pop: &DiploidPopulation, index: usize) -> (&Gamete, &Gamete) {
    let d = pop.diploids()[index];
    (&pop.gametes()[d.first], &pop.gametes()[d.second])
}

/// Fitness is `1`, `1 + hs`, `1 + scaling * s` for genotypes
/// `AA`, `Aa`, `aa`, multiplied across sites.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Multiplicative {
    pub scaling: f64,
}

impl Default for Multiplicative {
    fn default() -> Self {
        Self { scaling: 2.0 }
    }
}

impl Multiplicative {
    pub fn diploid_fitness(&self, first: &Gamete, second: &Gamete, mutations: &[Mutation]) -> f64 {
        let w = site_dependent_fitness(
            first,
            second,
            mutations,
            1.0,
            |w, m| *w *= 1.0 + self.scaling * m.s(),
            |w, m| *w *= 1.0 + m.h() * m.s(),
        );
        w.max(0.0)
    }
}

impl FitnessModel for Multiplicative {
    fn fitnesses(&mut self, pop: &DiploidPopulation, fitnesses: &mut Vec<f64>) {
        fitnesses.clear();
        for i in 0..pop.diploids().len() {
            let (first, second) = diploid_gametes(pop, i);
            fitnesses.push(self.diploid_fitness(first, second, pop.mutations()));
        }
    }
}

/// Fitness is `1`, `1 + hs`, `1 + scaling * s` for genotypes
/// `AA`, `Aa`, `aa`, summed across sites.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Additive {
    pub scaling: f64,
}

impl Default for Additive {
    fn default() -> Self {
        Self { scaling: 2.0 }
    }
}

impl Additive {
    /// The additive value, `1 + sum of effects`, without
    /// truncation at zero.
    pub fn genetic_value(&self, first: &Gamete, second: &Gamete, mutations: &[Mutation]) -> f64 {
        1.0 + site_dependent_fitness(
            first,
            second,
            mutations,
            0.0,
            |w, m| *w += self.scaling * m.s(),
            |w, m| *w += m.h() * m.s(),
        )
    }
}

impl FitnessModel for Additive {
    fn fitnesses(&mut self, pop: &DiploidPopulation, fitnesses: &mut Vec<f64>) {
        fitnesses.clear();
        for i in 0..pop.diploids().len() {
            let (first, second) = diploid_gametes(pop, i);
            fitnesses.push(self.genetic_value(first, second, pop.mutations()).max(0.0));
        }
    }
}

/// Benefit and cost terms of the continuous snowdrift game
/// (Doebeli, Hauert and Killingback, 2004).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnowdriftPayoff {
    /// Linear benefit
    pub b1: f64,
    /// Quadratic benefit
    pub b2: f64,
    /// Linear cost
    pub c1: f64,
    /// Quadratic cost
    pub c2: f64,
}

impl SnowdriftPayoff {
    /// Payoff to an individual with phenotype `zself`
    /// interacting with a partner of phenotype `zother`.
    pub fn payoff(&self, zself: f64, zother: f64) -> f64 {
        let zpair = zself + zother;
        self.b1 * zpair + self.b2 * zpair * zpair - self.c1 * zself - self.c2 * zself * zself
    }
}

/// Frequency-dependent fitness from pairwise snowdrift games.
///
/// Each diploid's phenotype is its [`Additive`] genetic value.
/// Its fitness is the mean, over all other diploids, of
/// `1 + max(0, payoff)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Snowdrift {
    payoff: SnowdriftPayoff,
    phenotype: Additive,
    phenotypes: Vec<f64>,
}

impl Snowdrift {
    pub fn new(payoff: SnowdriftPayoff) -> Self {
        Self {
            payoff,
            phenotype: Additive::default(),
            phenotypes: vec![],
        }
    }

    /// Phenotypes from the most recent call to
    /// [`FitnessModel::fitnesses`].
    pub fn phenotypes(&self) -> &[f64] {
        &self.phenotypes
    }
}

impl FitnessModel for Snowdrift {
    fn fitnesses(&mut self, pop: &DiploidPopulation, fitnesses: &mut Vec<f64>) {
        self.phenotypes.clear();
        for i in 0..pop.diploids().len() {
            let (first, second) = diploid_gametes(pop, i);
            self.phenotypes
                .push(self.phenotype.genetic_value(first, second, pop.mutations()));
        }
        fitnesses.clear();
        let n = self.phenotypes.len();
        if n < 2 {
            fitnesses.resize(n, 1.0);
            return;
        }
        for (i, &zself) in self.phenotypes.iter().enumerate() {
            let total: f64 = self
                .phenotypes
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, &zother)| 1.0 + self.payoff.payoff(zself, zother).max(0.0))
                .sum();
            fitnesses.push(total / (n - 1) as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Diploid;
    use forrustts_core::{Position, Time};
    use forrustts_genetics::{MutationEffect, NewMutation};

    fn selected(position: i64, s: f64, h: f64) -> Mutation {
        Mutation::new(
            NewMutation {
                position: Position::new(position).unwrap(),
                effect: MutationEffect::Selected {
                    effect_size: s,
                    dominance: h,
                },
            },
            Time::default(),
        )
    }

    #[test]
    fn test_site_dependent_walk() {
        let mutations = vec![
            selected(1, -0.1, 0.5),
            selected(2, -0.2, 0.5),
            selected(3, -0.3, 0.5),
        ];
        let g1 = Gamete::new(1, vec![], vec![0, 1]);
        let g2 = Gamete::new(1, vec![], vec![1, 2]);
        let mut hom = vec![];
        let mut het = vec![];
        site_dependent_fitness(
            &g1,
            &g2,
            &mutations,
            0.0,
            |_, m| hom.push(m.position().raw()),
            |_, m| het.push(m.position().raw()),
        );
        assert_eq!(hom, vec![2]);
        het.sort();
        assert_eq!(het, vec![1, 3]);
    }

    #[test]
    fn test_multiplicative() {
        let mutations = vec![selected(1, -0.1, 0.5), selected(2, -0.2, 0.25)];
        let g1 = Gamete::new(1, vec![], vec![0, 1]);
        let g2 = Gamete::new(1, vec![], vec![1]);
        let w = Multiplicative::default().diploid_fitness(&g1, &g2, &mutations);
        let expected = (1.0 - 0.5 * 0.1) * (1.0 - 2.0 * 0.2);
        assert!((w - expected).abs() < 1e-12);
        let empty = Gamete::default();
        assert_eq!(
            Multiplicative::default().diploid_fitness(&empty, &empty, &mutations),
            1.0
        );
    }

    #[test]
    fn test_multiplicative_truncates_at_zero() {
        let mutations = vec![selected(1, -1.0, 0.5)];
        let g = Gamete::new(2, vec![], vec![0]);
        assert_eq!(
            Multiplicative::default().diploid_fitness(&g, &g, &mutations),
            0.0
        );
    }

    #[test]
    fn test_additive() {
        let mutations = vec![selected(1, 0.1, 2.0), selected(2, 0.2, 0.25)];
        let g1 = Gamete::new(1, vec![], vec![0, 1]);
        let g2 = Gamete::new(1, vec![], vec![1]);
        let v = Additive::default().genetic_value(&g1, &g2, &mutations);
        assert!((v - (1.0 + 2.0 * 0.1 + 2.0 * 0.2)).abs() < 1e-12);
    }

    // Diploids homozygous for no mutation, heterozygous and homozygous
    // for a single selected mutation.
    fn three_genotypes(s: f64, h: f64) -> DiploidPopulation {
        let mut pop = DiploidPopulation::new(3, Position::new(100).unwrap());
        pop.mutations = vec![selected(1, s, h)];
        pop.mcounts = vec![3];
        pop.gametes = vec![Gamete::new(3, vec![], vec![]), Gamete::new(3, vec![], vec![0])];
        pop.diploids = vec![
            Diploid::from((0, 0)),
            Diploid::from((0, 1)),
            Diploid::from((1, 1)),
        ];
        pop
    }

    #[test]
    fn test_additive_fitnesses_truncate_at_zero() {
        let pop = three_genotypes(-1.0, 1.0);
        let mut fitnesses = vec![];
        Additive::default().fitnesses(&pop, &mut fitnesses);
        assert_eq!(fitnesses, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_snowdrift_fitnesses() {
        let pop = three_genotypes(0.5, 1.0);
        let mut model = Snowdrift::new(SnowdriftPayoff {
            b1: 0.1,
            b2: 0.0,
            c1: 0.2,
            c2: 0.0,
        });
        let mut fitnesses = vec![];
        model.fitnesses(&pop, &mut fitnesses);
        assert_eq!(model.phenotypes(), &[1.0, 1.5, 2.0]);

        // z = 1 gains against both partners: 1 + 0.05 and 1 + 0.1.
        // z = 1.5 loses against z = 1 (payoff -0.05, clamped to 0)
        // and gains 0.05 against z = 2.
        // z = 2 loses against both partners.
        let expected = [1.075, 1.025, 1.0];
        assert_eq!(fitnesses.len(), 3);
        for (w, e) in fitnesses.iter().zip(expected) {
            assert!((w - e).abs() < 1e-12, "{w} != {e}");
        }
    }

    #[test]
    fn test_snowdrift_single_diploid() {
        let mut pop = three_genotypes(0.5, 1.0);
        pop.popsize = 1;
        pop.diploids.truncate(1);
        let mut model = Snowdrift::new(SnowdriftPayoff {
            b1: 10.0,
            b2: 10.0,
            c1: 0.0,
            c2: 0.0,
        });
        let mut fitnesses = vec![0.5; 4];
        model.fitnesses(&pop, &mut fitnesses);
        assert_eq!(fitnesses, vec![1.0]);
    }

    #[test]
    fn test_snowdrift_payoff() {
        let p = SnowdriftPayoff {
            b1: 6.0,
            b2: -1.4,
            c1: 4.56,
            c2: -1.6,
        };
        let zpair: f64 = 0.5 + 0.25;
        let expected = 6.0 * zpair - 1.4 * zpair * zpair - 4.56 * 0.5 + 1.6 * 0.25;
        assert!((p.payoff(0.5, 0.25) - expected).abs() < 1e-12);
    }
}
