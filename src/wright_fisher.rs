//! Forward-time Wright-Fisher simulation.
//!
//! The population is a single deme of `N` diploids with
//! discrete, non-overlapping generations.  Each generation,
//! `N` offspring are produced by choosing two parents with
//! probability proportional to fitness.  Each parent transmits
//! one recombinant gamete, to which new mutations are added.

use rand::distr::weighted::WeightedIndex;
use rand::Rng;

use forrustts_core::{Position, Time};
use forrustts_genetics::{GenerateBreakpoints, GeneticMap, InfiniteSites};

use crate::error::SimulationError;
use crate::fitness::{FitnessModel, Multiplicative, Snowdrift, SnowdriftPayoff};
use crate::population::{Diploid, DiploidPopulation, Gamete, Mutation};

/// Genome length used unless
/// [`SimulationParams::with_genome_length`] says otherwise.
pub const DEFAULT_GENOME_LENGTH: i64 = 1_000_000_000;

/// Parameters shared by all models.
///
/// Rates are per gamete per generation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationParams {
    /// Number of diploids
    pub popsize: u32,
    /// Number of generations to simulate
    pub generations: u32,
    /// Neutral mutation rate
    pub mutrate: f64,
    /// Mean number of crossovers
    pub recrate: f64,
    /// Mutations and crossovers occur in `[0, genome_length)`
    pub genome_length: i64,
}

fn validate_rate(parameter: &'static str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::domain(parameter, value))
    }
}

fn validate_finite(parameter: &'static str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::domain(parameter, value))
    }
}

impl SimulationParams {
    pub fn new(popsize: u32, generations: u32, mutrate: f64, recrate: f64) -> Self {
        Self {
            popsize,
            generations,
            mutrate,
            recrate,
            genome_length: DEFAULT_GENOME_LENGTH,
        }
    }

    pub fn with_genome_length(self, genome_length: i64) -> Self {
        Self {
            genome_length,
            ..self
        }
    }

    /// # Errors
    ///
    /// [`SimulationError::Domain`] naming the first invalid parameter.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.popsize == 0 {
            return Err(SimulationError::domain("popsize", self.popsize));
        }
        if self.generations == 0 {
            return Err(SimulationError::domain("generations", self.generations));
        }
        validate_rate("mutrate", self.mutrate)?;
        validate_rate("recrate", self.recrate)?;
        if self.genome_length <= 0 {
            return Err(SimulationError::domain("genome_length", self.genome_length));
        }
        Ok(())
    }

    fn genetic_map(&self) -> Result<GeneticMap, SimulationError> {
        Ok(GeneticMap::uniform(0, self.genome_length, self.recrate)?)
    }
}

/// Parameters of the model with deleterious mutations
/// and snowdrift-game selection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SocialParams {
    pub base: SimulationParams,
    /// Rate of selected mutations
    pub mutrate_deleterious: f64,
    /// Effect size of selected mutations
    pub effect_size: f64,
    /// Dominance of selected mutations
    pub dominance: f64,
    pub payoff: SnowdriftPayoff,
}

impl SocialParams {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        popsize: u32,
        generations: u32,
        mutrate: f64,
        mutrate_deleterious: f64,
        effect_size: f64,
        dominance: f64,
        recrate: f64,
        b1: f64,
        b2: f64,
        c1: f64,
        c2: f64,
    ) -> Self {
        Self {
            base: SimulationParams::new(popsize, generations, mutrate, recrate),
            mutrate_deleterious,
            effect_size,
            dominance,
            payoff: SnowdriftPayoff { b1, b2, c1, c2 },
        }
    }

    pub fn with_genome_length(self, genome_length: i64) -> Self {
        Self {
            base: self.base.with_genome_length(genome_length),
            ..self
        }
    }

    /// # Errors
    ///
    /// [`SimulationError::Domain`] naming the first invalid parameter.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.base.validate()?;
        validate_rate("mutrate_deleterious", self.mutrate_deleterious)?;
        validate_finite("effect_size", self.effect_size)?;
        validate_finite("dominance", self.dominance)?;
        validate_finite("b1", self.payoff.b1)?;
        validate_finite("b2", self.payoff.b2)?;
        validate_finite("c1", self.payoff.c1)?;
        validate_finite("c2", self.payoff.c2)?;
        Ok(())
    }
}

/// Evolve a neutral population.
///
/// # Parameters
///
/// * `popsize`: number of diploids
/// * `generations`: number of generations
/// * `mutrate`: neutral mutation rate per gamete
/// * `recrate`: mean number of crossovers per meiosis
///
/// # Errors
///
/// [`SimulationError::Domain`] if a parameter is invalid.
/// No random numbers are consumed in that case.
///
/// # Examples
///
/// ```
/// let mut rng = forrustts_sfs::Rng::new(42);
/// let pop = forrustts_sfs::evolve(&mut rng, 50, 100, 1.0, 1.0).unwrap();
/// assert_eq!(pop.diploids().len(), 50);
/// assert_eq!(pop.generation().raw(), 100);
/// ```
pub fn evolve(
    rng: &mut forrustts_rng::Rng,
    popsize: u32,
    generations: u32,
    mutrate: f64,
    recrate: f64,
) -> Result<DiploidPopulation, SimulationError> {
    evolve_with_params(rng, &SimulationParams::new(popsize, generations, mutrate, recrate))
}

/// Evolve a neutral population.
///
/// See [`evolve`].
pub fn evolve_with_params(
    rng: &mut forrustts_rng::Rng,
    params: &SimulationParams,
) -> Result<DiploidPopulation, SimulationError> {
    params.validate()?;
    let mutation_model = InfiniteSites::neutral(params.genome_length, params.mutrate)?;
    evolve_with_fitness(
        rng,
        params,
        &mutation_model,
        params.genetic_map()?,
        Multiplicative::default(),
    )
}

/// Evolve a population with deleterious mutations
/// under snowdrift-game selection.
///
/// # Errors
///
/// [`SimulationError::Domain`] if a parameter is invalid.
/// [`SimulationError::Fitness`] if every individual
/// has a fitness of zero.
pub fn evolve_social(
    rng: &mut forrustts_rng::Rng,
    params: &SocialParams,
) -> Result<DiploidPopulation, SimulationError> {
    params.validate()?;
    let mutation_model = InfiniteSites::new(
        params.base.genome_length,
        params.base.mutrate,
        params.mutrate_deleterious,
        params.effect_size,
        params.dominance,
    )?;
    evolve_with_fitness(
        rng,
        &params.base,
        &mutation_model,
        params.base.genetic_map()?,
        Snowdrift::new(params.payoff),
    )
}

/// Evolve a population with any mutation model,
/// genetic map and fitness model.
///
/// `params.mutrate` and `params.recrate` are ignored in favor
/// of `mutation_model` and `genetic_map`.
///
/// # Errors
///
/// [`SimulationError::Domain`] if a parameter is invalid or if
/// `mutation_model` is for a genome of a different length.
///
/// # Examples
///
/// Two chromosomes that assort independently:
///
/// ```
/// use forrustts_genetics::{GeneticMap, GeneticMapBuilder, IndependentAssortment, PoissonCrossover};
/// use forrustts_sfs::fitness::Multiplicative;
/// use forrustts_sfs::{evolve_with_fitness, InfiniteSites, Rng, SimulationParams};
///
/// let params = SimulationParams::new(20, 20, 1.0, 0.0).with_genome_length(100);
/// let builder = GeneticMapBuilder::default()
///     .extend_poisson(&[
///         PoissonCrossover::new(0, 50, 0.5).unwrap(),
///         PoissonCrossover::new(50, 100, 0.5).unwrap(),
///     ])
///     .extend_independent_assortment(&[IndependentAssortment::new(50).unwrap()]);
/// let map = GeneticMap::new_from_builder(builder).unwrap();
/// let model = InfiniteSites::neutral(100, 1.0).unwrap();
/// let mut rng = Rng::new(3);
/// let pop = evolve_with_fitness(&mut rng, &params, &model, map, Multiplicative::default()).unwrap();
/// assert_eq!(pop.genome_length(), 100);
/// ```
pub fn evolve_with_fitness<R, G, F>(
    rng: &mut R,
    params: &SimulationParams,
    mutation_model: &InfiniteSites,
    mut genetic_map: G,
    mut fitness: F,
) -> Result<DiploidPopulation, SimulationError>
where
    R: Rng + ?Sized,
    G: GenerateBreakpoints,
    F: FitnessModel,
{
    params.validate()?;
    let genome_length = Position::new(params.genome_length)
        .ok_or_else(|| SimulationError::domain("genome_length", params.genome_length))?;
    if mutation_model.genome_length() != genome_length {
        return Err(SimulationError::domain(
            "mutation model genome_length",
            mutation_model.genome_length(),
        ));
    }
    let mut pop = DiploidPopulation::new(params.popsize, genome_length);
    let mut buffers = Buffers::default();

    tracing::info!(
        popsize = params.popsize,
        generations = params.generations,
        mutrate = mutation_model.total_rate(),
        recrate = params.recrate,
        "evolving population"
    );
    for _ in 0..params.generations {
        generate_offspring(
            rng,
            &mut pop,
            &mut genetic_map,
            mutation_model,
            &mut fitness,
            &mut buffers,
        )?;
    }
    tracing::info!(
        generation = pop.generation.raw(),
        segregating = pop.segregating_mutations().count(),
        fixations = pop.fixations.len(),
        "evolution finished"
    );
    Ok(pop)
}

#[derive(Default)]
struct Buffers {
    fitnesses: Vec<f64>,
    offspring: Vec<Diploid>,
    gamete_bin: Vec<usize>,
    mutation_bin: Vec<usize>,
    breakpoints: Vec<i64>,
    neutral: Vec<usize>,
    selected: Vec<usize>,
}

fn generate_offspring<R, G, F>(
    rng: &mut R,
    pop: &mut DiploidPopulation,
    genetic_map: &mut G,
    mutation_model: &InfiniteSites,
    fitness: &mut F,
    buffers: &mut Buffers,
) -> Result<(), SimulationError>
where
    R: Rng + ?Sized,
    G: GenerateBreakpoints,
    F: FitnessModel,
{
    let birth_time = pop.generation.next();

    fitness.fitnesses(pop, &mut buffers.fitnesses);
    let wbar = buffers.fitnesses.iter().sum::<f64>() / buffers.fitnesses.len() as f64;
    tracing::debug!(generation = pop.generation.raw(), wbar, "parental fitness");
    let parents = WeightedIndex::new(&buffers.fitnesses).map_err(|e| {
        tracing::warn!(generation = pop.generation.raw(), wbar, "cannot choose parents");
        SimulationError::Fitness {
            generation: pop.generation.raw(),
            message: e.to_string(),
        }
    })?;

    // Slots not used by parents may be overwritten.
    buffers.gamete_bin.clear();
    buffers
        .gamete_bin
        .extend((0..pop.gametes.len()).rev().filter(|&i| pop.gametes[i].n == 0));
    buffers.mutation_bin.clear();
    buffers
        .mutation_bin
        .extend((0..pop.mcounts.len()).rev().filter(|&i| pop.mcounts[i] == 0));
    for g in pop.gametes.iter_mut() {
        g.n = 0;
    }

    buffers.offspring.clear();
    for _ in 0..pop.popsize {
        let p1 = pop.diploids[rng.sample(&parents)];
        let p2 = pop.diploids[rng.sample(&parents)];
        let first = transmit(rng, pop, p1, genetic_map, mutation_model, birth_time, buffers)?;
        let second = transmit(rng, pop, p2, genetic_map, mutation_model, birth_time, buffers)?;
        buffers.offspring.push(Diploid { first, second });
    }
    std::mem::swap(&mut pop.diploids, &mut buffers.offspring);
    debug_assert_eq!(
        pop.gametes.iter().map(|g| g.n).sum::<u32>(),
        pop.num_chromosomes()
    );

    update_mutations(pop, birth_time);
    pop.generation = birth_time;
    Ok(())
}

/// Decide which gamete to pass on from a parent.
fn mendel<R: Rng + ?Sized>(rng: &mut R, parent: Diploid) -> (usize, usize) {
    if rng.random_bool(0.5) {
        (parent.second, parent.first)
    } else {
        (parent.first, parent.second)
    }
}

/// Produce the gamete that `parent` passes on and
/// return its index.
fn transmit<R: Rng + ?Sized, G: GenerateBreakpoints>(
    rng: &mut R,
    pop: &mut DiploidPopulation,
    parent: Diploid,
    genetic_map: &mut G,
    mutation_model: &InfiniteSites,
    birth_time: Time,
    buffers: &mut Buffers,
) -> Result<usize, SimulationError> {
    let (g1, g2) = mendel(rng, parent);
    genetic_map.generate_breakpoints(rng);
    let nmuts = mutation_model.num_mutations(rng);

    let recombinant = !genetic_map.is_empty() && g1 != g2;
    if !recombinant && nmuts == 0 {
        pop.gametes[g1].n += 1;
        return Ok(g1);
    }

    buffers.neutral.clear();
    buffers.selected.clear();
    if recombinant {
        buffers.breakpoints.clear();
        buffers.breakpoints.extend(
            genetic_map
                .breakpoints()
                .iter()
                .map(|&b| Position::from(b).raw()),
        );
        buffers.breakpoints.push(i64::MAX);
        let (first, second) = (&pop.gametes[g1], &pop.gametes[g2]);
        recombine_keys(
            &first.mutations,
            &second.mutations,
            &buffers.breakpoints,
            &pop.mutations,
            &mut buffers.neutral,
        );
        recombine_keys(
            &first.smutations,
            &second.smutations,
            &buffers.breakpoints,
            &pop.mutations,
            &mut buffers.selected,
        );
    } else {
        buffers.neutral.extend_from_slice(&pop.gametes[g1].mutations);
        buffers.selected.extend_from_slice(&pop.gametes[g1].smutations);
    }

    for _ in 0..nmuts {
        let new_mutation = mutation_model.generate(rng, &mut pop.mut_lookup)?;
        let mutation = Mutation::new(new_mutation, birth_time);
        let key = match buffers.mutation_bin.pop() {
            Some(key) => {
                pop.mutations[key] = mutation;
                key
            }
            None => {
                pop.mutations.push(mutation);
                pop.mcounts.push(0);
                pop.mutations.len() - 1
            }
        };
        let keys = if mutation.is_neutral() {
            &mut buffers.neutral
        } else {
            &mut buffers.selected
        };
        let at = keys.partition_point(|&k| pop.mutations[k].position() < mutation.position());
        keys.insert(at, key);
    }

    Ok(recycle_gamete(
        &mut pop.gametes,
        &mut buffers.gamete_bin,
        &buffers.neutral,
        &buffers.selected,
    ))
}

/// Copy the keys of `first` and `second` into `output`,
/// switching source at each breakpoint.
///
/// `breakpoints` must be sorted and end with `i64::MAX`.
fn recombine_keys(
    first: &[usize],
    second: &[usize],
    breakpoints: &[i64],
    mutations: &[Mutation],
    output: &mut Vec<usize>,
) {
    let position = |k: &usize| mutations[*k].position().raw();
    let mut left = i64::MIN;
    for (i, &right) in breakpoints.iter().enumerate() {
        let source = if i % 2 == 0 { first } else { second };
        let start = source.partition_point(|k| position(k) < left);
        let stop = source.partition_point(|k| position(k) < right);
        if start < stop {
            output.extend_from_slice(&source[start..stop]);
        }
        left = right;
    }
}

fn recycle_gamete(
    gametes: &mut Vec<Gamete>,
    bin: &mut Vec<usize>,
    neutral: &[usize],
    selected: &[usize],
) -> usize {
    match bin.pop() {
        Some(i) => {
            let g = &mut gametes[i];
            debug_assert_eq!(g.n, 0);
            g.n = 1;
            g.mutations.clear();
            g.mutations.extend_from_slice(neutral);
            g.smutations.clear();
            g.smutations.extend_from_slice(selected);
            i
        }
        None => {
            gametes.push(Gamete::new(1, neutral.to_vec(), selected.to_vec()));
            gametes.len() - 1
        }
    }
}

/// Recount mutations, then remove fixations from gametes
/// and release the positions of mutations no longer present.
fn update_mutations(pop: &mut DiploidPopulation, birth_time: Time) {
    pop.mcounts.clear();
    pop.mcounts.resize(pop.mutations.len(), 0);
    for g in pop.gametes.iter().filter(|g| g.n > 0) {
        for &k in g.mutations.iter().chain(g.smutations.iter()) {
            pop.mcounts[k] += g.n;
        }
    }

    let twon = pop.num_chromosomes();
    if pop.mcounts.iter().any(|&c| c == twon) {
        let mcounts = &pop.mcounts;
        for g in pop.gametes.iter_mut().filter(|g| g.n > 0) {
            g.mutations.retain(|&k| mcounts[k] != twon);
            g.smutations.retain(|&k| mcounts[k] != twon);
        }
        for (k, count) in pop.mcounts.iter_mut().enumerate() {
            if *count == twon {
                pop.fixations.push(pop.mutations[k]);
                pop.fixation_times.push(birth_time);
                *count = 0;
            }
        }
    }

    pop.mut_lookup.clear();
    for (m, _) in pop
        .mutations
        .iter()
        .zip(pop.mcounts.iter())
        .filter(|(_, c)| **c > 0)
    {
        pop.mut_lookup.insert(m.position());
    }

    for g in pop.gametes.iter_mut().filter(|g| g.n == 0) {
        g.mutations.clear();
        g.smutations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forrustts_genetics::{MutationEffect, NewMutation};
    use rand::SeedableRng;

    fn neutral_at(position: i64) -> Mutation {
        Mutation::new(
            NewMutation {
                position: Position::new(position).unwrap(),
                effect: MutationEffect::Neutral,
            },
            Time::default(),
        )
    }

    #[test]
    fn test_recombine_keys() {
        let mutations: Vec<Mutation> = [1, 3, 5, 7, 9].iter().map(|&p| neutral_at(p)).collect();
        let first = vec![0, 2, 4];
        let second = vec![1, 3];
        let mut output = vec![];

        recombine_keys(&first, &second, &[4, i64::MAX], &mutations, &mut output);
        assert_eq!(output, vec![0, 3]);

        output.clear();
        recombine_keys(&first, &second, &[2, 8, i64::MAX], &mutations, &mut output);
        assert_eq!(output, vec![0, 1, 3, 4]);

        output.clear();
        recombine_keys(&first, &second, &[i64::MAX], &mutations, &mut output);
        assert_eq!(output, first);
    }

    #[test]
    fn test_mendel_returns_both_gametes() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let parent = Diploid::from((3, 8));
        let mut swapped = false;
        for _ in 0..100 {
            let (a, b) = mendel(&mut rng, parent);
            assert!((a, b) == (3, 8) || (a, b) == (8, 3));
            swapped |= a == 8;
        }
        assert!(swapped);
    }

    #[test]
    fn test_fixations_are_removed() {
        let mut pop = DiploidPopulation::new(2, Position::new(100).unwrap());
        pop.mutations = vec![neutral_at(10), neutral_at(20)];
        pop.mcounts = vec![0, 0];
        pop.gametes = vec![Gamete::new(3, vec![0, 1], vec![]), Gamete::new(1, vec![0], vec![])];
        pop.diploids = vec![Diploid::from((0, 0)), Diploid::from((0, 1))];
        update_mutations(&mut pop, Time::from(5_i64));

        assert_eq!(pop.fixations().len(), 1);
        assert_eq!(pop.fixations()[0].position(), 10);
        assert_eq!(pop.fixation_times(), &[Time::from(5_i64)]);
        assert_eq!(pop.mcounts(), &[0, 3]);
        assert_eq!(pop.gametes()[0].mutations(), &[1]);
        assert!(pop.gametes()[1].mutations().is_empty());
        assert_eq!(pop.mut_lookup.len(), 1);
        assert!(pop.mut_lookup.contains(&Position::new(20).unwrap()));
    }

    #[test]
    fn test_invalid_params() {
        assert!(SimulationParams::new(0, 1, 0.0, 0.0).validate().is_err());
        assert!(SimulationParams::new(1, 0, 0.0, 0.0).validate().is_err());
        assert!(SimulationParams::new(1, 1, -1.0, 0.0).validate().is_err());
        assert!(SimulationParams::new(1, 1, 0.0, f64::NAN).validate().is_err());
        assert!(SimulationParams::new(1, 1, 0.0, 0.0)
            .with_genome_length(0)
            .validate()
            .is_err());
        assert!(SimulationParams::new(1, 1, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_all_zero_fitness() {
        struct Lethal;
        impl FitnessModel for Lethal {
            fn fitnesses(&mut self, pop: &DiploidPopulation, fitnesses: &mut Vec<f64>) {
                fitnesses.clear();
                fitnesses.resize(pop.diploids().len(), 0.0);
            }
        }
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let params = SimulationParams::new(10, 10, 0.0, 0.0);
        let model = InfiniteSites::neutral(params.genome_length, 0.0).unwrap();
        let map = params.genetic_map().unwrap();
        match evolve_with_fitness(&mut rng, &params, &model, map, Lethal) {
            Err(SimulationError::Fitness { generation, .. }) => assert_eq!(generation, 0),
            _ => panic!(),
        }
    }

    #[test]
    fn test_mutation_model_genome_length_must_match() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let params = SimulationParams::new(10, 10, 1.0, 0.0).with_genome_length(100);
        let model = InfiniteSites::neutral(1000, 1.0).unwrap();
        let map = params.genetic_map().unwrap();
        match evolve_with_fitness(&mut rng, &params, &model, map, Multiplicative::default()) {
            Err(SimulationError::Domain { parameter, value }) => {
                assert_eq!(parameter, "mutation model genome_length");
                assert_eq!(value, "1000");
            }
            _ => panic!(),
        }
    }
}
