use rand::distr::weighted::WeightedIndex;
use rand::distr::{Bernoulli, Uniform};
use rand::Rng;
use rand_distr::Poisson;

use forrustts_core::Position;

use crate::GeneticMapError;

/// Breakpoint positions from crossover events
///
/// # Notes
///
/// * Comparision operations are based
///   on the stored
///   [`Position`](forrustts_core::Position).
/// * Every breakpoint, whatever its kind, switches
///   the parental gamete being copied into the offspring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Breakpoint {
    Crossover(Position),
    IndependentAssortment(Position),
}

impl From<Breakpoint> for Position {
    fn from(value: Breakpoint) -> Self {
        match value {
            Breakpoint::IndependentAssortment(p) => p,
            Breakpoint::Crossover(p) => p,
        }
    }
}

impl PartialOrd for Breakpoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Breakpoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        Position::from(*self).cmp(&Position::from(*other))
    }
}

pub trait GenerateBreakpoints {
    /// Replace the current breakpoints with a new,
    /// sorted, set for one meiosis.
    fn generate_breakpoints<T: Rng + ?Sized>(&mut self, rng: &mut T);
    fn breakpoints(&self) -> &[Breakpoint];

    /// Number of generated breakpoints.
    fn len(&self) -> usize {
        self.breakpoints().len()
    }

    /// Checks if generated breakpoints are empty.
    fn is_empty(&self) -> bool {
        self.breakpoints().is_empty()
    }
}

fn validate_interval(left: Position, right: Position) -> Result<(), GeneticMapError> {
    if right <= left {
        Err(GeneticMapError::InvalidInterval {
            left: left.raw(),
            right: right.raw(),
        })
    } else {
        Ok(())
    }
}

fn to_position<P: TryInto<Position>>(p: P) -> Result<Position, GeneticMapError> {
    p.try_into().map_err(|_| GeneticMapError::InvalidPosition)
}

/// A Poisson number of crossovers, uniformly placed
/// in `[left, right)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PoissonCrossover {
    left: Position,
    right: Position,
    mean: f64,
}

impl PoissonCrossover {
    pub fn new<L, R>(left: L, right: R, mean: f64) -> Result<Self, GeneticMapError>
    where
        L: TryInto<Position>,
        R: TryInto<Position>,
    {
        let left = to_position(left)?;
        let right = to_position(right)?;
        validate_interval(left, right)?;
        if !mean.is_finite() || mean < 0.0 {
            return Err(GeneticMapError::InvalidRate(mean));
        }
        Ok(Self { left, right, mean })
    }

    /// A region of length one.
    pub fn new_point<P>(at: P, mean: f64) -> Result<Self, GeneticMapError>
    where
        P: TryInto<Position>,
    {
        let left = to_position(at)?;
        Self::new(left, left.raw() + 1, mean)
    }

    pub fn left(&self) -> Position {
        self.left
    }
    pub fn right(&self) -> Position {
        self.right
    }
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

/// At most one crossover, with a given probability,
/// uniformly placed in `[left, right)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BernoulliCrossover {
    left: Position,
    right: Position,
    probability: f64,
}

impl BernoulliCrossover {
    pub fn new<L, R>(left: L, right: R, probability: f64) -> Result<Self, GeneticMapError>
    where
        L: TryInto<Position>,
        R: TryInto<Position>,
    {
        let left = to_position(left)?;
        let right = to_position(right)?;
        validate_interval(left, right)?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(GeneticMapError::InvalidProbability(probability));
        }
        Ok(Self {
            left,
            right,
            probability,
        })
    }

    pub fn new_point<P>(at: P, probability: f64) -> Result<Self, GeneticMapError>
    where
        P: TryInto<Position>,
    {
        let left = to_position(at)?;
        Self::new(left, left.raw() + 1, probability)
    }

    pub fn left(&self) -> Position {
        self.left
    }
    pub fn right(&self) -> Position {
        self.right
    }
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

/// Free recombination between two chromosomes
/// meeting at a position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndependentAssortment {
    at: Position,
}

impl IndependentAssortment {
    pub fn new<P: TryInto<Position>>(at: P) -> Result<Self, GeneticMapError> {
        Ok(Self { at: to_position(at)? })
    }

    pub fn at(&self) -> Breakpoint {
        Breakpoint::IndependentAssortment(self.at)
    }
}

#[derive(Default, Debug, Clone)]
pub struct GeneticMapBuilder {
    poisson: Vec<PoissonCrossover>,
    bernoulli: Vec<BernoulliCrossover>,
    independent_assortment: Vec<IndependentAssortment>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeneticMapStatus {
    Valid,
    IndependentAssortmentWithinRegions,
}

impl GeneticMapBuilder {
    pub fn extend_poisson(mut self, intervals: &[PoissonCrossover]) -> Self {
        self.poisson.extend_from_slice(intervals);
        self
    }

    pub fn extend_bernoulli(mut self, intervals: &[BernoulliCrossover]) -> Self {
        self.bernoulli.extend_from_slice(intervals);
        self
    }

    pub fn extend_independent_assortment(mut self, at: &[IndependentAssortment]) -> Self {
        self.independent_assortment.extend_from_slice(at);
        self
    }

    pub fn poisson(&self) -> &[PoissonCrossover] {
        &self.poisson
    }

    pub fn bernoulli(&self) -> &[BernoulliCrossover] {
        &self.bernoulli
    }

    pub fn independent_assortment(&self) -> &[IndependentAssortment] {
        &self.independent_assortment
    }

    fn assortment_inside_region(&self) -> Option<Position> {
        let inside = |at: Position, left: Position, right: Position| at > left && at < right;
        self.independent_assortment
            .iter()
            .map(|i| i.at)
            .find(|&at| {
                self.poisson.iter().any(|p| inside(at, p.left, p.right))
                    || self.bernoulli.iter().any(|b| inside(at, b.left, b.right))
            })
    }

    pub fn validate(&self) -> GeneticMapStatus {
        match self.assortment_inside_region() {
            Some(_) => GeneticMapStatus::IndependentAssortmentWithinRegions,
            None => GeneticMapStatus::Valid,
        }
    }
}

fn uniform_region(left: Position, right: Position) -> Result<Uniform<Position>, GeneticMapError> {
    Uniform::new(left, right).map_err(|e| GeneticMapError::Distribution(e.to_string()))
}

#[derive(Debug)]
struct PoissonRegions {
    regions: Vec<Uniform<Position>>,
    lookup: WeightedIndex<f64>,
    poisson: Poisson<f64>,
}

impl PoissonRegions {
    fn new(poisson: &[PoissonCrossover]) -> Result<Option<Self>, GeneticMapError> {
        let mut regions = vec![];
        let mut weights = vec![];
        for p in poisson.iter().filter(|p| p.mean() > 0.0) {
            regions.push(uniform_region(p.left(), p.right())?);
            weights.push(p.mean());
        }
        if weights.is_empty() {
            return Ok(None);
        }
        let total: f64 = weights.iter().sum();
        let lookup = WeightedIndex::new(&weights)
            .map_err(|e| GeneticMapError::Distribution(e.to_string()))?;
        let poisson =
            Poisson::new(total).map_err(|e| GeneticMapError::Distribution(e.to_string()))?;
        Ok(Some(Self {
            regions,
            lookup,
            poisson,
        }))
    }

    fn generate<T: Rng + ?Sized>(&self, rng: &mut T) -> Breakpoint {
        let i = rng.sample(&self.lookup);
        Breakpoint::Crossover(rng.sample(&self.regions[i]))
    }
}

#[derive(Debug)]
struct BernoulliRegions {
    regions: Vec<Uniform<Position>>,
    probabilities: Vec<Bernoulli>,
}

impl BernoulliRegions {
    fn new(bernoulli: &[BernoulliCrossover]) -> Result<Option<Self>, GeneticMapError> {
        let mut regions = vec![];
        let mut probabilities = vec![];
        for b in bernoulli.iter().filter(|b| b.probability() > 0.0) {
            regions.push(uniform_region(b.left(), b.right())?);
            probabilities.push(
                Bernoulli::new(b.probability())
                    .map_err(|e| GeneticMapError::Distribution(e.to_string()))?,
            );
        }
        if regions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self {
                regions,
                probabilities,
            }))
        }
    }

    fn generate<T: Rng + ?Sized>(&self, rng: &mut T, breakpoints: &mut Vec<Breakpoint>) {
        for (region, probability) in self.regions.iter().zip(self.probabilities.iter()) {
            if rng.sample(probability) {
                breakpoints.push(Breakpoint::Crossover(rng.sample(region)));
            }
        }
    }
}

/// Generates crossover breakpoints for a single meiosis.
///
/// # Examples
///
/// A single chromosome with a mean of `0.5`
/// crossovers per meiosis:
///
/// ```
/// use forrustts_genetics::{GenerateBreakpoints, GeneticMap};
/// use rand::SeedableRng;
///
/// let mut map = GeneticMap::uniform(0, 1000, 0.5).unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// map.generate_breakpoints(&mut rng);
/// assert!(map.breakpoints().windows(2).all(|w| w[0] <= w[1]));
/// ```
#[derive(Debug)]
pub struct GeneticMap {
    poisson_regions: Option<PoissonRegions>,
    bernoulli_regions: Option<BernoulliRegions>,
    independent_assortment: Vec<IndependentAssortment>,
    breakpoints: Vec<Breakpoint>,
}

impl GeneticMap {
    pub fn new_from_builder(builder: GeneticMapBuilder) -> Result<Self, GeneticMapError> {
        if let Some(at) = builder.assortment_inside_region() {
            return Err(GeneticMapError::IndependentAssortmentWithinRegion(at.raw()));
        }
        let poisson_regions = PoissonRegions::new(&builder.poisson)?;
        let bernoulli_regions = BernoulliRegions::new(&builder.bernoulli)?;
        Ok(Self {
            poisson_regions,
            bernoulli_regions,
            independent_assortment: builder.independent_assortment,
            breakpoints: vec![],
        })
    }

    /// A single region with a Poisson number of
    /// crossovers of the given `mean`.
    ///
    /// A `mean` of zero gives a map that never
    /// generates breakpoints.
    pub fn uniform<L, R>(left: L, right: R, mean: f64) -> Result<Self, GeneticMapError>
    where
        L: TryInto<Position>,
        R: TryInto<Position>,
    {
        let builder =
            GeneticMapBuilder::default().extend_poisson(&[PoissonCrossover::new(left, right, mean)?]);
        Self::new_from_builder(builder)
    }
}

impl GenerateBreakpoints for GeneticMap {
    fn generate_breakpoints<T: Rng + ?Sized>(&mut self, rng: &mut T) {
        self.breakpoints.clear();
        if let Some(poisson) = self.poisson_regions.as_ref() {
            let num = rng.sample(&poisson.poisson) as u64;
            for _ in 0..num {
                let breakpoint = poisson.generate(rng);
                self.breakpoints.push(breakpoint);
            }
        }
        if let Some(bernoulli) = self.bernoulli_regions.as_ref() {
            bernoulli.generate(rng, &mut self.breakpoints);
        }
        for i in self.independent_assortment.iter() {
            if rng.random_bool(0.5) {
                self.breakpoints.push(i.at());
            }
        }
        self.breakpoints.sort();
    }

    fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }
}
