use rand::distr::uniform::{Error, SampleBorrow, SampleUniform, UniformInt, UniformSampler};
use rand::Rng;

use crate::Position;

/// Sampler backing `rand::distr::Uniform<Position>`.
///
/// ```
/// use rand::SeedableRng;
/// use rand::Rng;
/// use forrustts_core::Position;
///
/// let lo = Position::new(0).unwrap();
/// let hi = Position::new(100).unwrap();
/// let u = rand::distr::Uniform::<Position>::new(lo, hi).unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(54321);
/// let p = rng.sample(u);
/// assert!(p >= 0 && p < 100);
/// ```
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct UniformPos(UniformInt<i64>);

impl UniformSampler for UniformPos {
    type X = Position;

    fn new<B1, B2>(low: B1, high: B2) -> Result<Self, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        UniformInt::<i64>::new(low.borrow().0, high.borrow().0).map(UniformPos)
    }

    fn new_inclusive<B1, B2>(low: B1, high: B2) -> Result<Self, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        UniformInt::<i64>::new_inclusive(low.borrow().0, high.borrow().0).map(UniformPos)
    }

    // Both bounds are non-negative, so every draw is a valid Position.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::X {
        Position(self.0.sample(rng))
    }
}

impl SampleUniform for Position {
    type Sampler = UniformPos;
}
