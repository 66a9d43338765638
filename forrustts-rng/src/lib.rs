//! Random number generation.
//!
//! This crate is a thin wrapper around a
//! [`ChaCha12Rng`](rand_chacha::ChaCha12Rng), whose
//! output stream is stable across platforms and
//! releases.  [`Rng`] implements [`rand::RngCore`],
//! so any distribution from `rand` or `rand_distr`
//! can sample from it.

use rand::RngCore;
use rand::SeedableRng;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RngError {
    /// The seed cannot be represented as a 64-bit
    /// unsigned integer.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),
}

/// A random number generator.
///
/// The simulation entry points take `&mut Rng`,
/// so a single generator can be reused across
/// replicates.
#[derive(Clone, Debug)]
#[repr(transparent)]
pub struct Rng(rand_chacha::ChaCha12Rng);

impl Rng {
    /// Create a new [`Rng`] with a seed.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::Rng as _;
    ///
    /// let mut a = forrustts_rng::Rng::new(42);
    /// let mut b = forrustts_rng::Rng::new(42);
    /// assert_eq!(a.random::<u64>(), b.random::<u64>());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self(rand_chacha::ChaCha12Rng::seed_from_u64(seed))
    }

    /// Create a new [`Rng`] from any integer seed.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidSeed`] if `seed` is negative or
    /// does not fit in a `u64`.
    ///
    /// ```
    /// assert!(forrustts_rng::Rng::try_new(42_i64).is_ok());
    /// assert!(forrustts_rng::Rng::try_new(-1_i64).is_err());
    /// assert!(forrustts_rng::Rng::try_new(u128::MAX).is_err());
    /// ```
    pub fn try_new<S>(seed: S) -> Result<Self, RngError>
    where
        S: TryInto<u64> + std::fmt::Display + Copy,
    {
        let value = seed
            .try_into()
            .map_err(|_| RngError::InvalidSeed(seed.to_string()))?;
        Ok(Self::new(value))
    }
}

impl RngCore for Rng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.0.fill_bytes(dst)
    }
}

/// Provide access to the underlying rng type
/// wrapped by [`Rng`].
pub trait UnderlyingRngAccess {
    type UnderlyingRng;
    /// Get a reference to the underlying rng
    fn as_underlying_ref(&self) -> &Self::UnderlyingRng;
    /// Get a mutable reference to the underlying rng
    fn as_underlying_mut_ref(&mut self) -> &mut Self::UnderlyingRng;
}

impl UnderlyingRngAccess for Rng {
    type UnderlyingRng = rand_chacha::ChaCha12Rng;
    fn as_underlying_ref(&self) -> &Self::UnderlyingRng {
        &self.0
    }
    fn as_underlying_mut_ref(&mut self) -> &mut Self::UnderlyingRng {
        &mut self.0
    }
}
