//! Site-frequency spectra.

use crate::error::SimulationError;
use crate::sampling::Sample;

/// The unfolded site-frequency spectrum of a sample.
///
/// Element `i` is the number of sites whose derived
/// allele is present `i + 1` times in a sample of
/// `len() + 1` chromosomes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sfs(Vec<u32>);

impl Sfs {
    /// An empty spectrum for a sample of `sample_size`
    /// chromosomes.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Domain`] if `sample_size < 2`.
    pub fn new(sample_size: u32) -> Result<Self, SimulationError> {
        if sample_size < 2 {
            return Err(SimulationError::domain("sample_size", sample_size));
        }
        Ok(Self(vec![0; sample_size as usize - 1]))
    }

    pub fn from_sample(sample: &Sample) -> Self {
        let n = sample.sample_size();
        let mut sfs = vec![0; (n as usize).saturating_sub(1)];
        for &count in sample.counts().values().filter(|&&c| c > 0 && c < n) {
            sfs[count as usize - 1] += 1;
        }
        Self(sfs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Size of the sample the spectrum describes.
    pub fn sample_size(&self) -> u32 {
        self.0.len() as u32 + 1
    }

    /// Total number of polymorphic sites.
    pub fn segregating_sites(&self) -> u32 {
        self.0.iter().sum()
    }
}

impl From<Vec<u32>> for Sfs {
    fn from(value: Vec<u32>) -> Self {
        Self(value)
    }
}

impl From<Sfs> for Vec<u32> {
    fn from(value: Sfs) -> Self {
        value.0
    }
}

/// Element-wise mean of several [`Sfs`].
///
/// Displays as a list of floats:
///
/// ```
/// let mean = forrustts_sfs::MeanSfs::from(vec![2.0, 0.0, 1.0]);
/// assert_eq!(mean.to_string(), "[2.0, 0.0, 1.0]");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeanSfs(Vec<f64>);

impl MeanSfs {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for MeanSfs {
    fn from(value: Vec<f64>) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for MeanSfs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Running sum of spectra from independent replicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SfsAccumulator {
    sums: Vec<u64>,
    replicates: u32,
}

impl SfsAccumulator {
    /// # Errors
    ///
    /// [`SimulationError::Domain`] if `sample_size < 2`.
    pub fn new(sample_size: u32) -> Result<Self, SimulationError> {
        let sfs = Sfs::new(sample_size)?;
        Ok(Self {
            sums: vec![0; sfs.len()],
            replicates: 0,
        })
    }

    /// Add one replicate.
    ///
    /// # Errors
    ///
    /// [`SimulationError::SfsLength`] if `sfs` is for a
    /// different sample size.
    pub fn add(&mut self, sfs: &Sfs) -> Result<(), SimulationError> {
        if sfs.len() != self.sums.len() {
            return Err(SimulationError::SfsLength {
                expected: self.sums.len(),
                found: sfs.len(),
            });
        }
        for (sum, &count) in self.sums.iter_mut().zip(sfs.as_slice()) {
            *sum += u64::from(count);
        }
        self.replicates += 1;
        Ok(())
    }

    pub fn replicates(&self) -> u32 {
        self.replicates
    }

    /// # Errors
    ///
    /// [`SimulationError::NoReplicates`] if nothing was added.
    pub fn mean(&self) -> Result<MeanSfs, SimulationError> {
        if self.replicates == 0 {
            return Err(SimulationError::NoReplicates);
        }
        let n = f64::from(self.replicates);
        Ok(MeanSfs(self.sums.iter().map(|&s| s as f64 / n).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        assert_eq!(Sfs::new(4).unwrap().as_slice(), &[0, 0, 0]);
        assert_eq!(Sfs::new(4).unwrap().sample_size(), 4);
        let e = Sfs::new(1).unwrap_err();
        assert_eq!(e, SimulationError::domain("sample_size", 1));
        assert_eq!(e.to_string(), "invalid value for sample_size: 1");
        assert!(matches!(
            SfsAccumulator::new(0),
            Err(SimulationError::Domain {
                parameter: "sample_size",
                ..
            })
        ));
    }

    #[test]
    fn test_accumulate() {
        let mut acc = SfsAccumulator::new(4).unwrap();
        assert_eq!(acc.mean(), Err(SimulationError::NoReplicates));
        acc.add(&Sfs::from(vec![2, 0, 1])).unwrap();
        acc.add(&Sfs::from(vec![0, 2, 1])).unwrap();
        assert_eq!(acc.replicates(), 2);
        assert_eq!(acc.mean().unwrap().as_slice(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let mut acc = SfsAccumulator::new(4).unwrap();
        assert_eq!(
            acc.add(&Sfs::from(vec![1, 2])),
            Err(SimulationError::SfsLength {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(acc.replicates(), 0);
    }

    #[test]
    fn test_display() {
        let mean = MeanSfs::from(vec![0.5, 1.25]);
        assert_eq!(format!("{mean}"), "[0.5, 1.25]");
    }
}
