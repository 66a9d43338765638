/// A time value, measured in generations since
/// the start of a simulation.
///
/// ```
/// let t = forrustts_core::Time::from(3_i64);
/// assert_eq!(t.next(), forrustts_core::Time::from(4_i64));
/// assert_eq!(i64::from(t), 3);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub struct Time(i64);

impl Time {
    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn raw(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Time {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Time {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(i64::from(value))
    }
}

impl From<Time> for i64 {
    fn from(value: Time) -> Self {
        value.0
    }
}
