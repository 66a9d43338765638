/// A position/coordinate within a genome.
///
/// Genomes are half-open intervals `[0, length)` of
/// non-negative integer positions.  Under the
/// infinitely-many sites model a position identifies
/// a mutation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, std::hash::Hash)]
#[repr(transparent)]
pub struct Position(pub(crate) i64);

impl Position {
    /// Create a new Position
    ///
    /// # Returns
    ///
    /// * `Some` if `position` is non-negative
    /// * `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// let p = forrustts_core::Position::new(10).unwrap();
    /// assert_eq!(p, 10); // can be compared to i64
    /// # assert_eq!(10, p);
    /// # assert!(p >= 10);
    /// # assert!(0 < p);
    /// let p2 = forrustts_core::Position::new(11).unwrap();
    /// assert!(p < p2);
    /// assert!(forrustts_core::Position::new(-1).is_none());
    /// ```
    pub fn new(position: i64) -> Option<Self> {
        if position >= 0 {
            Some(Self(position))
        } else {
            None
        }
    }

    /// The underlying integer.
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<i64> for Position {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl PartialEq<Position> for i64 {
    fn eq(&self, other: &Position) -> bool {
        *self == other.0
    }
}

impl PartialOrd<i64> for Position {
    fn partial_cmp(&self, other: &i64) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl PartialOrd<Position> for i64 {
    fn partial_cmp(&self, other: &Position) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&other.0)
    }
}

impl TryFrom<i64> for Position {
    type Error = crate::Error;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(crate::Error::PositionError(value))
    }
}

impl TryFrom<i32> for Position {
    type Error = crate::Error;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<Position> for i64 {
    fn from(value: Position) -> Self {
        value.0
    }
}
