//! Schedule frequency.

/// Frequency of regular schedule dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    /// Every three months, the index tranche roll frequency
    #[default]
    Quarterly,
    /// No intermediate dates
    Zero,
}

impl Frequency {
    /// Months between two regular dates, 0 for [`Frequency::Zero`].
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        match self {
            Frequency::Quarterly => 3,
            Frequency::Zero => 0,
        }
    }

    /// Returns true if there are no periodic dates.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Frequency::Zero)
    }
}
