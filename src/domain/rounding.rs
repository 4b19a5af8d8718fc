//! Explicit rounding direction.

/// Rounding direction for every division in the crate.
///
/// There is no implicit truncation: callers always say which way a
/// quotient goes.  Quantities paid out by the pool round
/// [`Down`](Self::Down); quantities paid in (inputs, fees, used deposit
/// amounts) round [`Up`](Self::Up).
///
/// # Examples
///
/// ```
/// use weighted_amm_core::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert_eq!(Rounding::Up.opposite(), Rounding::Down);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Towards positive infinity.
    Up,
    /// Towards zero.
    Down,
}

impl Rounding {
    /// `true` for [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// `true` for [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }

    /// The other direction.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}
