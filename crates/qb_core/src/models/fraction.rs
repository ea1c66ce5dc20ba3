use serde::{Deserialize, Serialize};

/// A player's participation credit in one quarter.
///
/// `Half` only ever appears as the two sides of an active substitution
/// pair. A player dragged straight to the bench goes to `None` instead,
/// which is a materially different outcome (no credit vs. half credit).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Fraction {
    #[default]
    None,
    Half,
    Full,
}

impl Fraction {
    /// Credit value used for periods-played accounting.
    #[inline]
    pub const fn value(self) -> f64 {
        match self {
            Fraction::None => 0.0,
            Fraction::Half => 0.5,
            Fraction::Full => 1.0,
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Fraction::None)
    }

    #[inline]
    pub const fn is_full(self) -> bool {
        matches!(self, Fraction::Full)
    }
}
