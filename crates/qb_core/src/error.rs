use thiserror::Error;

use crate::models::Quarter;
use crate::store::StoreError;

/// Errors surfaced by lineup mutations.
///
/// All of these are recoverable by the caller: the visible sheet state is
/// untouched whenever one is returned, so the UI can show the message and
/// keep rendering from the same state.
#[derive(Error, Debug)]
pub enum LineupError {
    #[error("match roster incomplete: {found} called up, {} required", crate::MIN_CALL_UPS)]
    IncompleteCallUp { found: usize },

    #[error("quarter {quarter} is full: {full} full assignments + {pairs} active pairs")]
    CapacityExceeded { quarter: Quarter, full: usize, pairs: usize },

    #[error("invalid substitution pair: {reason}")]
    InvalidSubstitutionPair { reason: String },

    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl LineupError {
    /// Whether the caller can meaningfully retry after fixing the input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            LineupError::Persistence(e) => e.is_recoverable(),
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, LineupError>;
