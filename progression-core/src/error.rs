//! Error taxonomy for record mutations.
//!
//! Every operation either succeeds completely or returns one of these
//! without touching the record.

/// Rejection raised by an engine, check-in or edit operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid {collection} index {index} (have {len})")]
    Index {
        collection: &'static str,
        index: usize,
        len: usize,
    },
    #[error("Item not found: {0}")]
    NotFound(u32),
    #[error("Not enough coins: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },
}

impl ProgressionError {
    /// Bounds check shared by every index-addressed collection
    pub fn check_index(collection: &'static str, index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::Index {
                collection,
                index,
                len,
            })
        }
    }
}

pub type ProgressionResult<T> = Result<T, ProgressionError>;
