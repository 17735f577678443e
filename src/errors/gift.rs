use thiserror::Error;

use super::repository::RepositoryError;

/// Outcome channel for gift recording. The first four variants are
/// business-rule rejections the donor can correct by changing their input;
/// `Repository` wraps infrastructure failures.
#[derive(Debug, Error)]
pub enum GiftError {
    #[error("Registry item '{label}' was not found")]
    NotFound { label: String },

    #[error("Thank you, but '{label}' has already been fully gifted!")]
    FullyGifted { label: String },

    #[error("Only {remaining} more of '{label}' needed. Please adjust your quantity.")]
    QuantityExceeded { label: String, remaining: u32 },

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
