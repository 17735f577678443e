use thiserror::Error;

use super::repository::RepositoryError;

/// Outcome channel for RSVP submissions.
#[derive(Debug, Error)]
pub enum RsvpError {
    #[error("{first_name} {last_name} was not found in the guest list")]
    GuestNotFound {
        first_name: String,
        last_name: String,
    },

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
