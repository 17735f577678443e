use std::io::Error as IoError;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub mod config;
pub mod gift;
pub mod repository;
pub mod rsvp;

pub use config::ConfigError;
pub use gift::GiftError;
pub use repository::RepositoryError;
pub use rsvp::RsvpError;

#[derive(Debug, Error)]
pub enum AppError {
    // Service-level domain errors
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found error: {0}")]
    NotFound(String),
    #[error("Conflict error: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
}

impl AppError {
    /// Short machine-readable kind carried in error response bodies.
    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Database(_)
            | AppError::Config(_)
            | AppError::Logger(_) => "internal",
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            RepositoryError::InvalidData(msg) => AppError::Validation(msg),
            RepositoryError::Database(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<GiftError> for AppError {
    fn from(err: GiftError) -> Self {
        match err {
            e @ GiftError::NotFound { .. } => AppError::NotFound(e.to_string()),
            e @ (GiftError::FullyGifted { .. } | GiftError::QuantityExceeded { .. }) => {
                AppError::Validation(e.to_string())
            }
            GiftError::Invalid(msg) => AppError::Validation(msg),
            GiftError::Repository(e) => e.into(),
        }
    }
}

impl From<RsvpError> for AppError {
    fn from(err: RsvpError) -> Self {
        match err {
            e @ RsvpError::GuestNotFound { .. } => AppError::NotFound(e.to_string()),
            RsvpError::Invalid(msg) => AppError::Validation(msg),
            RsvpError::Repository(e) => e.into(),
        }
    }
}

/// Flatten `validator` field errors into a single message string.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let reasons = errs
                .iter()
                .map(|e| e.message.clone().unwrap_or_else(|| "invalid".into()))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", field, reasons)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Database(_)
            | AppError::Config(_)
            | AppError::Logger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Business-rule rejections carry their message to the client; system
        // failures are logged in full and surfaced opaquely.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self);
            "An unexpected error occurred. Please try again later.".to_string()
        } else {
            match self {
                AppError::Validation(msg)
                | AppError::NotFound(msg)
                | AppError::Conflict(msg) => msg.clone(),
                _ => self.to_string(),
            }
        };

        HttpResponse::build(status).json(json!({
            "success": false,
            "message": message,
            "error": self.kind(),
        }))
    }
}
