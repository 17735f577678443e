use std::time::Instant;

use serde::Serialize;

use crate::db::{Database, DatabaseHealth};
use crate::errors::AppError;

/// Handler result type; `AppError` renders the HTTP error response.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Serialize)]
pub struct ResponsePayload {
    pub status: i32,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub db_health: Option<DatabaseHealth>,
    pub uptime_seconds: u64,
}

// Define an AppState struct to hold shared application state
pub struct AppState {
    pub start_time: Instant,
    pub db: Database,
    pub version: String,
}
