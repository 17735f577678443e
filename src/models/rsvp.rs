// src/models/rsvp.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validations::{validate_contact_email, validate_person_name};

/// Represents a guest-list entry in the system
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Guest {
    pub id: Uuid,

    /// Lookup key, stored title-case normalized
    pub first_name: String,

    pub last_name: String,

    pub email: Option<String>,

    pub phone: Option<String>,

    /// Tri-state: `None` until the guest responds for the first time
    pub attending: Option<bool>,

    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields an RSVP submission applies to a guest row. `None` contact fields
/// leave the stored values untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RsvpUpdate {
    pub attending: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// DTO for submitting an RSVP
#[derive(Debug, Deserialize, Validate)]
pub struct RsvpRequest {
    #[serde(rename = "firstname")]
    #[validate(custom(function = "validate_person_name"))]
    pub first_name: String,

    #[serde(rename = "lastname")]
    #[validate(custom(function = "validate_person_name"))]
    pub last_name: String,

    /// Blank means the guest left the field empty; only non-blank values are
    /// format-checked.
    #[serde(default)]
    #[validate(custom(function = "validate_contact_email"))]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    pub attending: bool,
}

// Response after an RSVP is submitted
#[derive(Debug, Serialize)]
pub struct RsvpResponse {
    pub success: bool,
    pub message: String,
}
