// src/repositories/rsvp.rs - Data access for the guest list
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::Database;
use crate::errors::RepositoryError;
use crate::models::{Guest, RsvpUpdate};

type Result<T, E = RepositoryError> = std::result::Result<T, E>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RsvpRepositoryTrait {
    /// Finds a guest by name pair, case-insensitively
    ///
    /// ### Returns
    /// * `Result<Option<Guest>>` - The guest if found, or `None`
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn find_guest(&self, first_name: &str, last_name: &str) -> Result<Option<Guest>>;

    /// Applies an RSVP submission to a guest row
    ///
    /// Sets the attendance answer, refreshes `updated_at`, and overwrites
    /// contact fields only when the update carries a value for them.
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - If the guest row no longer exists
    /// * `RepositoryError::Database` - If a database error occurs
    async fn update_rsvp(&self, id: Uuid, update: &RsvpUpdate) -> Result<Guest>;
}

// Implementation using the actual database
pub struct RsvpRepository {
    pool: PgPool,
}

impl RsvpRepository {
    pub fn new(db: Database) -> Self {
        Self {
            pool: db.get_pool().clone(),
        }
    }
}

#[async_trait]
impl RsvpRepositoryTrait for RsvpRepository {
    async fn find_guest(&self, first_name: &str, last_name: &str) -> Result<Option<Guest>> {
        let guest = sqlx::query_as::<_, Guest>(
            "SELECT id, first_name, last_name, email, phone, attending, updated_at \
             FROM guests \
             WHERE LOWER(first_name) = LOWER($1) AND LOWER(last_name) = LOWER($2) \
             LIMIT 1",
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(guest)
    }

    async fn update_rsvp(&self, id: Uuid, update: &RsvpUpdate) -> Result<Guest> {
        // NULL contact binds keep whatever is already stored
        let guest = sqlx::query_as::<_, Guest>(
            "UPDATE guests \
             SET attending  = $1, \
                 updated_at = $2, \
                 email      = COALESCE($3, email), \
                 phone      = COALESCE($4, phone) \
             WHERE id = $5 \
             RETURNING id, first_name, last_name, email, phone, attending, updated_at",
        )
        .bind(update.attending)
        .bind(Utc::now())
        .bind(&update.email)
        .bind(&update.phone)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        guest.ok_or_else(|| RepositoryError::NotFound(format!("Guest with ID {} not found", id)))
    }
}
