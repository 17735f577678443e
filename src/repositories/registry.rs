// src/repositories/registry.rs - Data access for registry items and gifts
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::Database;
use crate::errors::{GiftError, RepositoryError};
use crate::models::{GiftRecord, Quantity, RegistryItem};

/// How long a listing result is served from memory before the next request
/// goes back to the database.
const CACHE_TTL: Duration = Duration::from_secs(30);

type Result<T, E = RepositoryError> = std::result::Result<T, E>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistryRepositoryTrait {
    /// Returns every registry item, possibly served from the listing cache
    ///
    /// ### Returns
    /// * `Result<Vec<RegistryItem>>` - All items, in stable id order
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn list_all(&self) -> Result<Vec<RegistryItem>>;

    /// Atomically validates availability and appends the gift record
    ///
    /// The lookup, the capacity check, the received-quantity increment, and
    /// the record append happen inside one transaction; either the increment
    /// and the append both commit or neither does.
    ///
    /// ### Arguments
    /// * `gift` - The gift to record; the creation timestamp is assigned here
    ///
    /// ### Returns
    /// * `Result<RegistryItem, GiftError>` - The post-increment item snapshot
    ///
    /// ### Errors
    /// * `GiftError::NotFound` - No item carries the requested label
    /// * `GiftError::FullyGifted` - The item has no remaining capacity
    /// * `GiftError::QuantityExceeded` - The gift asks for more than remains
    /// * `GiftError::Repository` - If a database error occurs
    async fn record_gift(&self, gift: &GiftRecord) -> Result<RegistryItem, GiftError>;
}

#[derive(FromRow)]
struct RegistryItemRow {
    id: String,
    label: String,
    description: String,
    price: f64,
    image: String,
    alt: String,
    requested_quantity: Option<i32>,
    received_quantity: i32,
    purchase_link: String,
    is_special_fund: bool,
}

impl From<RegistryItemRow> for RegistryItem {
    fn from(row: RegistryItemRow) -> Self {
        RegistryItem {
            id: row.id,
            label: row.label,
            description: row.description,
            price: row.price,
            image: row.image,
            alt: row.alt,
            requested_quantity: Quantity::from_db(row.requested_quantity),
            received_quantity: row.received_quantity.max(0) as u32,
            purchase_link: row.purchase_link,
            is_special_fund: row.is_special_fund,
        }
    }
}

const SELECT_ITEM_COLUMNS: &str = "id, label, description, price, image, alt, \
     requested_quantity, received_quantity, purchase_link, is_special_fund";

/// Capacity check for a single gift attempt. Pure so the rule is testable
/// without a database; the transaction calls it on a row-locked read.
fn validate_gift_capacity(item: &RegistryItem, quantity: u32) -> Result<(), GiftError> {
    if item.is_special_fund {
        return Ok(());
    }

    match item.requested_quantity.remaining(item.received_quantity) {
        None => Ok(()),
        Some(0) => Err(GiftError::FullyGifted {
            label: item.label.clone(),
        }),
        Some(remaining) if quantity > remaining => Err(GiftError::QuantityExceeded {
            label: item.label.clone(),
            remaining,
        }),
        Some(_) => Ok(()),
    }
}

struct CachedListing {
    items: Vec<RegistryItem>,
    fetched_at: Instant,
}

// Implementation using the actual database
pub struct RegistryRepository {
    pool: PgPool,
    cache: RwLock<Option<CachedListing>>,
}

impl RegistryRepository {
    pub fn new(db: Database) -> Self {
        Self {
            pool: db.get_pool().clone(),
            cache: RwLock::new(None),
        }
    }

    // Helper method for transactions
    async fn begin_transaction(&self) -> Result<Transaction<'_, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            log::error!("Failed to start database transaction: {}", e);
            RepositoryError::Database(e)
        })
    }

    async fn invalidate_cache(&self) {
        *self.cache.write().await = None;
    }
}

#[async_trait]
impl RegistryRepositoryTrait for RegistryRepository {
    async fn list_all(&self) -> Result<Vec<RegistryItem>> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < CACHE_TTL {
                    return Ok(cached.items.clone());
                }
            }
        }

        // Cache miss - fetch every item in a single query
        let rows = sqlx::query_as::<_, RegistryItemRow>(&format!(
            "SELECT {} FROM registry_items ORDER BY id",
            SELECT_ITEM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        let items: Vec<RegistryItem> = rows.into_iter().map(RegistryItem::from).collect();

        *self.cache.write().await = Some(CachedListing {
            items: items.clone(),
            fetched_at: Instant::now(),
        });

        Ok(items)
    }

    async fn record_gift(&self, gift: &GiftRecord) -> Result<RegistryItem, GiftError> {
        let mut tx = self.begin_transaction().await?;

        // Row-lock the item so concurrent gifts for the same label serialize.
        // Dropping the transaction on any early return rolls everything back.
        let row = sqlx::query_as::<_, RegistryItemRow>(&format!(
            "SELECT {} FROM registry_items WHERE label = $1 LIMIT 1 FOR UPDATE",
            SELECT_ITEM_COLUMNS
        ))
        .bind(&gift.item_label)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        let Some(row) = row else {
            return Err(GiftError::NotFound {
                label: gift.item_label.clone(),
            });
        };
        let mut item = RegistryItem::from(row);

        validate_gift_capacity(&item, gift.quantity)?;

        // Bounded items track how many units have been received
        if !item.is_special_fund && item.requested_quantity != Quantity::Unlimited {
            let new_received = item.received_quantity + gift.quantity;
            sqlx::query("UPDATE registry_items SET received_quantity = $1 WHERE id = $2")
                .bind(new_received as i32)
                .bind(&item.id)
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from)?;
            item.received_quantity = new_received;
        }

        sqlx::query(
            "INSERT INTO gifts \
             (id, item_label, first_name, last_name, email, quantity, is_special_fund, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(Uuid::new_v4())
        .bind(&gift.item_label)
        .bind(&gift.first_name)
        .bind(&gift.last_name)
        .bind(&gift.email)
        .bind(gift.quantity as i32)
        .bind(gift.is_special_fund)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit gift transaction: {}", e);
            GiftError::Repository(RepositoryError::Database(e))
        })?;

        debug!("Recorded gift of {} x '{}'", gift.quantity, gift.item_label);

        // A stale listing must not keep showing the old received count
        self.invalidate_cache().await;

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded_item(requested: u32, received: u32) -> RegistryItem {
        RegistryItem {
            id: "le-creuset".to_string(),
            label: "Le Creuset Dutch Oven".to_string(),
            description: String::new(),
            price: 400.0,
            image: String::new(),
            alt: String::new(),
            requested_quantity: Quantity::Bounded(requested),
            received_quantity: received,
            purchase_link: String::new(),
            is_special_fund: false,
        }
    }

    #[test]
    fn gift_within_remaining_capacity_passes() {
        let item = bounded_item(2, 1);
        assert!(validate_gift_capacity(&item, 1).is_ok());
    }

    #[test]
    fn fully_gifted_item_rejects_any_quantity() {
        let item = bounded_item(1, 1);
        match validate_gift_capacity(&item, 1) {
            Err(GiftError::FullyGifted { label }) => {
                assert_eq!(label, "Le Creuset Dutch Oven");
            }
            other => panic!("expected FullyGifted, got {:?}", other),
        }
    }

    #[test]
    fn quantity_above_remaining_is_rejected_with_remaining_count() {
        let item = bounded_item(3, 1);
        match validate_gift_capacity(&item, 5) {
            Err(GiftError::QuantityExceeded { remaining, .. }) => {
                assert_eq!(remaining, 2);
            }
            other => panic!("expected QuantityExceeded, got {:?}", other),
        }
    }

    #[test]
    fn unlimited_item_always_passes() {
        let mut item = bounded_item(0, 50);
        item.requested_quantity = Quantity::Unlimited;
        assert!(validate_gift_capacity(&item, 1000).is_ok());
    }

    #[test]
    fn special_fund_skips_capacity_checks() {
        let mut item = bounded_item(1, 1);
        item.is_special_fund = true;
        assert!(validate_gift_capacity(&item, 10).is_ok());
    }
}
