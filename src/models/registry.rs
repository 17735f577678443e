// src/models/registry.rs - Pure data structures
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validations::{validate_contact_email, validate_person_name};

/// How many units of a registry item the couple asked for.
///
/// Stored as a nullable integer; `NULL` means no ceiling and capacity checks
/// do not apply (cash funds and other open-ended items).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Unlimited,
    Bounded(u32),
}

impl Quantity {
    /// A non-positive stored value has no bounded meaning.
    pub fn from_db(raw: Option<i32>) -> Self {
        match raw {
            Some(n) if n > 0 => Quantity::Bounded(n as u32),
            _ => Quantity::Unlimited,
        }
    }

    /// The ceiling as an optional count, for response payloads.
    pub fn bounded(&self) -> Option<u32> {
        match self {
            Quantity::Unlimited => None,
            Quantity::Bounded(n) => Some(*n),
        }
    }

    /// Units still needed, or `None` when there is no ceiling.
    pub fn remaining(&self, received: u32) -> Option<u32> {
        match self {
            Quantity::Unlimited => None,
            Quantity::Bounded(requested) => Some(requested.saturating_sub(received)),
        }
    }
}

/// Represents a gift-registry item in the system
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryItem {
    /// Stable identifier (slug)
    pub id: String,

    /// Display label, also the unique lookup key for gifting
    pub label: String,

    pub description: String,

    pub price: f64,

    pub image: String,

    pub alt: String,

    /// Requested ceiling; `received_quantity` may never exceed it
    pub requested_quantity: Quantity,

    pub received_quantity: u32,

    pub purchase_link: String,

    /// Special funds bypass capacity checks entirely
    pub is_special_fund: bool,
}

/// The fact appended by a successful gift transaction. Rows derived from this
/// are never updated or deleted; the creation timestamp is assigned by the
/// repository at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftRecord {
    pub item_label: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub quantity: u32,
    pub is_special_fund: bool,
}

// DTO for recording a gift
#[derive(Debug, Deserialize, Validate)]
pub struct GiftRequest {
    #[serde(rename = "firstname")]
    #[validate(custom(function = "validate_person_name"))]
    pub first_name: String,

    #[serde(rename = "lastname")]
    #[validate(custom(function = "validate_person_name"))]
    pub last_name: String,

    /// Blank means the donor left the field empty; only non-blank values are
    /// format-checked.
    #[serde(default)]
    #[validate(custom(function = "validate_contact_email"))]
    pub email: Option<String>,

    /// Missing quantity deserializes to 0; the service requires at least 1
    /// for bounded items and defaults special funds to 1.
    #[serde(default)]
    #[validate(range(max = 10_000, message = "Quantity is unreasonably large"))]
    pub quantity: u32,

    #[serde(rename = "itemLabel")]
    #[validate(length(min = 1, message = "Item label is required"))]
    pub item_label: String,

    #[serde(rename = "isSpecialFund", default)]
    pub is_special_fund: bool,
}

// DTO for a registry item (matches the frontend RegistryItem interface)
#[derive(Debug, Serialize)]
pub struct RegistryItemResponse {
    pub id: String,
    pub label: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub alt: String,
    pub requested_quantity: Option<u32>,
    pub received_quantity: u32,
    pub purchase_link: String,
    #[serde(rename = "isSpecialFund")]
    pub is_special_fund: bool,
}

impl From<RegistryItem> for RegistryItemResponse {
    fn from(item: RegistryItem) -> Self {
        RegistryItemResponse {
            id: item.id,
            label: item.label,
            description: item.description,
            price: item.price,
            image: item.image,
            alt: item.alt,
            requested_quantity: item.requested_quantity.bounded(),
            received_quantity: item.received_quantity,
            purchase_link: item.purchase_link,
            is_special_fund: item.is_special_fund,
        }
    }
}

// Response for listing all registry items
#[derive(Debug, Serialize)]
pub struct RegistryItemsResponse {
    pub success: bool,
    pub items: Vec<RegistryItemResponse>,
}

// Response after a gift is recorded
#[derive(Debug, Serialize)]
pub struct GiftResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_round_trips_through_db_representation() {
        assert_eq!(Quantity::from_db(None), Quantity::Unlimited);
        assert_eq!(Quantity::from_db(Some(3)), Quantity::Bounded(3));
        assert_eq!(Quantity::Bounded(3).bounded(), Some(3));
        assert_eq!(Quantity::Unlimited.bounded(), None);
    }

    #[test]
    fn non_positive_stored_quantity_reads_as_unlimited() {
        assert_eq!(Quantity::from_db(Some(0)), Quantity::Unlimited);
        assert_eq!(Quantity::from_db(Some(-2)), Quantity::Unlimited);
    }

    #[test]
    fn remaining_saturates_at_zero() {
        assert_eq!(Quantity::Bounded(2).remaining(0), Some(2));
        assert_eq!(Quantity::Bounded(2).remaining(2), Some(0));
        assert_eq!(Quantity::Bounded(2).remaining(5), Some(0));
        assert_eq!(Quantity::Unlimited.remaining(100), None);
    }
}
