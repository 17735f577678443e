// src/services/registry.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use validator::Validate;

use crate::errors::{validation_message, GiftError, RepositoryError};
use crate::models::{GiftRecord, GiftRequest, GiftResponse, RegistryItemResponse};
use crate::repositories::RegistryRepositoryTrait;
use crate::utils::{normalize_email, normalize_name};

/// Shown for items that have no image of their own.
const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/800x600/e8ddd4/5e4838?text=Gift";

#[async_trait]
pub trait RegistryServiceTrait {
    async fn list_items(&self) -> Result<Vec<RegistryItemResponse>, RepositoryError>;
    async fn record_gift(&self, dto: GiftRequest) -> Result<GiftResponse, GiftError>;
}

pub struct RegistryService<T: RegistryRepositoryTrait> {
    repository: Arc<T>,
}

impl<T: RegistryRepositoryTrait> RegistryService<T> {
    pub fn new(repository: Arc<T>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<T: RegistryRepositoryTrait + Send + Sync> RegistryServiceTrait for RegistryService<T> {
    async fn list_items(&self) -> Result<Vec<RegistryItemResponse>, RepositoryError> {
        let items = self.repository.list_all().await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let mut response = RegistryItemResponse::from(item);
                if response.image.is_empty() {
                    response.image = DEFAULT_PLACEHOLDER_IMAGE.to_string();
                }
                response
            })
            .collect())
    }

    async fn record_gift(&self, dto: GiftRequest) -> Result<GiftResponse, GiftError> {
        if let Err(e) = dto.validate() {
            return Err(GiftError::Invalid(validation_message(&e)));
        }

        // Special funds default to a single unit; bounded items must ask for
        // at least one explicitly.
        let quantity = match (dto.quantity, dto.is_special_fund) {
            (0, true) => 1,
            (0, false) => {
                return Err(GiftError::Invalid("Quantity must be at least 1".to_string()))
            }
            (q, _) => q,
        };

        let gift = GiftRecord {
            item_label: dto.item_label,
            first_name: normalize_name(&dto.first_name),
            last_name: normalize_name(&dto.last_name),
            email: dto
                .email
                .as_deref()
                .map(normalize_email)
                .filter(|e| !e.is_empty()),
            quantity,
            is_special_fund: dto.is_special_fund,
        };

        let item = match self.repository.record_gift(&gift).await {
            Ok(item) => item,
            Err(e) => {
                if let GiftError::Repository(inner) = &e {
                    warn!(
                        "Failed to record gift from {} {} for '{}': {}",
                        gift.first_name, gift.last_name, gift.item_label, inner
                    );
                }
                return Err(e);
            }
        };

        let message = if item.is_special_fund {
            format!(
                "Thank you, {} {}, for your generous contribution to our {}!",
                gift.first_name, gift.last_name, item.label
            )
        } else {
            format!(
                "Thank you, {} {}, for gifting us {}!",
                gift.first_name, gift.last_name, item.label
            )
        };

        Ok(GiftResponse {
            success: true,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Quantity, RegistryItem};
    use crate::repositories::MockRegistryRepositoryTrait;

    fn sample_item(label: &str, requested: Quantity, received: u32) -> RegistryItem {
        RegistryItem {
            id: label.to_lowercase().replace(' ', "-"),
            label: label.to_string(),
            description: String::new(),
            price: 100.0,
            image: String::new(),
            alt: String::new(),
            requested_quantity: requested,
            received_quantity: received,
            purchase_link: String::new(),
            is_special_fund: false,
        }
    }

    fn gift_request(label: &str, quantity: u32, is_special_fund: bool) -> GiftRequest {
        GiftRequest {
            first_name: "john".to_string(),
            last_name: "doe".to_string(),
            email: Some("John@Example.com".to_string()),
            quantity,
            item_label: label.to_string(),
            is_special_fund,
        }
    }

    #[tokio::test]
    async fn list_items_applies_placeholder_image() {
        let mut repo = MockRegistryRepositoryTrait::new();
        repo.expect_list_all().returning(|| {
            Ok(vec![sample_item(
                "KitchenAid Stand Mixer",
                Quantity::Bounded(1),
                0,
            )])
        });
        let service = RegistryService::new(Arc::new(repo));

        let items = service.list_items().await.expect("listing should succeed");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].image, DEFAULT_PLACEHOLDER_IMAGE);
        assert_eq!(items[0].requested_quantity, Some(1));
    }

    #[tokio::test]
    async fn record_gift_normalizes_donor_and_passes_quantity_through() {
        let mut repo = MockRegistryRepositoryTrait::new();
        repo.expect_record_gift()
            .withf(|gift| {
                gift.first_name == "John"
                    && gift.last_name == "Doe"
                    && gift.email.as_deref() == Some("john@example.com")
                    && gift.quantity == 2
            })
            .times(1)
            .returning(|_| Ok(sample_item("Luxury Bath Towel Set", Quantity::Bounded(2), 2)));
        let service = RegistryService::new(Arc::new(repo));

        let response = service
            .record_gift(gift_request("Luxury Bath Towel Set", 2, false))
            .await
            .expect("gift should succeed");

        assert!(response.success);
        assert_eq!(
            response.message,
            "Thank you, John Doe, for gifting us Luxury Bath Towel Set!"
        );
    }

    #[tokio::test]
    async fn record_gift_propagates_not_found() {
        let mut repo = MockRegistryRepositoryTrait::new();
        repo.expect_record_gift().returning(|_| {
            Err(GiftError::NotFound {
                label: "Unknown Item".to_string(),
            })
        });
        let service = RegistryService::new(Arc::new(repo));

        let err = service
            .record_gift(gift_request("Unknown Item", 1, false))
            .await
            .expect_err("unknown label should fail");

        assert!(matches!(err, GiftError::NotFound { .. }));
    }

    #[tokio::test]
    async fn special_fund_defaults_quantity_and_uses_contribution_wording() {
        let mut repo = MockRegistryRepositoryTrait::new();
        repo.expect_record_gift()
            .withf(|gift| gift.quantity == 1 && gift.is_special_fund)
            .times(1)
            .returning(|_| {
                let mut item = sample_item("Honeymoon Fund", Quantity::Unlimited, 0);
                item.is_special_fund = true;
                Ok(item)
            });
        let service = RegistryService::new(Arc::new(repo));

        let response = service
            .record_gift(gift_request("Honeymoon Fund", 0, true))
            .await
            .expect("special fund gift should succeed");

        assert_eq!(
            response.message,
            "Thank you, John Doe, for your generous contribution to our Honeymoon Fund!"
        );
    }

    #[tokio::test]
    async fn blank_email_is_accepted_and_recorded_as_absent() {
        let mut repo = MockRegistryRepositoryTrait::new();
        repo.expect_record_gift()
            .withf(|gift| gift.email.is_none())
            .times(1)
            .returning(|_| Ok(sample_item("Dyson Vacuum", Quantity::Bounded(1), 1)));
        let service = RegistryService::new(Arc::new(repo));

        let mut dto = gift_request("Dyson Vacuum", 1, false);
        dto.email = Some(String::new());

        let response = service
            .record_gift(dto)
            .await
            .expect("blank email should not fail validation");

        assert!(response.success);
    }

    #[tokio::test]
    async fn zero_quantity_for_bounded_item_is_rejected_before_the_repository() {
        let repo = MockRegistryRepositoryTrait::new();
        let service = RegistryService::new(Arc::new(repo));

        let err = service
            .record_gift(gift_request("Dyson Vacuum", 0, false))
            .await
            .expect_err("zero quantity should be invalid");

        assert!(matches!(err, GiftError::Invalid(_)));
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let repo = MockRegistryRepositoryTrait::new();
        let service = RegistryService::new(Arc::new(repo));

        let mut dto = gift_request("Dyson Vacuum", 1, false);
        dto.first_name = "   ".to_string();

        let err = service
            .record_gift(dto)
            .await
            .expect_err("blank first name should be invalid");

        assert!(matches!(err, GiftError::Invalid(_)));
    }
}
