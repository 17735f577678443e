// src/services/rsvp.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use validator::Validate;

use crate::errors::{validation_message, RsvpError};
use crate::models::{RsvpRequest, RsvpResponse, RsvpUpdate};
use crate::repositories::RsvpRepositoryTrait;
use crate::utils::{normalize_email, normalize_name, normalize_phone};

#[async_trait]
pub trait RsvpServiceTrait {
    async fn submit_rsvp(&self, dto: RsvpRequest) -> Result<RsvpResponse, RsvpError>;
}

pub struct RsvpService<T: RsvpRepositoryTrait> {
    repository: Arc<T>,
}

impl<T: RsvpRepositoryTrait> RsvpService<T> {
    pub fn new(repository: Arc<T>) -> Self {
        Self { repository }
    }
}

fn attending_label(attending: bool) -> &'static str {
    if attending {
        "attending"
    } else {
        "not attending"
    }
}

#[async_trait]
impl<T: RsvpRepositoryTrait + Send + Sync> RsvpServiceTrait for RsvpService<T> {
    async fn submit_rsvp(&self, dto: RsvpRequest) -> Result<RsvpResponse, RsvpError> {
        if let Err(e) = dto.validate() {
            return Err(RsvpError::Invalid(validation_message(&e)));
        }

        let first_name = normalize_name(&dto.first_name);
        let last_name = normalize_name(&dto.last_name);

        // See if the requestor is on the guest list
        let guest = match self.repository.find_guest(&first_name, &last_name).await {
            Ok(Some(guest)) => guest,
            Ok(None) => {
                return Err(RsvpError::GuestNotFound {
                    first_name,
                    last_name,
                })
            }
            Err(e) => {
                warn!(
                    "Guest lookup failed for {} {}: {}",
                    first_name, last_name, e
                );
                return Err(e.into());
            }
        };

        let previous_status = guest.attending;

        let update = RsvpUpdate {
            attending: dto.attending,
            email: dto
                .email
                .as_deref()
                .map(normalize_email)
                .filter(|e| !e.is_empty()),
            phone: dto
                .phone
                .as_deref()
                .map(normalize_phone)
                .filter(|p| !p.is_empty()),
        };

        // Written even when the attendance answer is unchanged, so a guest
        // resubmitting with a new email or phone still gets it saved.
        let updated = self.repository.update_rsvp(guest.id, &update).await?;

        let status = attending_label(dto.attending);
        let message = match previous_status {
            None => format!(
                "{} {} has been RSVP'd as: {}",
                updated.first_name, updated.last_name, status
            ),
            Some(previous) if previous == dto.attending => format!(
                "{} {} was already RSVP'd as {}; their details have been updated",
                updated.first_name, updated.last_name, status
            ),
            Some(previous) => format!(
                "{} {} was previously RSVP'd as: {}, but has now been changed to be: {}",
                updated.first_name,
                updated.last_name,
                attending_label(previous),
                status
            ),
        };

        Ok(RsvpResponse {
            success: true,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Guest;
    use crate::repositories::MockRsvpRepositoryTrait;
    use uuid::Uuid;

    fn sample_guest(attending: Option<bool>) -> Guest {
        Guest {
            id: Uuid::new_v4(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: Some("john@example.com".to_string()),
            phone: None,
            attending,
            updated_at: None,
        }
    }

    fn rsvp_request(attending: bool) -> RsvpRequest {
        RsvpRequest {
            first_name: "JOHN".to_string(),
            last_name: "doe".to_string(),
            email: None,
            phone: None,
            attending,
        }
    }

    #[tokio::test]
    async fn unknown_guest_is_rejected() {
        let mut repo = MockRsvpRepositoryTrait::new();
        repo.expect_find_guest().returning(|_, _| Ok(None));
        let service = RsvpService::new(Arc::new(repo));

        let err = service
            .submit_rsvp(rsvp_request(true))
            .await
            .expect_err("unknown guest should fail");

        match err {
            RsvpError::GuestNotFound {
                first_name,
                last_name,
            } => {
                // Lookup happens on the normalized names
                assert_eq!(first_name, "John");
                assert_eq!(last_name, "Doe");
            }
            other => panic!("expected GuestNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn first_time_rsvp_reports_new_status() {
        let guest = sample_guest(None);
        let guest_id = guest.id;

        let mut repo = MockRsvpRepositoryTrait::new();
        repo.expect_find_guest()
            .withf(|first, last| first == "John" && last == "Doe")
            .returning(move |_, _| Ok(Some(guest.clone())));
        repo.expect_update_rsvp()
            .withf(move |id, update| *id == guest_id && update.attending)
            .times(1)
            .returning(|_, update| {
                let mut updated = sample_guest(Some(update.attending));
                updated.updated_at = Some(chrono::Utc::now());
                Ok(updated)
            });
        let service = RsvpService::new(Arc::new(repo));

        let response = service
            .submit_rsvp(rsvp_request(true))
            .await
            .expect("first-time RSVP should succeed");

        assert!(response.success);
        assert_eq!(response.message, "John Doe has been RSVP'd as: attending");
    }

    #[tokio::test]
    async fn changed_status_reports_previous_and_new() {
        let mut repo = MockRsvpRepositoryTrait::new();
        repo.expect_find_guest()
            .returning(|_, _| Ok(Some(sample_guest(Some(true)))));
        repo.expect_update_rsvp()
            .times(1)
            .returning(|_, update| Ok(sample_guest(Some(update.attending))));
        let service = RsvpService::new(Arc::new(repo));

        let response = service
            .submit_rsvp(rsvp_request(false))
            .await
            .expect("status change should succeed");

        assert_eq!(
            response.message,
            "John Doe was previously RSVP'd as: attending, but has now been changed to be: not attending"
        );
    }

    #[tokio::test]
    async fn unchanged_status_still_writes_to_capture_contact_updates() {
        let mut repo = MockRsvpRepositoryTrait::new();
        repo.expect_find_guest()
            .returning(|_, _| Ok(Some(sample_guest(Some(true)))));
        repo.expect_update_rsvp()
            .withf(|_, update| {
                update.attending
                    && update.email.as_deref() == Some("new@example.com")
                    && update.phone.as_deref() == Some("(555) 123-4567")
            })
            .times(1)
            .returning(|_, update| Ok(sample_guest(Some(update.attending))));
        let service = RsvpService::new(Arc::new(repo));

        let mut dto = rsvp_request(true);
        dto.email = Some("  NEW@example.com ".to_string());
        dto.phone = Some("555-123-4567".to_string());

        let response = service
            .submit_rsvp(dto)
            .await
            .expect("resubmission should succeed");

        assert_eq!(
            response.message,
            "John Doe was already RSVP'd as attending; their details have been updated"
        );
    }

    #[tokio::test]
    async fn blank_names_are_rejected_before_lookup() {
        let repo = MockRsvpRepositoryTrait::new();
        let service = RsvpService::new(Arc::new(repo));

        let mut dto = rsvp_request(true);
        dto.last_name = String::new();

        let err = service
            .submit_rsvp(dto)
            .await
            .expect_err("blank last name should be invalid");

        assert!(matches!(err, RsvpError::Invalid(_)));
    }
}
