use std::sync::Arc;

use actix_web::web;

mod registry;
mod rsvp;

pub use registry::{RegistryService, RegistryServiceTrait};
pub use rsvp::{RsvpService, RsvpServiceTrait};

use crate::{
    db::Database,
    repositories::{RegistryRepository, RsvpRepository},
};

/// Service Register
pub fn register(db: Database, cfg: &mut web::ServiceConfig) {
    // create repositories and wire them into their services
    let registry_repository = RegistryRepository::new(db.clone());
    let registry_service = RegistryService::new(Arc::new(registry_repository));
    cfg.app_data(web::Data::new(registry_service));

    let rsvp_repository = RsvpRepository::new(db);
    let rsvp_service = RsvpService::new(Arc::new(rsvp_repository));
    cfg.app_data(web::Data::new(rsvp_service));
}
