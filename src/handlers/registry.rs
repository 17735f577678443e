use actix_web::{web, HttpResponse, Responder};

use crate::{
    models::{GiftRequest, RegistryItemsResponse},
    repositories::RegistryRepository,
    services::{RegistryService, RegistryServiceTrait},
    types::Result,
};

pub type RegistryServiceType = RegistryService<RegistryRepository>;

/// List registry items route handler
pub async fn list_items_handler(service: web::Data<RegistryServiceType>) -> Result<impl Responder> {
    let items = service.list_items().await?;
    Ok(HttpResponse::Ok().json(RegistryItemsResponse {
        success: true,
        items,
    }))
}

/// Record gift route handler
pub async fn record_gift_handler(
    dto: web::Json<GiftRequest>,
    service: web::Data<RegistryServiceType>,
) -> Result<impl Responder> {
    let response = service.record_gift(dto.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
