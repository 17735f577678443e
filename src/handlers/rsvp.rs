use actix_web::{web, HttpResponse, Responder};

use crate::{
    models::RsvpRequest,
    repositories::RsvpRepository,
    services::{RsvpService, RsvpServiceTrait},
    types::Result,
};

pub type RsvpServiceType = RsvpService<RsvpRepository>;

/// Submit RSVP route handler
pub async fn submit_rsvp_handler(
    dto: web::Json<RsvpRequest>,
    service: web::Data<RsvpServiceType>,
) -> Result<impl Responder> {
    let response = service.submit_rsvp(dto.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
