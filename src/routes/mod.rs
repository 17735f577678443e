use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};

use crate::handlers::{list_items_handler, record_gift_handler, submit_rsvp_handler};
use crate::middleware::{RateLimit, RateLimiter};
use crate::types::{AppState, HealthStatus, ResponsePayload};

// Handler function for the root route "/"
async fn index() -> impl Responder {
    let welcome_message = ResponsePayload {
        status: 200,
        message: String::from("Welcome to the wedding website API!"),
    };

    // Return the struct as JSON
    HttpResponse::Ok().json(welcome_message)
}

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    // Calculate uptime in seconds
    let uptime = data.start_time.elapsed().as_secs();

    let db_health = data.db.health_check().await;

    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        db_health: Some(db_health),
        uptime_seconds: uptime,
    };

    // Return the status as JSON
    HttpResponse::Ok().json(status)
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig, limiter: Arc<RateLimiter>) {
    cfg.route("/", web::get().to(index));
    cfg.route("/health", web::get().to(health_check));

    // Only the public API sits behind the rate limiter
    cfg.service(
        web::scope("/v1/api")
            .wrap(RateLimit::new(limiter))
            .route("/registry", web::get().to(list_items_handler))
            .route("/registry/gift", web::post().to(record_gift_handler))
            // PATCH is canonical; POST covers proxies that cannot send it
            .route("/rsvp", web::patch().to(submit_rsvp_handler))
            .route("/rsvp", web::post().to(submit_rsvp_handler)),
    );
}
