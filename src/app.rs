use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, CorsConfig, Environment},
    db::Database,
    errors::AppError,
    middleware::RateLimiter,
    routes, seed, services,
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

// Build the CORS policy from configuration
fn build_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-http-method-override"),
        ])
        .max_age(3600);

    if config.allowed_origins.trim() == "*" {
        cors.allow_any_origin()
    } else {
        config
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    // Setup enhanced logging based on configuration
    setup_logging(&config)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    // Log startup information
    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);

    let db = Database::connect(&config.db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    // --seed: load development sample data and exit
    if env::args().any(|arg| arg == "--seed") {
        if config.app.environment != Environment::Development {
            return Err(AppError::Config(
                "Seeding is only allowed in the development environment".to_string(),
            ));
        }
        seed::seed_sample_data(&db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        db.shutdown().await;
        return Ok(());
    }

    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    // One limiter per server process, shared across all workers
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit.max_requests,
        Duration::from_secs(config.rate_limit.window_seconds),
        Duration::from_secs(config.rate_limit.sweep_interval_seconds),
    ));

    // Determine if we should enable more verbose logging
    let enable_debug_logging = config.app.environment != Environment::Production;

    // Determine log format based on environment
    let log_format = if enable_debug_logging {
        // Detailed format for development/testing
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\""
    } else {
        // Simple format for production
        "%a \"%r\" %s %b %T"
    };

    // Clones for the app factory closure
    let app_config = config.clone();
    let app_db = db.clone();
    let app_limiter = Arc::clone(&limiter);

    // Start the HTTP server
    HttpServer::new(move || {
        let limiter = Arc::clone(&app_limiter);
        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                db: app_db.clone(),
                version: app_config.app.version.clone(),
            }))
            // Malformed JSON comes back in the standard error shape
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid JSON: {}", err)).into()
            }))
            .wrap(Logger::new(log_format))
            // Registered last so it runs first: preflights never reach the limiter
            .wrap(build_cors(&app_config.cors))
            .configure(|cfg| services::register(app_db.clone(), cfg))
            .configure(|cfg| routes::configure_routes(cfg, limiter))
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    // Orderly shutdown: no sweeps or pool activity past this point
    limiter.stop();
    db.shutdown().await;

    Ok(())
}
