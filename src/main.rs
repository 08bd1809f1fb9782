use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use roomly_match::config::Settings;
use roomly_match::core::{Ranker, Scorer, ScoringConfig, SwipeTracker, SystemClock};
use roomly_match::routes::{self, AppState};
use roomly_match::services::{BreakdownCache, InMemoryMatchStore, InMemoryProfileStore, InMemorySwipeStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| io_error(format!("Configuration error: {}", e)))?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Roomly matching service...");

    let scoring = ScoringConfig::new(settings.scoring_weights()).map_err(|e| {
        error!("Invalid scoring weights: {}", e);
        io_error(e.to_string())
    })?;
    let scorer = Scorer::new(scoring, Arc::new(SystemClock));

    info!("Scorer initialized with weights: {:?}", scorer.config().weights());

    let profiles = match &settings.profiles.seed_path {
        Some(path) => InMemoryProfileStore::load_from_file(path).map_err(|e| {
            error!("Failed to seed profiles from {}: {}", path, e);
            io_error(e.to_string())
        })?,
        None => InMemoryProfileStore::new(),
    };
    let profiles = Arc::new(profiles);

    let tracker = Arc::new(SwipeTracker::new(
        profiles.clone(),
        InMemorySwipeStore::new(),
        InMemoryMatchStore::new(),
        scorer.clone(),
    ));

    let cache = Arc::new(BreakdownCache::new(
        settings.cache.capacity,
        settings.cache.ttl_secs,
    ));

    info!(
        "Breakdown cache initialized ({} entries, TTL: {}s)",
        settings.cache.capacity, settings.cache.ttl_secs
    );

    let app_state = AppState {
        profiles,
        ranker: Ranker::new(scorer),
        tracker,
        cache,
        discovery: settings.discovery.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
