use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use corridor_match::config::{LoggingSettings, Settings};
use corridor_match::core::MatchingService;
use corridor_match::routes::{self, matches::AppState};
use corridor_match::services::RouteCache;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the log level can come from it
    // CORRIDOR_CONFIG points at a single config file instead of config/
    let loaded = match std::env::var("CORRIDOR_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Corridor Match service...");

    let options = settings.matching_options();
    if let Err(e) = options.default_eta.validate() {
        error!("Invalid ETA configuration: {}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }

    let cache = RouteCache::new(settings.cache.route_cache_size);
    info!(
        "Route cache {} (capacity {})",
        if cache.is_enabled() { "enabled" } else { "disabled" },
        settings.cache.route_cache_size
    );

    let service = Arc::new(MatchingService::new(options, cache));
    info!("Matching service initialized with options: {:?}", service.options());

    let app_state = AppState { service };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
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
