use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use roomie_algo::config::{LoggingSettings, Settings};
use roomie_algo::core::{InMemoryProfileSource, InMemoryRecorder, Matcher, MatchRecorder, ProfileSource};
use roomie_algo::routes::{self, matches::AppState};
use roomie_algo::services::PostgresClient;
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Roomie Algo matching service...");

    // Profile source and recorder: PostgreSQL when configured, in-memory otherwise
    let (source, recorder, postgres): (Arc<dyn ProfileSource>, Arc<dyn MatchRecorder>, Option<Arc<PostgresClient>>) =
        match &settings.database.url {
            Some(url) => {
                let client = PostgresClient::from_settings(
                    url,
                    settings.database.max_connections,
                    settings.database.min_connections,
                    settings.database.acquire_timeout_secs,
                    settings.database.idle_timeout_secs,
                )
                .await
                .map_err(|e| {
                    error!("Failed to connect to PostgreSQL: {}", e);
                    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
                })?;

                let client = Arc::new(client);
                info!(
                    "PostgreSQL client initialized (max: {} connections)",
                    settings.database.max_connections.unwrap_or(10)
                );
                let source: Arc<dyn ProfileSource> = client.clone();
                let recorder: Arc<dyn MatchRecorder> = client.clone();
                (source, recorder, Some(client))
            }
            None => {
                let profiles = match &settings.database.profiles_file {
                    Some(path) => InMemoryProfileSource::from_json_file(path).await.map_err(|e| {
                        error!("Failed to load profiles from {}: {}", path, e);
                        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
                    })?,
                    None => InMemoryProfileSource::default(),
                };
                info!(
                    "No database configured, using {} in-memory profiles and recorder",
                    profiles.len().await
                );
                let source: Arc<dyn ProfileSource> = Arc::new(profiles);
                let recorder: Arc<dyn MatchRecorder> = Arc::new(InMemoryRecorder::new());
                (source, recorder, None)
            }
        };

    let weights = settings.scoring_weights();
    let matcher = Matcher::new(
        weights,
        settings.matching.neighbors,
        settings.matching.neighbor_policy,
    );

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        source,
        recorder,
        postgres,
        matcher,
        default_limit: settings.matching.default_limit,
        max_limit: settings.matching.max_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
