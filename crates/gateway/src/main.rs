//! Attainments Admin API Gateway
//!
//! The entry point for all administrative API requests.
//! Handles:
//! - Authentication and authorization
//! - Request routing to the write services and read repository
//! - Observability (logging, metrics)

mod handlers;
mod middleware;

use attainments_common::{
    auth::JwtManager,
    config::AppConfig,
    db::{DbPool, Repository},
    errors::AppError,
    media::MediaStore,
    metrics,
};
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use rand::{distributions::Alphanumeric, Rng};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub repo: Repository,
    pub jwt: Arc<JwtManager>,
    pub media: MediaStore,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: DbPool, jwt_secret: &str) -> Self {
        Self {
            repo: Repository::new(db.clone()),
            jwt: Arc::new(JwtManager::new(jwt_secret, config.auth.jwt_expiration_secs)),
            media: MediaStore::new(&config.media),
            config,
            db,
        }
    }
}

impl FromRef<AppState> for Arc<JwtManager> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(&config);

    info!(
        service = %config.observability.service_name,
        "Starting Attainments API Gateway v{}",
        attainments_common::VERSION
    );

    let config = Arc::new(config);

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .set_buckets(metrics::LATENCY_BUCKETS)?
            .install()?;
        info!(%metrics_addr, "Prometheus exporter listening");
    }
    metrics::register_metrics();

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    let jwt_secret = match config.auth.jwt_secret.clone() {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            warn!("No JWT secret configured, tokens will not survive a restart");
            ephemeral_secret()
        }
    };

    // Create app state
    let state = AppState::new(config.clone(), db, &jwt_secret);

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| AppError::Configuration {
            message: format!("Invalid listen address: {}", e),
        })?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logging {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

fn ephemeral_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Accounts
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me).put(handlers::auth::update_me))
        .route("/auth/password", post(handlers::auth::change_password))
        .route(
            "/auth/me/photo",
            put(handlers::auth::upload_photo).delete(handlers::auth::remove_photo),
        )

        // Organizational units
        .route(
            "/universities",
            get(handlers::units::list_universities).post(handlers::units::create_university),
        )
        .route(
            "/universities/{id}",
            put(handlers::units::update_university).delete(handlers::units::delete_university),
        )
        .route(
            "/faculties",
            get(handlers::units::list_faculties).post(handlers::units::create_faculty),
        )
        .route(
            "/faculties/{id}",
            put(handlers::units::update_faculty).delete(handlers::units::delete_faculty),
        )
        .route(
            "/departments",
            get(handlers::units::list_departments).post(handlers::units::create_department),
        )
        .route(
            "/departments/{id}",
            put(handlers::units::update_department).delete(handlers::units::delete_department),
        )

        // Publications
        .route(
            "/publishers",
            get(handlers::publications::list_publishers)
                .post(handlers::publications::create_publisher),
        )
        .route(
            "/publishers/{id}",
            put(handlers::publications::update_publisher)
                .delete(handlers::publications::delete_publisher),
        )
        .route(
            "/journals",
            get(handlers::publications::list_journals).post(handlers::publications::create_journal),
        )
        .route(
            "/journals/{id}",
            put(handlers::publications::update_journal)
                .delete(handlers::publications::delete_journal),
        )
        .route(
            "/articles",
            get(handlers::publications::list_articles).post(handlers::publications::create_article),
        )
        .route(
            "/articles/{id}",
            put(handlers::publications::update_article)
                .delete(handlers::publications::delete_article),
        )
        .route(
            "/articles/{id}/authorships",
            get(handlers::publications::article_authorships),
        )
        .route(
            "/authors",
            get(handlers::publications::list_authors).post(handlers::publications::create_author),
        )
        .route(
            "/authors/{id}",
            put(handlers::publications::update_author)
                .delete(handlers::publications::delete_author),
        )
        .route(
            "/contribution-statuses",
            get(handlers::publications::list_contribution_statuses)
                .post(handlers::publications::create_contribution_status),
        )
        .route(
            "/contribution-statuses/{id}",
            put(handlers::publications::update_contribution_status)
                .delete(handlers::publications::delete_contribution_status),
        )
        .route(
            "/authorships",
            get(handlers::publications::list_authorships)
                .post(handlers::publications::create_authorship),
        )
        .route(
            "/authorships/{id}",
            put(handlers::publications::update_authorship)
                .delete(handlers::publications::delete_authorship),
        )

        // Employees
        .route(
            "/statuses",
            get(handlers::employees::list_statuses).post(handlers::employees::create_status),
        )
        .route(
            "/statuses/{id}",
            put(handlers::employees::update_status).delete(handlers::employees::delete_status),
        )
        .route(
            "/degrees",
            get(handlers::employees::list_degrees).post(handlers::employees::create_degree),
        )
        .route(
            "/degrees/{id}",
            put(handlers::employees::update_degree).delete(handlers::employees::delete_degree),
        )
        .route(
            "/domains",
            get(handlers::employees::list_domains).post(handlers::employees::create_domain),
        )
        .route(
            "/domains/{id}",
            put(handlers::employees::update_domain).delete(handlers::employees::delete_domain),
        )
        .route(
            "/disciplines",
            get(handlers::employees::list_disciplines).post(handlers::employees::create_discipline),
        )
        .route(
            "/disciplines/{id}",
            put(handlers::employees::update_discipline)
                .delete(handlers::employees::delete_discipline),
        )
        .route(
            "/groups",
            get(handlers::employees::list_groups).post(handlers::employees::create_group),
        )
        .route(
            "/groups/{id}",
            put(handlers::employees::update_group).delete(handlers::employees::delete_group),
        )
        .route(
            "/subgroups",
            get(handlers::employees::list_subgroups).post(handlers::employees::create_subgroup),
        )
        .route(
            "/subgroups/{id}",
            put(handlers::employees::update_subgroup).delete(handlers::employees::delete_subgroup),
        )
        .route(
            "/positions",
            get(handlers::employees::list_positions).post(handlers::employees::create_position),
        )
        .route(
            "/positions/{id}",
            put(handlers::employees::update_position).delete(handlers::employees::delete_position),
        )
        .route(
            "/employees",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route(
            "/employees/{id}",
            put(handlers::employees::update_employee).delete(handlers::employees::delete_employee),
        )
        .route(
            "/employments",
            get(handlers::employees::list_employments).post(handlers::employees::create_employment),
        )
        .route(
            "/employments/{id}",
            put(handlers::employees::update_employment)
                .delete(handlers::employees::delete_employment),
        );

    // Compose the app
    Router::new()
        .nest("/v1", api_routes)
        .layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(cors),
        )
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
