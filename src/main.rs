//! Service desk server
//!
//! REST API server for vehicle service requests.

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use servicedesk_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting service desk server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );
    let body_limit = config.server.body_limit_bytes;

    let repository = Repository::new(pool);
    let services = Services::new(
        repository,
        config.auth.clone(),
        config.database.cascade_retries,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state, body_limit);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("servicedesk_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Accounts
        .route("/auth/login", post(api::accounts::login))
        .route("/auth/me", get(api::accounts::me))
        .route("/profiles/:kind/:id", get(api::accounts::get_profile))
        .route("/profiles/:kind/:id/photo", put(api::accounts::update_photo))
        // Applicants
        .route(
            "/applicants",
            get(api::applicants::list_applicants).post(api::applicants::create_applicant),
        )
        .route(
            "/applicants/:id",
            get(api::applicants::get_applicant)
                .put(api::applicants::update_applicant)
                .delete(api::applicants::delete_applicant),
        )
        // Transports
        .route(
            "/transports",
            get(api::transports::list_transports).post(api::transports::create_transport),
        )
        .route(
            "/transports/:id",
            get(api::transports::get_transport)
                .put(api::transports::update_transport)
                .delete(api::transports::delete_transport),
        )
        // Mechanics
        .route(
            "/mechanics",
            get(api::mechanics::list_mechanics).post(api::mechanics::create_mechanic),
        )
        .route(
            "/mechanics/:id",
            get(api::mechanics::get_mechanic)
                .put(api::mechanics::update_mechanic)
                .delete(api::mechanics::delete_mechanic),
        )
        // Managers
        .route(
            "/managers",
            get(api::managers::list_managers).post(api::managers::create_manager),
        )
        .route(
            "/managers/:id",
            get(api::managers::get_manager)
                .put(api::managers::update_manager)
                .delete(api::managers::delete_manager),
        )
        // Service centers
        .route(
            "/services",
            get(api::service_centers::list_service_centers)
                .post(api::service_centers::create_service_center),
        )
        .route(
            "/services/:id",
            get(api::service_centers::get_service_center)
                .put(api::service_centers::update_service_center)
                .delete(api::service_centers::delete_service_center),
        )
        // Requests
        .route(
            "/requests",
            get(api::requests::list_requests).post(api::requests::create_request),
        )
        .route(
            "/requests/:id",
            get(api::requests::get_request)
                .put(api::requests::update_request)
                .delete(api::requests::delete_request),
        )
        .route("/requests/:id/status", put(api::requests::set_request_status))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::max(body_limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{CONTENT_LENGTH, CONTENT_TYPE},
            Request, StatusCode,
        },
    };
    use serde_json::Value;
    use tower::ServiceExt;

    /// Router over a pool that never connects; only routes that fail before
    /// touching the database can be exercised.
    fn router() -> Router {
        let config = AppConfig::default();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        let services = Services::new(Repository::new(pool), config.auth.clone(), 1);
        let state = AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        };
        create_router(state, 1024)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_answers_without_a_database() {
        let (status, body) = send(
            Request::get("/api/v1/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let (status, body) = send(
            Request::put("/api/v1/requests/1/status")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{\"status\": "))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn status_change_requires_a_status() {
        for body in ["{}", r#"{"status": null}"#, r#"{"problem": "x"}"#] {
            let (status, body) = send(
                Request::put("/api/v1/requests/1/status")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "status is required");
        }
    }

    #[tokio::test]
    async fn blank_service_address_is_rejected_on_update() {
        let (status, body) = send(
            Request::put("/api/v1/services/1")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"address": ""}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn non_numeric_id_fields_are_rejected() {
        let (status, body) = send(
            Request::put("/api/v1/requests/1")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"mechanicId": "seven"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn non_numeric_path_id_is_rejected() {
        let (status, body) = send(
            Request::delete("/api/v1/services/abc").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn me_requires_a_bearer_token() {
        let (status, body) = send(
            Request::get("/api/v1/auth/me").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let payload = format!(r#"{{"address": "{}", "workTime": "x"}}"#, "a".repeat(4096));
        let (status, _) = send(
            Request::post("/api/v1/services")
                .header(CONTENT_TYPE, "application/json")
                .header(CONTENT_LENGTH, payload.len())
                .body(Body::from(payload))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
