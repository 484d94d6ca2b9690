pub mod api;
pub mod client;
pub mod config;
pub mod entities;
pub mod graphql;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::graphql::{AppSchema, build_schema};
use crate::services::actuality_repository::SeaOrmActualityRepository;
use crate::services::actuality_service::ActualityService;
use axum::{Router, middleware::from_fn, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(api::handlers::health::health_check),
    components(schemas(api::handlers::health::HealthResponse)),
    tags(
        (name = "system", description = "Service status"),
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub schema: AppSchema,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the SeaORM repository, the service and the schema on top of an
    /// open connection.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let repo = Arc::new(SeaOrmActualityRepository::new(db.clone()));
        let service = Arc::new(ActualityService::new(repo, &config));
        let schema = build_schema(service, &config);

        Self { db, schema, config }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/graphql",
            get(api::handlers::graphql::graphiql).post(api::handlers::graphql::graphql_handler),
        )
        .fallback(api::handlers::not_found)
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .with_state(state)
}
