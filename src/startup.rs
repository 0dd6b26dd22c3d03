use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::{auth_middleware, Authenticator};
use crate::backend::{BackendFactory, HaustierBackend};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::graphql::{self, GRAPHQL_PATH};
use crate::logging::logging_middleware;
use crate::mail::create_mailer;
use crate::resource::{haustier_get, haustier_write, AppState, REST_PATH};
use crate::service::HaustierService;

/// Room for multipart boundaries and headers on top of the file limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Connect to the configured database and create the schema
pub async fn setup_backend(config: &AppConfig) -> AppResult<Arc<dyn HaustierBackend>> {
    let backend_config = config
        .database_backend_config()
        .map_err(AppError::Configuration)?;

    tracing::info!("Setting up {} backend", backend_config.database_type);
    let backend = BackendFactory::create(&backend_config).await?;
    backend.init_schema().await?;
    backend.health_check().await?;

    Ok(backend)
}

/// Build the service with its mailer on top of a backend
pub fn create_service(backend: Arc<dyn HaustierBackend>, config: &AppConfig) -> Arc<HaustierService> {
    Arc::new(HaustierService::new(
        backend,
        create_mailer(&config.mail),
        config.upload.max_file_size,
    ))
}

/// Router with REST, GraphQL and health endpoints plus auth and access log layers
pub fn build_app(service: Arc<HaustierService>, config: Arc<AppConfig>) -> Router {
    let authenticator = Arc::new(Authenticator::new(&config.auth));
    let schema = graphql::build_schema(service.clone());
    let body_limit = config.upload.max_file_size + MULTIPART_OVERHEAD;

    let state: AppState = (service, config);

    Router::new()
        .route(
            REST_PATH,
            get(haustier_get::search_haustiere).post(haustier_write::create_haustier),
        )
        .route(
            &format!("{}/{{id}}", REST_PATH),
            get(haustier_get::get_haustier)
                .post(haustier_write::upload_file)
                .put(haustier_write::update_haustier)
                .delete(haustier_write::delete_haustier),
        )
        .route(
            &format!("{}/file/{{id}}", REST_PATH),
            get(haustier_get::get_file),
        )
        .route(
            GRAPHQL_PATH,
            get(graphql::graphiql).post(graphql::graphql_handler),
        )
        .route("/health", get(health))
        .layer(Extension(schema))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(authenticator, auth_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Backend, service and router for a complete configuration
pub async fn build_app_from_config(config: AppConfig) -> AppResult<Router> {
    let backend = setup_backend(&config).await?;
    let service = create_service(backend, &config);
    Ok(build_app(service, Arc::new(config)))
}

async fn health(State((service, _)): State<AppState>) -> AppResult<Json<Value>> {
    service.backend().health_check().await?;
    Ok(Json(json!({ "status": "UP" })))
}
