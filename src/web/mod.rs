pub mod handlers;
pub mod middleware;

use crate::{models::{Classifier, PlantModel}, Config, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

/// Shared request-handling state. The model handle is constructed once at
/// startup and injected here; handlers never touch process-global state.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn PlantModel>,
    pub config: Config,
}

pub async fn serve(config: Config) -> Result<()> {
    // A model that fails to load must keep the process from serving at all.
    let model: Arc<dyn PlantModel> = Arc::new(Classifier::load(&config)?);

    let app = create_app(model, config.clone());

    let addr: SocketAddr = config.bind_addr.parse().map_err(|e| {
        crate::utils::error::PredictError::Config(format!(
            "Invalid bind address {}: {}",
            config.bind_addr, e
        ))
    })?;

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /        - Welcome message");
    tracing::info!("  POST /predict - Multipart image upload, top-1 species");

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        crate::utils::error::PredictError::Internal(format!(
            "Failed to bind to address {}: {}",
            addr, e
        ))
    })?;

    axum::serve(listener, app).await.map_err(|e| {
        crate::utils::error::PredictError::Internal(format!("Server failed: {}", e))
    })?;

    Ok(())
}

pub fn create_app(model: Arc<dyn PlantModel>, config: Config) -> Router {
    let state = AppState {
        model,
        config: config.clone(),
    };

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/predict", post(handlers::predict_handler))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(DefaultBodyLimit::max(config.server_config.max_request_size))
        .layer(RequestBodyLimitLayer::new(config.server_config.max_request_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server_config.request_timeout,
        )))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
