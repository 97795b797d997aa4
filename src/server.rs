use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::handlers::{analyze_image, not_found_response, serve_file, success_response};
use crate::models::HealthStatus;
use crate::services::{ArkService, VisionService};

pub mod connection;

pub struct AppState {
    /// Absent when no API key is configured.
    pub vision: Option<Arc<dyn VisionService>>,
    pub index_path: PathBuf,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let vision = match &config.api_key {
            Some(api_key) => {
                let ark = ArkService::new(
                    api_key.clone(),
                    config.model.clone(),
                    config.responses_url(),
                    config.upstream_timeout,
                )?;
                Some(Arc::new(ark) as Arc<dyn VisionService>)
            }
            None => None,
        };

        Ok(Self {
            vision,
            index_path: config.index_path(),
        })
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(not_found))
        .route("/api/analyze", post(analyze_handler).fallback(not_found))
        .route("/", get(index_handler).fallback(not_found))
        .route("/index.html", get(index_handler).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> Response {
    not_found_response()
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus { ok: true })
}

async fn analyze_handler(State(state): State<Arc<AppState>>, body: Body) -> Response {
    match analyze_image(state.vision.as_deref(), body).await {
        Ok(result) => success_response(result),
        Err(e) => e.into_response(),
    }
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_file(&state.index_path).await
}
