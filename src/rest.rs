// Copyright 2026 Rainwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for rainwatch.
//!
//! Every endpoint is a GET returning JSON. City validation lives here, not
//! in the resolver: the resolver answers for any region string, the API
//! only forwards whitelisted ones.

use crate::config;
use crate::report::RainReport;
use crate::resolver::RainResolver;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

/// Shared state behind every handler.
pub struct AppState {
    pub resolver: RainResolver,
}

/// Errors surfaced by the REST layer, mapped onto status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// City not on the whitelist: 400 with the list attached.
    #[error("unsupported city: {0}")]
    UnsupportedCity(String),
    /// Resolution exhausted every stage: 500 carrying the error report.
    #[error("weather data unavailable for {}", .0.city)]
    Upstream(RainReport),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::UnsupportedCity(city) => {
                let body = serde_json::json!({
                    "status": "error",
                    "message": format!("不支援的城市：{city}"),
                    "supported_cities": config::TAIWAN_REGIONS,
                    "tip": "請使用正確的城市名稱，如：臺北市、高雄市等",
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Upstream(report) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(report)).into_response()
            }
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/weather", get(weather_default))
        .route("/weather/:city", get(weather_for_city))
        .route("/cities", get(cities))
        .route("/encode/:city", get(encode_city))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given port.
///
/// Binds all interfaces and runs until ctrl-c.
pub async fn start(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn index() -> Json<Value> {
    Json(serde_json::json!({
        "message": "台灣天氣降雨機率API",
        "description": "獲取台灣各縣市的降雨機率，判斷是否會下雨（>=50%機率）",
        "endpoints": {
            "/weather": "獲取預設城市（台北市）的天氣狀態",
            "/weather/{city}": "獲取指定城市的天氣狀態",
            "/cities": "獲取支援的城市列表",
            "/encode/{city}": "獲取城市名稱的URL編碼（測試用）",
            "/health": "健康檢查",
        },
        "usage_examples": {
            "直接中文": "/weather/臺北市",
            "URL編碼": "/weather/%E8%87%BA%E5%8C%97%E5%B8%82",
        },
        "example": {
            "url": "/weather/臺北市",
            "response": {
                "status": "success",
                "rain_probability": 75,
                "will_rain": true,
                "message": "rain",
                "city": "臺北市",
            },
        },
    }))
}

async fn weather_default(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RainReport>, ApiError> {
    resolve_city(state, config::DEFAULT_REGION.to_string()).await
}

async fn weather_for_city(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Result<Json<RainReport>, ApiError> {
    // Path extraction already percent-decoded the segment.
    resolve_city(state, city).await
}

async fn resolve_city(
    state: Arc<AppState>,
    city: String,
) -> Result<Json<RainReport>, ApiError> {
    let city = city.trim().to_string();
    tracing::info!("weather request for {city}");

    if !config::is_supported(&city) {
        return Err(ApiError::UnsupportedCity(city));
    }

    let report = state.resolver.resolve(&city).await;
    if !report.is_success() {
        return Err(ApiError::Upstream(report));
    }
    Ok(Json(report))
}

async fn cities() -> Json<Value> {
    Json(serde_json::json!({
        "status": "success",
        "cities": config::TAIWAN_REGIONS,
        "count": config::TAIWAN_REGIONS.len(),
        "usage_note": "可以直接使用中文城市名稱，如: /weather/臺北市",
    }))
}

async fn encode_city(Path(city): Path<String>) -> Json<Value> {
    let encoded = urlencoding::encode(&city);
    Json(serde_json::json!({
        "status": "success",
        "original": city,
        "encoded": encoded,
        "encoded_url": format!("/weather/{encoded}"),
        "direct_url": format!("/weather/{city}"),
        "note": "兩種URL都可以使用",
    }))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "API服務正常運行",
    }))
}

async fn not_found() -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "error",
        "message": "找不到請求的端點",
        "available_endpoints": [
            "/",
            "/weather",
            "/weather/{city}",
            "/cities",
            "/encode/{city}",
            "/health",
        ],
        "tip": "城市名稱可以直接使用中文，如: /weather/臺北市",
    });
    (StatusCode::NOT_FOUND, Json(body))
}
