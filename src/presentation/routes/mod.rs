// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::presentation::handlers::{
    convert_handler, info_handler, link_handler, robots_handler, scrape_handler,
};
use crate::presentation::state::AppState;

/// 装配全部HTTP路由
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/metrics", get(metrics))
        .route("/v1/scrape", post(scrape_handler::scrape))
        .route("/v1/scrape/batch", post(scrape_handler::scrape_batch))
        .route("/v1/links", post(link_handler::extract_links))
        .route("/v1/page-info", post(info_handler::page_info))
        .route("/v1/robots", post(robots_handler::check_robots))
        .route("/v1/markdown", post(convert_handler::convert_markdown))
        .route(
            "/v1/markdown/batch",
            post(convert_handler::convert_markdown_batch),
        )
        .route("/v1/pdf", post(convert_handler::convert_pdf))
        .route("/v1/pdf/batch", post(convert_handler::convert_pdf_batch))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// 存活检查
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// 版本信息
async fn version() -> Json<serde_json::Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Prometheus指标导出
async fn metrics(Extension(state): Extension<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
