// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use extractrs::config::settings::Settings;
use extractrs::presentation::routes;
use extractrs::presentation::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// 内容页fixture
const HOME_PAGE: &str = r#"<html>
<head><title>Home</title><meta name="description" content="A test page"></head>
<body>
    <h1>Welcome</h1>
    <p class="price">9.99</p>
    <a href="/internal">Internal</a>
    <a href="https://a.com/y">A</a>
    <a href="https://b.com/z">B</a>
    <img src="/logo.png" alt="logo">
</body></html>"#;

const FINAL_PAGE: &str = r#"<html><head><title>Final</title></head>
<body><a href="/page">root</a><a href="other">rel</a></body></html>"#;

/// 启动被抓取的本地内容服务器，返回其base URL
pub async fn start_content_server() -> String {
    std::env::set_var("EXTRACTRS_DISABLE_SSRF_PROTECTION", "true");

    let app = Router::new()
        .route(
            "/",
            get(|| async {
                Response::builder()
                    .header("content-type", "text/html")
                    .body(HOME_PAGE.to_string())
                    .unwrap()
            }),
        )
        .route("/redirect", get(|| async { Redirect::permanent("/final/") }))
        .route(
            "/final/",
            get(|| async {
                Response::builder()
                    .header("content-type", "text/html")
                    .body(FINAL_PAGE.to_string())
                    .unwrap()
            }),
        )
        .route(
            "/error",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// 构造被测应用路由
///
/// robots检查关闭（本地fixture没有robots.txt），重试收紧
/// 以缩短失败路径的用时
pub fn test_app() -> Router {
    let mut settings = Settings::new().expect("defaults should load");
    settings.crawling.respect_robots = false;
    settings.crawling.delay_ms = 0;
    settings.retry.max_retries = 1;
    settings.retry.initial_backoff_ms = 10;
    settings.rate_limiting.enabled = false;

    let state = Arc::new(AppState::build(Arc::new(settings), None));
    routes::build_router(state)
}

/// 发送JSON请求并解析JSON响应
pub async fn post_json(app: &Router, path: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// 发送GET请求并解析JSON响应
pub async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
