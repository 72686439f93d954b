// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{post_json, start_content_server, test_app};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_markdown_conversion() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/markdown",
        json!({"url": format!("{}/", server), "method": "simple"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["content"].as_str().unwrap().contains("Welcome"));
    assert_eq!(body["metadata"]["title"], "Home");
    assert!(body["metadata"]["word_count"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_markdown_content_selector_scopes_output() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/markdown",
        json!({
            "url": format!("{}/", server),
            "method": "simple",
            "content_selector": "p.price"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let content = body["content"].as_str().unwrap();
    assert!(content.contains("9.99"));
    assert!(!content.contains("Welcome"));
}

#[tokio::test]
async fn test_markdown_invalid_selector_rejected_before_network() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/markdown",
        json!({"url": "https://example.com", "content_selector": "::::bad"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_markdown_selector_without_match_is_runtime_error() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/markdown",
        json!({
            "url": format!("{}/", server),
            "method": "simple",
            "content_selector": ".absent"
        }),
    )
    .await;

    // Syntax is fine, so the request runs; the empty match folds into an error result
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_markdown_batch_preserves_order_and_folds_failures() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/markdown/batch",
        json!({
            "urls": [format!("{}/", server), format!("{}/error", server)],
            "method": "simple"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[0]["metadata"]["title"], "Home");
    assert_eq!(results[1]["success"], false);
    assert!(results[1]["error"].is_string());
}

#[tokio::test]
async fn test_markdown_batch_empty_rejected() {
    let app = test_app();

    let (status, body) = post_json(&app, "/v1/markdown/batch", json!({"urls": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_pdf_malformed_page_range_rejected_before_network() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/pdf",
        json!({"url": "https://example.com/doc.pdf", "pages": "x-y"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_pdf_requires_exactly_one_source() {
    let app = test_app();

    let (status, _) = post_json(&app, "/v1/pdf", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &app,
        "/v1/pdf",
        json!({"url": "https://example.com/doc.pdf", "base64_data": "aGVsbG8="}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("exactly one"));
}

#[tokio::test]
async fn test_pdf_invalid_base64_rejected() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/pdf",
        json!({"base64_data": "!!!not base64!!!"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_pdf_batch_empty_rejected() {
    let app = test_app();

    let (status, body) = post_json(&app, "/v1/pdf/batch", json!({"urls": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
