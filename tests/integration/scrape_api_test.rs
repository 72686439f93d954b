// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{get_json, post_json, start_content_server, test_app};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_and_version() {
    let app = test_app();

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get_json(&app, "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "extractrs");
}

#[tokio::test]
async fn test_scrape_default_shape() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/scrape",
        json!({"url": format!("{}/", server), "method": "simple"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["status_code"], 200);
    assert_eq!(data["title"], "Home");
    assert_eq!(data["meta_description"], "A test page");
    assert!(data["content"]["text"].as_str().unwrap().contains("Welcome"));
    assert!(data["content"]["links"].is_array());
    assert!(data["content"]["images"].is_array());
    assert!(data.get("error").is_none());
}

#[tokio::test]
async fn test_scrape_with_extraction_config() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/scrape",
        json!({
            "url": format!("{}/", server),
            "method": "simple",
            "extract_config": {
                "heading": {"selector": "h1"},
                "prices": "p.price",
                "missing": {"selector": ".absent"},
                "hrefs": {"selector": "a", "attribute": "href", "multiple": true}
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let content = &body["data"]["content"];
    assert_eq!(content["heading"], "Welcome");
    // Shorthand canonicalizes to multiple=true
    assert_eq!(content["prices"], json!(["9.99"]));
    assert_eq!(content["missing"], Value::Null);
    assert_eq!(content["hrefs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_failing_field_rule_keeps_siblings_and_success() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/scrape",
        json!({
            "url": format!("{}/", server),
            "method": "simple",
            "extract_config": {"x": {"selector": "h1"}, "y": {"selector": "::::invalid"}}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["content"]["x"], "Welcome");
    assert_eq!(body["data"]["content"]["y"], Value::Null);
    assert!(body["data"].get("error").is_none());
}

#[tokio::test]
async fn test_relative_links_resolved_against_redirect_target() {
    let server = start_content_server().await;
    let app = test_app();

    let (_, body) = post_json(
        &app,
        "/v1/scrape",
        json!({"url": format!("{}/redirect", server), "method": "simple"}),
    )
    .await;

    let data = &body["data"];
    assert!(data["url"].as_str().unwrap().ends_with("/final/"));
    let links = data["content"]["links"].as_array().unwrap();
    let urls: Vec<&str> = links.iter().map(|l| l["url"].as_str().unwrap()).collect();
    assert!(urls[0].ends_with("/page"));
    assert!(urls[1].ends_with("/final/other"));
}

#[tokio::test]
async fn test_invalid_url_rejected_before_network() {
    let app = test_app();

    let (status, body) = post_json(&app, "/v1/scrape", json!({"url": "not a url"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Invalid URL"));
}

#[tokio::test]
async fn test_unknown_method_rejected_before_network() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/scrape",
        json!({"url": "https://example.com", "method": "playwright"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("playwright"));
}

#[tokio::test]
async fn test_bad_extract_config_names_field() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/scrape",
        json!({
            "url": "https://example.com",
            "extract_config": {"price": {"attribute": "content"}}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn test_fetch_failure_becomes_error_record() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/scrape",
        json!({"url": format!("{}/error", server), "method": "simple"}),
    )
    .await;

    // Upstream failure degrades to an error record, not an envelope failure
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["error"].as_str().unwrap().contains("500"));
    assert!(body["data"].get("content").is_none());
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let server = start_content_server().await;
    let app = test_app();

    let urls = vec![
        format!("{}/", server),
        format!("{}/error", server),
        format!("{}/final/", server),
    ];
    let (status, body) = post_json(
        &app,
        "/v1/scrape/batch",
        json!({"urls": urls, "method": "simple"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["title"], "Home");
    assert!(results[1]["error"].is_string());
    assert_eq!(results[2]["title"], "Final");

    let summary = &body["summary"];
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["successful"], 2);
    assert_eq!(summary["failed"], 1);
}

#[tokio::test]
async fn test_empty_batch_rejected() {
    let app = test_app();

    let (status, body) = post_json(&app, "/v1/scrape/batch", json!({"urls": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_batch_envelope_success_when_all_urls_fail() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/scrape/batch",
        json!({"urls": [format!("{}/error", server)], "method": "simple"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"]["failed"], 1);
    assert_eq!(body["summary"]["success_rate"], 0.0);
}

#[tokio::test]
async fn test_extract_links_filter_scenario() {
    let server = start_content_server().await;
    let app = test_app();

    // Home page links to /internal (same host), a.com and b.com
    let (status, body) = post_json(
        &app,
        "/v1/links",
        json!({
            "url": format!("{}/", server),
            "method": "simple",
            "filter_domains": ["a.com", "127.0.0.1"],
            "exclude_domains": ["b.com"],
            "internal_only": false
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let links = body["links"].as_array().unwrap();
    let urls: Vec<&str> = links.iter().map(|l| l["url"].as_str().unwrap()).collect();
    assert_eq!(urls.len(), 2);
    assert!(urls.iter().any(|u| u.contains("/internal")));
    assert!(urls.iter().any(|u| u.contains("a.com")));
    assert!(!urls.iter().any(|u| u.contains("b.com")));
    assert_eq!(body["internal_count"], 1);
    assert_eq!(body["external_count"], 1);
}

#[tokio::test]
async fn test_extract_links_internal_only() {
    let server = start_content_server().await;
    let app = test_app();

    let (_, body) = post_json(
        &app,
        "/v1/links",
        json!({"url": format!("{}/", server), "method": "simple", "internal_only": true}),
    )
    .await;

    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["internal"], true);
}

#[tokio::test]
async fn test_page_info_uses_simple_backend() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/page-info",
        json!({"url": format!("{}/", server)}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["title"], "Home");
    assert_eq!(body["description"], "A test page");
    assert_eq!(body["status_code"], 200);
    assert!(body["content_type"].as_str().unwrap().contains("text/html"));
    // Page info is metadata only
    assert!(body.get("content").is_none());
}

#[tokio::test]
async fn test_robots_missing_file_allows_everything() {
    let server = start_content_server().await;
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/robots",
        json!({"url": format!("{}/some/page", server)}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    // Fixture server has no robots.txt
    assert_eq!(body["fetched"], false);
    assert_eq!(body["allowed"], true);
    assert!(body["robots_url"].as_str().unwrap().ends_with("/robots.txt"));
}
