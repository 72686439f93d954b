// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// 初始化指标系统
///
/// 安装Prometheus记录器并注册应用指标，返回的句柄
/// 由`GET /metrics`路由渲染
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!("scrape_requests_total", "Total number of scrape requests");
    describe_counter!(
        "scrape_failures_total",
        "Total number of scrape requests that ended in an error record"
    );
    describe_counter!(
        "batch_requests_total",
        "Total number of batch scrape requests"
    );
    describe_counter!(
        "extraction_field_failures_total",
        "Total number of extraction field rules that failed non-fatally"
    );
    describe_counter!("cache_hits_total", "Response cache hits");
    describe_counter!("cache_misses_total", "Response cache misses");
    describe_counter!(
        "fetch_retries_total",
        "Total number of fetch retry attempts"
    );
    describe_histogram!(
        "scrape_duration_seconds",
        "Duration of scrape requests in seconds"
    );

    Ok(handle)
}
