// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod analyze_links;
pub mod check_robots;
pub mod convert_markdown;
pub mod convert_pdf;
pub mod page_info;
pub mod scrape_batch;
pub mod scrape_page;

use crate::config::settings::Settings;
use crate::engines::router::{EngineRouter, ScrapeMethod};
use crate::engines::traits::{FetchError, FetchRequest, FetchedDocument};
use crate::infrastructure::rate_limit::RateLimitGate;
use crate::utils::retry_policy::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 用例层错误
///
/// 调用方输入错误在任何网络请求之前返回；抓取错误只在
/// 该操作无法产出部分结果时向上传播
#[derive(Error, Debug)]
pub enum UseCaseError {
    /// 参数校验失败
    #[error("{0}")]
    Validation(String),
    /// 提取配置形状非法
    #[error(transparent)]
    Config(#[from] crate::domain::models::extraction::ConfigError),
    /// 抓取失败（重试耗尽后）
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// 统一抓取入口
///
/// 速率闸门、引擎分发和重试集中在这里，各用例共享同一条
/// 抓取路径。显式构造注入，没有进程级全局状态
pub struct Fetcher {
    router: Arc<EngineRouter>,
    gate: Arc<RateLimitGate>,
    retry: RetryPolicy,
    settings: Arc<Settings>,
}

impl Fetcher {
    /// 创建抓取入口
    pub fn new(
        router: Arc<EngineRouter>,
        gate: Arc<RateLimitGate>,
        settings: Arc<Settings>,
    ) -> Self {
        let retry = RetryPolicy::from_settings(&settings.retry);
        Self {
            router,
            gate,
            retry,
            settings,
        }
    }

    /// 全局配置
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 以全局默认值构造抓取请求
    pub fn base_request(&self, url: &str) -> FetchRequest {
        let mut request = FetchRequest::new(url);
        request.timeout = Duration::from_secs(self.settings.scraping.default_timeout_secs);
        request.user_agent = self.settings.scraping.user_agent.clone();
        request
    }

    /// 解析方法名
    ///
    /// 未知方法名是调用方输入错误，在发起任何网络请求之前返回
    pub fn parse_method(&self, method: Option<&str>) -> Result<ScrapeMethod, UseCaseError> {
        method
            .unwrap_or("auto")
            .parse::<ScrapeMethod>()
            .map_err(|e| UseCaseError::Validation(e.to_string()))
    }

    /// 经速率闸门和重试策略执行一次抓取
    ///
    /// # 参数
    ///
    /// * `method` - 已解析的抓取方法
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedDocument)` - 文档句柄
    /// * `Err(FetchError)` - 重试耗尽后的最后一个错误
    pub async fn fetch(
        &self,
        method: ScrapeMethod,
        request: &FetchRequest,
    ) -> Result<FetchedDocument, FetchError> {
        self.gate.acquire().await;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.router.dispatch(method, request).await {
                Ok(doc) => return Ok(doc),
                Err(e) if self.retry.should_retry_with_error(attempt, &e) => {
                    let backoff = self.retry.calculate_backoff(attempt);
                    warn!(
                        "Fetch attempt {} for {} failed ({}), retrying in {:?}",
                        attempt, request.url, e, backoff
                    );
                    metrics::counter!("fetch_retries_total").increment(1);
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    debug!("Fetch for {} gave up after {} attempts: {}", request.url, attempt, e);
                    return Err(e);
                }
            }
        }
    }

    /// 抓取原始字节流（PDF等非HTML资源）
    ///
    /// 与HTML抓取走同一个速率闸门和SSRF校验，但不经过
    /// 文档解析管线
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        crate::utils::validators::validate_target_url(url)
            .await
            .map_err(|e| FetchError::Unknown(format!("SSRF protection: {}", e)))?;

        self.gate.acquire().await;

        let client = reqwest::Client::builder()
            .user_agent(self.settings.scraping.user_agent.clone())
            .timeout(Duration::from_secs(self.settings.scraping.default_timeout_secs))
            .build()?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = async {
                let response = client.get(url).send().await?;
                let status = response.status();
                if status.is_client_error() || status.is_server_error() {
                    return Err(FetchError::HttpStatus(status.as_u16()));
                }
                Ok(response.bytes().await?.to_vec())
            }
            .await;

            match result {
                Ok(bytes) => return Ok(bytes),
                Err(e) if self.retry.should_retry_with_error(attempt, &e) => {
                    let backoff = self.retry.calculate_backoff(attempt);
                    warn!(
                        "Byte fetch attempt {} for {} failed ({}), retrying in {:?}",
                        attempt, url, e, backoff
                    );
                    metrics::counter!("fetch_retries_total").increment(1);
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// 校验URL格式，在任何网络请求之前拒绝非法输入
pub(crate) fn require_valid_url(url: &str) -> Result<(), UseCaseError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(UseCaseError::Validation(format!("Invalid URL: {}", url))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_valid_url() {
        assert!(require_valid_url("https://example.com").is_ok());
        assert!(require_valid_url("http://example.com/path?q=1").is_ok());
        assert!(require_valid_url("not a url").is_err());
        assert!(require_valid_url("ftp://example.com").is_err());
        assert!(require_valid_url("/relative").is_err());
    }
}
