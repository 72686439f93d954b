// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::scrape_request::{ScrapeActionDto, ScrapeOptionsDto, ScrapeRequestDto};
use crate::application::usecases::{require_valid_url, Fetcher, UseCaseError};
use crate::domain::models::extraction::ExtractionConfig;
use crate::domain::models::scrape_record::ScrapeRecord;
use crate::domain::services::normalizer::Normalizer;
use crate::engines::router::ScrapeMethod;
use crate::engines::traits::{FetchRequest, PageAction};
use crate::infrastructure::cache::response_cache::ResponseCache;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 单页抓取用例
///
/// 校验、方法解析、缓存、抓取和归一化的完整编排。
/// 抓取失败（重试耗尽后）降级为带error字段的记录而不是向上抛
pub struct ScrapeUseCase {
    fetcher: Arc<Fetcher>,
    cache: Arc<ResponseCache>,
}

impl ScrapeUseCase {
    /// 创建用例
    pub fn new(fetcher: Arc<Fetcher>, cache: Arc<ResponseCache>) -> Self {
        Self { fetcher, cache }
    }

    /// 底层抓取入口，供批量用例复用方法解析
    pub(crate) fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// 执行单页抓取
    ///
    /// # 参数
    ///
    /// * `dto` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeRecord)` - 成功记录或带error字段的失败记录
    /// * `Err(UseCaseError)` - 调用方输入错误，未发起任何网络请求
    pub async fn execute(&self, dto: ScrapeRequestDto) -> Result<ScrapeRecord, UseCaseError> {
        require_valid_url(&dto.url)?;
        let method = self.fetcher.parse_method(dto.method.as_deref())?;

        let config = dto
            .extract_config
            .as_ref()
            .map(ExtractionConfig::validate)
            .transpose()?;

        let options = dto.options.unwrap_or_default();
        let resolved = method.resolve(
            options.js_rendering.unwrap_or(false),
            dto.wait_for_element.is_some(),
        );

        let fingerprint = config_fingerprint(dto.extract_config.as_ref());
        let cache_key = ResponseCache::key(&resolved.to_string(), &dto.url, &fingerprint);
        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached);
        }

        let request = self.build_request(
            &dto.url,
            &options,
            dto.wait_for_element.clone(),
            config.as_ref(),
        )?;

        let record = self.fetch_record(resolved, &request, config.as_ref()).await;
        self.cache.put(cache_key, &record);
        Ok(record)
    }

    /// 批内单URL抓取，共享已校验的配置和已解析的方法
    pub(crate) async fn execute_prepared(
        &self,
        url: &str,
        method: ScrapeMethod,
        config: Option<&ExtractionConfig>,
        raw_config: Option<&Value>,
        options: &ScrapeOptionsDto,
    ) -> ScrapeRecord {
        let resolved = method.resolve(options.js_rendering.unwrap_or(false), false);

        let fingerprint = config_fingerprint(raw_config);
        let cache_key = ResponseCache::key(&resolved.to_string(), url, &fingerprint);
        if let Some(cached) = self.cache.get(&cache_key) {
            return cached;
        }

        let record = match self.build_request(url, options, None, config) {
            Ok(request) => self.fetch_record(resolved, &request, config).await,
            Err(e) => ScrapeRecord::failure(url, e.to_string()),
        };
        self.cache.put(cache_key, &record);
        record
    }

    /// 抓取并归一化，失败降级为error记录
    async fn fetch_record(
        &self,
        method: ScrapeMethod,
        request: &FetchRequest,
        config: Option<&ExtractionConfig>,
    ) -> ScrapeRecord {
        metrics::counter!("scrape_requests_total").increment(1);
        let started = Instant::now();

        let record = match self.fetcher.fetch(method, request).await {
            Ok(doc) => Normalizer::record(&doc, config),
            Err(e) => {
                metrics::counter!("scrape_failures_total").increment(1);
                Normalizer::failure(&request.url, &e)
            }
        };

        metrics::histogram!("scrape_duration_seconds").record(started.elapsed().as_secs_f64());
        record
    }

    /// 由DTO参数构造抓取请求
    fn build_request(
        &self,
        url: &str,
        options: &ScrapeOptionsDto,
        wait_for_element: Option<String>,
        config: Option<&ExtractionConfig>,
    ) -> Result<FetchRequest, UseCaseError> {
        let mut request = self.fetcher.base_request(url);

        request.headers = map_headers(options.headers.as_ref())?;
        if let Some(timeout) = options.timeout {
            request.timeout = Duration::from_secs(timeout);
        }
        request.proxy = options.proxy.clone();
        request.wait_for_selector = wait_for_element;
        request.scroll_page = options.scroll_page.unwrap_or(false);
        request.actions = options
            .actions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(map_action)
            .collect();
        request.xpath_selectors = config.map(|c| c.xpath_selectors()).unwrap_or_default();

        Ok(request)
    }
}

/// 提取配置的缓存指纹
fn config_fingerprint(raw: Option<&Value>) -> String {
    raw.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// 自定义请求头必须是字符串到字符串的映射
fn map_headers(headers: Option<&Value>) -> Result<HashMap<String, String>, UseCaseError> {
    match headers {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| {
                let v = v.as_str().ok_or_else(|| {
                    UseCaseError::Validation(format!("Invalid header value for key: {}", k))
                })?;
                Ok((k.clone(), v.to_string()))
            })
            .collect(),
        Some(_) => Err(UseCaseError::Validation(
            "headers must be a map of string key-value pairs".to_string(),
        )),
        None => Ok(HashMap::new()),
    }
}

fn map_action(action: &ScrapeActionDto) -> PageAction {
    match action {
        ScrapeActionDto::Wait { milliseconds } => PageAction::Wait {
            milliseconds: *milliseconds,
        },
        ScrapeActionDto::Click { selector } => PageAction::Click {
            selector: selector.clone(),
        },
        ScrapeActionDto::Scroll { direction } => PageAction::Scroll {
            direction: direction.clone(),
        },
        ScrapeActionDto::Input { selector, text } => PageAction::Input {
            selector: selector.clone(),
            text: text.clone(),
        },
    }
}
