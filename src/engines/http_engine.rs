// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::{FetchEngine, FetchError, FetchRequest, FetchedDocument};
use crate::utils::validators;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// 简单HTTP抓取引擎
///
/// 基于reqwest的单次GET抓取，不执行JavaScript，成本最低
pub struct HttpEngine;

impl HttpEngine {
    /// 执行一次GET并构造文档句柄
    ///
    /// 拆出来供CrawlEngine复用，两个引擎的取页语义相同，
    /// 只是礼貌性控制不同
    pub(crate) async fn fetch_once(
        request: &FetchRequest,
    ) -> Result<FetchedDocument, FetchError> {
        // SSRF protection
        validators::validate_target_url(&request.url)
            .await
            .map_err(|e| FetchError::Unknown(format!("SSRF protection: {}", e)))?;

        // Build headers
        let mut headers = HeaderMap::new();
        for (k, v) in &request.headers {
            if let (Ok(k), Ok(v)) = (
                HeaderName::from_bytes(k.as_bytes()),
                HeaderValue::from_str(v),
            ) {
                headers.insert(k, v);
            }
        }

        // Each request gets a fresh client for cookie isolation
        let mut builder = reqwest::Client::builder()
            .user_agent(request.user_agent.clone())
            .timeout(request.timeout)
            .cookie_store(true);

        if let Some(proxy_url) = &request.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| FetchError::Unknown(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        let response = client.get(&request.url).headers(headers).send().await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let content_length = response.content_length();

        let html = response.text().await?;

        Ok(FetchedDocument {
            requested_url: request.url.clone(),
            final_url,
            status_code: Some(status.as_u16()),
            content_type,
            content_length,
            html,
            xpath_results: HashMap::new(),
            fetched_via: "http",
        })
    }
}

#[async_trait]
impl FetchEngine for HttpEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedDocument)` - 文档句柄
    /// * `Err(FetchError)` - 抓取过程中出现的类型化错误
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedDocument, FetchError> {
        Self::fetch_once(request).await
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "http"
    }
}
