// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::convert_request::{
    BatchMarkdownRequestDto, MarkdownRequestDto, MarkdownResponseDto,
};
use crate::application::usecases::{require_valid_url, Fetcher, UseCaseError};
use crate::domain::services::markdown_service::MarkdownService;
use crate::engines::router::ScrapeMethod;
use scraper::Selector;
use std::sync::Arc;

/// 网页转Markdown用例
pub struct ConvertMarkdownUseCase {
    fetcher: Arc<Fetcher>,
}

impl ConvertMarkdownUseCase {
    /// 创建用例
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    /// 执行单页转换
    ///
    /// 选择器语法在任何网络请求之前校验；选择器无匹配属于
    /// 运行期结果，以error响应而非校验错误的形式返回
    pub async fn execute(
        &self,
        dto: MarkdownRequestDto,
    ) -> Result<MarkdownResponseDto, UseCaseError> {
        require_valid_url(&dto.url)?;
        let method = self.fetcher.parse_method(dto.method.as_deref())?;
        validate_selector(dto.content_selector.as_deref())?;

        Ok(self
            .convert_one(&dto.url, method, dto.content_selector.as_deref())
            .await)
    }

    /// 执行批量转换，输出顺序与输入顺序一致
    pub async fn execute_batch(
        &self,
        dto: BatchMarkdownRequestDto,
    ) -> Result<Vec<MarkdownResponseDto>, UseCaseError> {
        if dto.urls.is_empty() {
            return Err(UseCaseError::Validation(
                "urls must not be empty".to_string(),
            ));
        }
        for url in &dto.urls {
            require_valid_url(url)?;
        }
        let method = self.fetcher.parse_method(dto.method.as_deref())?;
        validate_selector(dto.content_selector.as_deref())?;

        let futures = dto
            .urls
            .iter()
            .map(|url| self.convert_one(url, method, dto.content_selector.as_deref()));
        Ok(futures::future::join_all(futures).await)
    }

    /// 抓取并转换单个URL，失败折叠为error响应
    async fn convert_one(
        &self,
        url: &str,
        method: ScrapeMethod,
        content_selector: Option<&str>,
    ) -> MarkdownResponseDto {
        let resolved = method.resolve(false, false);
        let request = self.fetcher.base_request(url);

        match self.fetcher.fetch(resolved, &request).await {
            Ok(doc) => match MarkdownService::convert(&doc, content_selector) {
                Ok(markdown) => MarkdownResponseDto::ok(markdown),
                Err(e) => MarkdownResponseDto::failed(e.to_string()),
            },
            Err(e) => MarkdownResponseDto::failed(e.to_string()),
        }
    }
}

/// 内容选择器的语法校验，在发起任何网络请求之前完成
fn validate_selector(selector: Option<&str>) -> Result<(), UseCaseError> {
    if let Some(raw) = selector {
        Selector::parse(raw).map_err(|_| {
            UseCaseError::Validation(format!("Invalid content selector: '{}'", raw))
        })?;
    }
    Ok(())
}
