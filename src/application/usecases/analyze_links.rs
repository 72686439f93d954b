// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::link_request::ExtractLinksRequestDto;
use crate::application::usecases::{require_valid_url, Fetcher, UseCaseError};
use crate::domain::services::link_service::{LinkAnalysis, LinkFilter, LinkService};
use std::sync::Arc;

/// 链接提取用例
///
/// 抓取页面后按固定顺序（允许列表、排除列表、同域限制）
/// 过滤链接并做同域分类
pub struct ExtractLinksUseCase {
    fetcher: Arc<Fetcher>,
}

impl ExtractLinksUseCase {
    /// 创建用例
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    /// 执行链接提取
    ///
    /// # 返回值
    ///
    /// * `Ok((final_url, LinkAnalysis))` - 最终URL与过滤分类结果
    /// * `Err(UseCaseError)` - 校验失败或抓取失败
    pub async fn execute(
        &self,
        dto: ExtractLinksRequestDto,
    ) -> Result<(String, LinkAnalysis), UseCaseError> {
        require_valid_url(&dto.url)?;
        let method = self.fetcher.parse_method(dto.method.as_deref())?;
        let resolved = method.resolve(false, false);

        let request = self.fetcher.base_request(&dto.url);
        let doc = self.fetcher.fetch(resolved, &request).await?;

        let filter = LinkFilter {
            filter_domains: dto.filter_domains.unwrap_or_default(),
            exclude_domains: dto.exclude_domains.unwrap_or_default(),
            internal_only: dto.internal_only.unwrap_or(false),
        };

        let links = doc.links();
        let analysis = LinkService::analyze(&links, &doc.final_url, &filter);
        Ok((doc.final_url.to_string(), analysis))
    }
}
