// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::page_info::{PageInfoRequestDto, PageInfoResponseDto};
use crate::application::usecases::{require_valid_url, Fetcher, UseCaseError};
use crate::engines::router::ScrapeMethod;
use std::sync::Arc;

/// 页面信息用例
///
/// 只取轻量元数据，无论全局默认是什么都走成本最低的simple后端
pub struct PageInfoUseCase {
    fetcher: Arc<Fetcher>,
}

impl PageInfoUseCase {
    /// 创建用例
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    /// 执行页面信息查询
    pub async fn execute(
        &self,
        dto: PageInfoRequestDto,
    ) -> Result<PageInfoResponseDto, UseCaseError> {
        require_valid_url(&dto.url)?;

        let request = self.fetcher.base_request(&dto.url);
        let doc = self.fetcher.fetch(ScrapeMethod::Simple, &request).await?;

        Ok(PageInfoResponseDto {
            success: true,
            url: doc.final_url.to_string(),
            status_code: doc.status_code,
            title: doc.title(),
            description: doc.meta_description(),
            content_type: doc.content_type.clone(),
            content_length: doc.content_length,
        })
    }
}
