// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::convert_request::{
    BatchPdfRequestDto, PdfRequestDto, PdfResponseDto,
};
use crate::application::usecases::{require_valid_url, Fetcher, UseCaseError};
use crate::domain::services::pdf_service::{PageRange, PdfService};
use std::sync::Arc;

/// PDF转Markdown用例
///
/// 字节来源为URL或base64二选一；页码范围在任何网络请求
/// 之前解析
pub struct ConvertPdfUseCase {
    fetcher: Arc<Fetcher>,
}

impl ConvertPdfUseCase {
    /// 创建用例
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    /// 执行单个PDF转换
    pub async fn execute(&self, dto: PdfRequestDto) -> Result<PdfResponseDto, UseCaseError> {
        let range = parse_range(dto.pages.as_deref())?;

        let (bytes, source) = match (&dto.url, &dto.base64_data) {
            (Some(url), None) => {
                require_valid_url(url)?;
                let bytes = match self.fetcher.fetch_bytes(url).await {
                    Ok(bytes) => bytes,
                    Err(e) => return Ok(PdfResponseDto::failed(e.to_string())),
                };
                (bytes, url.clone())
            }
            (None, Some(payload)) => {
                let bytes = PdfService::decode_base64(payload)
                    .map_err(|e| UseCaseError::Validation(e.to_string()))?;
                (bytes, "base64".to_string())
            }
            _ => {
                return Err(UseCaseError::Validation(
                    "exactly one of 'url' or 'base64_data' must be provided".to_string(),
                ))
            }
        };

        Ok(match PdfService::extract_text(&bytes, range.as_ref()) {
            Ok(doc) => PdfResponseDto::ok(doc, &source),
            Err(e) => PdfResponseDto::failed(e.to_string()),
        })
    }

    /// 执行批量PDF转换，输出顺序与输入顺序一致
    pub async fn execute_batch(
        &self,
        dto: BatchPdfRequestDto,
    ) -> Result<Vec<PdfResponseDto>, UseCaseError> {
        if dto.urls.is_empty() {
            return Err(UseCaseError::Validation(
                "urls must not be empty".to_string(),
            ));
        }
        for url in &dto.urls {
            require_valid_url(url)?;
        }
        let range = parse_range(dto.pages.as_deref())?;

        let futures = dto.urls.iter().map(|url| {
            let range = range.clone();
            async move {
                match self.fetcher.fetch_bytes(url).await {
                    Ok(bytes) => match PdfService::extract_text(&bytes, range.as_ref()) {
                        Ok(doc) => PdfResponseDto::ok(doc, url),
                        Err(e) => PdfResponseDto::failed(e.to_string()),
                    },
                    Err(e) => PdfResponseDto::failed(e.to_string()),
                }
            }
        });
        Ok(futures::future::join_all(futures).await)
    }
}

/// 页码范围在任何网络请求之前解析
fn parse_range(raw: Option<&str>) -> Result<Option<PageRange>, UseCaseError> {
    raw.map(PageRange::parse)
        .transpose()
        .map_err(|e| UseCaseError::Validation(e.to_string()))
}
