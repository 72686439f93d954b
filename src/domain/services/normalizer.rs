// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::extraction::ExtractionConfig;
use crate::domain::models::scrape_record::ScrapeRecord;
use crate::domain::services::extraction_service::ExtractionService;
use crate::engines::traits::{FetchError, FetchedDocument};
use serde_json::json;

/// 结果归一化器
///
/// 把文档句柄和可选的提取配置折叠成对外的统一记录形状
pub struct Normalizer;

impl Normalizer {
    /// 构造成功记录
    ///
    /// 传入提取配置时content为按字段提取的对象，否则为默认的
    /// text/links/images形状
    pub fn record(doc: &FetchedDocument, config: Option<&ExtractionConfig>) -> ScrapeRecord {
        let content = match config {
            Some(cfg) if !cfg.is_empty() => ExtractionService::extract(doc, cfg),
            _ => json!({
                "text": doc.full_text(),
                "links": doc.links(),
                "images": doc.images(),
            }),
        };

        ScrapeRecord {
            url: doc.final_url.to_string(),
            status_code: doc.status_code,
            title: doc.title(),
            meta_description: doc.meta_description(),
            content: Some(content),
            error: None,
        }
    }

    /// 由类型化抓取错误构造失败记录
    ///
    /// 失败记录保留请求方提交的URL，因为没有最终URL可用
    pub fn failure(requested_url: &str, error: &FetchError) -> ScrapeRecord {
        ScrapeRecord::failure(requested_url, error.to_string())
    }
}
