// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::FetchedDocument;
use scraper::{Html, Selector};
use serde::Serialize;
use thiserror::Error;

/// Markdown转换错误
#[derive(Error, Debug)]
pub enum MarkdownError {
    /// 选择器不合法
    #[error("Invalid content selector: '{0}'")]
    InvalidSelector(String),
    /// 选择器无匹配
    #[error("Content selector '{0}' matched nothing")]
    SelectorMatchedNothing(String),
}

/// Markdown转换产物
#[derive(Debug, Clone, Serialize)]
pub struct MarkdownDocument {
    /// 源页面最终URL
    pub url: String,
    /// Markdown文本
    pub markdown: String,
    /// 页面标题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// 词数
    pub word_count: usize,
}

/// Markdown转换服务
///
/// 将抓取到的HTML转成Markdown，可用选择器把转换范围
/// 收窄到页面的某一块
pub struct MarkdownService;

impl MarkdownService {
    /// 转换整页或选择器命中的区域
    ///
    /// # 参数
    ///
    /// * `doc` - 文档句柄
    /// * `content_selector` - 可选的范围选择器
    ///
    /// # 返回值
    ///
    /// * `Ok(MarkdownDocument)` - 转换产物
    /// * `Err(MarkdownError)` - 选择器不合法或无匹配
    pub fn convert(
        doc: &FetchedDocument,
        content_selector: Option<&str>,
    ) -> Result<MarkdownDocument, MarkdownError> {
        let source_html = match content_selector {
            Some(raw) => {
                let selector = Selector::parse(raw)
                    .map_err(|_| MarkdownError::InvalidSelector(raw.to_string()))?;
                let html = Html::parse_document(&doc.html);
                let fragments: Vec<String> =
                    html.select(&selector).map(|el| el.html()).collect();
                if fragments.is_empty() {
                    return Err(MarkdownError::SelectorMatchedNothing(raw.to_string()));
                }
                fragments.join("\n")
            }
            None => doc.html.clone(),
        };

        let markdown = html2md::parse_html(&source_html).trim().to_string();
        let word_count = markdown.split_whitespace().count();

        Ok(MarkdownDocument {
            url: doc.final_url.to_string(),
            markdown,
            title: doc.title(),
            word_count,
        })
    }
}
