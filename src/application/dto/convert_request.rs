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

use crate::domain::services::markdown_service::MarkdownDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// 网页转Markdown请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct MarkdownRequestDto {
    /// 目标URL
    #[validate(url)]
    pub url: String,
    /// 抓取方法名
    pub method: Option<String>,
    /// 可选的内容范围选择器
    pub content_selector: Option<String>,
}

/// 批量网页转Markdown请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BatchMarkdownRequestDto {
    /// 目标URL列表，不允许为空
    #[validate(length(min = 1, message = "urls must not be empty"))]
    pub urls: Vec<String>,
    /// 抓取方法名，批内共享
    pub method: Option<String>,
    /// 内容范围选择器，批内共享
    pub content_selector: Option<String>,
}

/// Markdown转换响应
#[derive(Debug, Serialize)]
pub struct MarkdownResponseDto {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MarkdownResponseDto {
    /// 成功产物
    pub fn ok(doc: MarkdownDocument) -> Self {
        Self {
            success: true,
            metadata: Some(serde_json::json!({
                "url": doc.url,
                "title": doc.title,
                "word_count": doc.word_count,
            })),
            content: Some(doc.markdown),
            error: None,
        }
    }

    /// 单条失败（用于批量场景中的逐条结果）
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            metadata: None,
            error: Some(error.into()),
        }
    }
}

/// 批量Markdown转换响应
#[derive(Debug, Serialize)]
pub struct BatchMarkdownResponseDto {
    pub success: bool,
    pub results: Vec<MarkdownResponseDto>,
}

/// PDF转Markdown请求
///
/// url与base64_data二选一
#[derive(Debug, Deserialize, Serialize)]
pub struct PdfRequestDto {
    /// PDF的URL
    pub url: Option<String>,
    /// base64编码的PDF字节流
    pub base64_data: Option<String>,
    /// 页码范围，形如"1-3,7"
    pub pages: Option<String>,
}

/// 批量PDF转Markdown请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BatchPdfRequestDto {
    /// PDF的URL列表，不允许为空
    #[validate(length(min = 1, message = "urls must not be empty"))]
    pub urls: Vec<String>,
    /// 页码范围，批内共享
    pub pages: Option<String>,
}

/// PDF转换响应
#[derive(Debug, Serialize)]
pub struct PdfResponseDto {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PdfResponseDto {
    /// 成功产物
    pub fn ok(doc: crate::domain::services::pdf_service::PdfDocument, source: &str) -> Self {
        Self {
            success: true,
            metadata: Some(serde_json::json!({
                "source": source,
                "total_pages": doc.total_pages,
                "extracted_pages": doc.extracted_pages,
            })),
            content: Some(doc.text),
            error: None,
        }
    }

    /// 单条失败（用于批量场景中的逐条结果）
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            metadata: None,
            error: Some(error.into()),
        }
    }
}

/// 批量PDF转换响应
#[derive(Debug, Serialize)]
pub struct BatchPdfResponseDto {
    pub success: bool,
    pub results: Vec<PdfResponseDto>,
}
