// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use base64::Engine as _;
use serde::Serialize;
use thiserror::Error;

/// PDF处理错误
#[derive(Error, Debug)]
pub enum PdfError {
    /// 页码范围语法错误
    #[error("Malformed page range '{0}', expected forms like '1-3,7'")]
    InvalidPageRange(String),
    /// base64解码失败
    #[error("Invalid base64 PDF payload: {0}")]
    InvalidBase64(String),
    /// 文本抽取失败
    #[error("PDF text extraction failed: {0}")]
    Extraction(String),
}

/// 解析后的页码选择
///
/// 1起始的页码集合，在发起任何网络请求之前完成解析
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    pages: Vec<usize>,
}

impl PageRange {
    /// 解析"1-3,7"形式的页码范围
    ///
    /// # 参数
    ///
    /// * `raw` - 范围表达式
    ///
    /// # 返回值
    ///
    /// * `Ok(PageRange)` - 升序去重后的页码集合
    /// * `Err(PdfError)` - 语法错误、页码为0或区间倒置
    pub fn parse(raw: &str) -> Result<Self, PdfError> {
        let malformed = || PdfError::InvalidPageRange(raw.to_string());

        let mut pages = Vec::new();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(malformed());
            }

            match part.split_once('-') {
                Some((start, end)) => {
                    let start: usize = start.trim().parse().map_err(|_| malformed())?;
                    let end: usize = end.trim().parse().map_err(|_| malformed())?;
                    if start == 0 || end < start {
                        return Err(malformed());
                    }
                    pages.extend(start..=end);
                }
                None => {
                    let page: usize = part.parse().map_err(|_| malformed())?;
                    if page == 0 {
                        return Err(malformed());
                    }
                    pages.push(page);
                }
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(Self { pages })
    }

    /// 是否包含指定页（1起始）
    pub fn contains(&self, page: usize) -> bool {
        self.pages.binary_search(&page).is_ok()
    }

    /// 页数
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// PDF文本抽取产物
#[derive(Debug, Clone, Serialize)]
pub struct PdfDocument {
    /// 抽取的文本
    pub text: String,
    /// 文档总页数（按分页符计）
    pub total_pages: usize,
    /// 实际输出的页数
    pub extracted_pages: usize,
}

/// PDF服务
///
/// 从PDF字节流抽取文本，支持页码范围筛选
pub struct PdfService;

impl PdfService {
    /// 解码base64形式的PDF字节流
    pub fn decode_base64(payload: &str) -> Result<Vec<u8>, PdfError> {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| PdfError::InvalidBase64(e.to_string()))
    }

    /// 从PDF字节流抽取文本
    ///
    /// # 参数
    ///
    /// * `bytes` - PDF字节流
    /// * `range` - 可选页码范围，超出文档页数的页码被忽略
    ///
    /// # 返回值
    ///
    /// * `Ok(PdfDocument)` - 抽取产物
    /// * `Err(PdfError)` - 字节流不是合法PDF
    pub fn extract_text(bytes: &[u8], range: Option<&PageRange>) -> Result<PdfDocument, PdfError> {
        let full_text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| PdfError::Extraction(e.to_string()))?;

        // Page boundaries come out as form feeds
        let pages: Vec<&str> = full_text.split('\u{c}').collect();
        let total_pages = pages.len();

        let (text, extracted_pages) = match range {
            Some(range) => {
                let selected: Vec<&str> = pages
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| range.contains(i + 1))
                    .map(|(_, p)| *p)
                    .collect();
                (selected.join("\n"), selected.len())
            }
            None => (full_text.clone(), total_pages),
        };

        Ok(PdfDocument {
            text: text.trim().to_string(),
            total_pages,
            extracted_pages,
        })
    }
}
