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

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::domain::models::scrape_record::{ImageRecord, LinkRecord};

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求超时
    #[error("Fetch timed out")]
    Timeout,
    /// 连接失败
    #[error("Connection failed: {0}")]
    Connection(String),
    /// HTTP错误状态码
    #[error("HTTP error status: {0}")]
    HttpStatus(u16),
    /// 其他错误
    #[error("Fetch failed: {0}")]
    Unknown(String),
}

impl FetchError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 超时、连接失败和5xx状态码可重试，其余不可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout => true,
            FetchError::Connection(_) => true,
            FetchError::HttpStatus(code) => *code >= 500,
            FetchError::Unknown(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::Unknown(e.to_string())
        }
    }
}

/// 浏览器页面交互动作
#[derive(Debug, Clone)]
pub enum PageAction {
    /// 等待指定毫秒数
    Wait { milliseconds: u64 },
    /// 点击元素
    Click { selector: String },
    /// 在元素中输入文本（表单填写）
    Input { selector: String, text: String },
    /// 页面滚动
    Scroll { direction: String },
}

/// 抓取请求
///
/// 所有后端共享的fetch参数；浏览器专有字段被非浏览器后端忽略
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// 目标URL
    pub url: String,
    /// 请求头
    pub headers: HashMap<String, String>,
    /// 超时时间
    pub timeout: Duration,
    /// User-Agent
    pub user_agent: String,
    /// 代理配置 (URL)
    pub proxy: Option<String>,
    /// 等待出现的元素选择器（仅浏览器后端）
    pub wait_for_selector: Option<String>,
    /// 是否滚动到底部以触发懒加载（仅浏览器后端）
    pub scroll_page: bool,
    /// 页面交互动作（仅浏览器后端）
    pub actions: Vec<PageAction>,
    /// 需要在页面内求值的XPath选择器（仅浏览器后端）
    pub xpath_selectors: Vec<String>,
}

impl FetchRequest {
    /// 以默认参数构造请求
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (compatible; extractrs/1.0; +http://extractrs.dev)"
                .to_string(),
            proxy: None,
            wait_for_selector: None,
            scroll_page: false,
            actions: Vec::new(),
            xpath_selectors: Vec::new(),
        }
    }
}

/// 抓取得到的文档句柄
///
/// 对单次fetch结果的后端无关抽象；创建它的引擎在返回前已经
/// 释放了底层资源（HTTP连接、浏览器实例）
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// 请求的原始URL
    pub requested_url: String,
    /// 最终URL（重定向后）
    pub final_url: Url,
    /// HTTP状态码（浏览器抓取时为None）
    pub status_code: Option<u16>,
    /// Content-Type
    pub content_type: Option<String>,
    /// Content-Length
    pub content_length: Option<u64>,
    /// 序列化HTML
    pub html: String,
    /// 浏览器后端预先求值的XPath结果，键为选择器
    pub xpath_results: HashMap<String, Vec<String>>,
    /// 产生该文档的引擎名称
    pub fetched_via: &'static str,
}

impl FetchedDocument {
    /// 页面标题
    pub fn title(&self) -> Option<String> {
        let document = Html::parse_document(&self.html);
        let selector = Selector::parse("title").ok()?;
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// meta描述
    pub fn meta_description(&self) -> Option<String> {
        let document = Html::parse_document(&self.html);
        let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// 页面全部可见文本
    pub fn full_text(&self) -> String {
        let document = Html::parse_document(&self.html);
        let body = Selector::parse("body").ok();
        let root = body
            .as_ref()
            .and_then(|sel| document.select(sel).next());

        let text: Vec<&str> = match root {
            Some(el) => el.text().collect(),
            None => document.root_element().text().collect(),
        };

        // Collapse whitespace runs left behind by markup removal
        text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// 页面中的全部链接，相对地址按最终URL解析为绝对地址
    pub fn links(&self) -> Vec<LinkRecord> {
        let document = Html::parse_document(&self.html);
        let selector = match Selector::parse("a[href]") {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };

        document
            .select(&selector)
            .filter_map(|el| {
                let href = el.value().attr("href")?;
                let resolved = self.resolve(href)?;
                Some(LinkRecord {
                    url: resolved.to_string(),
                    text: el.text().collect::<String>().trim().to_string(),
                })
            })
            .collect()
    }

    /// 页面中的全部图片，相对地址按最终URL解析为绝对地址
    pub fn images(&self) -> Vec<ImageRecord> {
        let document = Html::parse_document(&self.html);
        let selector = match Selector::parse("img[src]") {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };

        document
            .select(&selector)
            .filter_map(|el| {
                let src = el.value().attr("src")?;
                let resolved = self.resolve(src)?;
                Some(ImageRecord {
                    src: resolved.to_string(),
                    alt: el.value().attr("alt").unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    /// 将相对地址按最终URL（而非请求URL）解析为绝对地址
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.final_url.join(href).ok()
    }
}

/// 抓取引擎特质
///
/// 每个后端实现同一份契约：成功返回文档句柄，失败返回类型化错误，
/// 且无论哪条退出路径都不泄漏底层资源
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// 执行抓取
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedDocument, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
