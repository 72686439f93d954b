// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{
    FetchEngine, FetchError, FetchRequest, FetchedDocument, PageAction,
};
use crate::utils::validators;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use rand::prelude::IndexedRandom;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// 隐身模式的候选User-Agent池
const STEALTH_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
];

/// 浏览器引擎
///
/// 基于chromiumoxide的浏览器自动化抓取引擎，可等待元素出现、
/// 滚动触发懒加载并执行页面交互动作；stealth变体附加反检测措施。
/// 每次fetch独占一个浏览器实例，任何退出路径都会销毁它
pub struct BrowserEngine {
    settings: BrowserSettings,
    stealth: bool,
}

impl BrowserEngine {
    /// 创建普通浏览器引擎
    pub fn new(settings: BrowserSettings) -> Self {
        Self {
            settings,
            stealth: false,
        }
    }

    /// 创建隐身浏览器引擎
    pub fn stealth(settings: BrowserSettings) -> Self {
        Self {
            settings,
            stealth: true,
        }
    }

    /// 是否为隐身变体
    pub fn is_stealth(&self) -> bool {
        self.stealth
    }

    /// 启动或连接浏览器实例
    async fn launch(&self) -> Result<(Browser, tokio::task::JoinHandle<()>), FetchError> {
        let (browser, mut handler) = if let Some(url) = &self.settings.remote_debugging_url {
            debug!("Connecting to remote Chrome instance at {}", url);
            Browser::connect(url).await.map_err(|e| {
                FetchError::Connection(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(Duration::from_secs(
                    self.settings.navigation_timeout_secs,
                ));

            builder = builder.arg("--disable-gpu").arg("--disable-dev-shm-usage");

            if self.stealth {
                // Suppress the most common automation fingerprint signals
                builder = builder
                    .arg("--disable-blink-features=AutomationControlled")
                    .arg("--disable-infobars")
                    .arg("--no-first-run")
                    .arg("--no-default-browser-check");
            }

            Browser::launch(
                builder
                    .build()
                    .map_err(|e| FetchError::Unknown(e.to_string()))?,
            )
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?
        };

        let event_loop = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok((browser, event_loop))
    }

    /// 隐身模式下的随机动作间隔
    async fn stealth_pause(&self) {
        if self.stealth {
            let millis = rand::random_range(120..600);
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    /// 驱动页面完成导航、等待、交互和内容采集
    async fn drive_page(
        &self,
        page: &Page,
        request: &FetchRequest,
    ) -> Result<FetchedDocument, FetchError> {
        let user_agent = if self.stealth {
            STEALTH_USER_AGENTS
                .choose(&mut rand::rng())
                .copied()
                .unwrap_or(request.user_agent.as_str())
                .to_string()
        } else {
            request.user_agent.clone()
        };
        page.set_user_agent(user_agent.as_str())
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        page.goto(request.url.as_str())
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        if self.stealth {
            // Patch the leftover automation marker and trace a short
            // human-like pointer path across the viewport
            let _ = page
                .evaluate(
                    r#"(() => {
                        Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
                        let x = 100 + Math.random() * 200, y = 100 + Math.random() * 200;
                        for (let i = 0; i < 8; i++) {
                            x += (Math.random() - 0.5) * 80;
                            y += (Math.random() - 0.5) * 60;
                            document.dispatchEvent(new MouseEvent('mousemove', {
                                clientX: Math.max(0, x), clientY: Math.max(0, y), bubbles: true
                            }));
                        }
                    })()"#,
                )
                .await;
        }

        if let Some(selector) = &request.wait_for_selector {
            self.wait_for_element(page, selector, request.timeout).await?;
        }

        for action in &request.actions {
            self.stealth_pause().await;
            match action {
                PageAction::Wait { milliseconds } => {
                    tokio::time::sleep(Duration::from_millis(*milliseconds)).await;
                }
                PageAction::Click { selector } => {
                    page.find_element(selector.as_str())
                        .await
                        .map_err(|e| {
                            FetchError::Unknown(format!(
                                "Click failed, element not found: {}",
                                e
                            ))
                        })?
                        .click()
                        .await
                        .map_err(|e| FetchError::Unknown(format!("Click failed: {}", e)))?;
                }
                PageAction::Input { selector, text } => {
                    page.find_element(selector.as_str())
                        .await
                        .map_err(|e| {
                            FetchError::Unknown(format!(
                                "Input failed, element not found: {}",
                                e
                            ))
                        })?
                        .type_str(text.as_str())
                        .await
                        .map_err(|e| FetchError::Unknown(format!("Input failed: {}", e)))?;
                }
                PageAction::Scroll { direction } => {
                    let script = match direction.as_str() {
                        "down" => "window.scrollBy(0, window.innerHeight);",
                        "up" => "window.scrollBy(0, -window.innerHeight);",
                        "bottom" => "window.scrollTo(0, document.body.scrollHeight);",
                        "top" => "window.scrollTo(0, 0);",
                        _ => "window.scrollBy(0, window.innerHeight);",
                    };
                    page.evaluate(script)
                        .await
                        .map_err(|e| FetchError::Unknown(format!("Scroll failed: {}", e)))?;
                }
            }
        }

        if request.scroll_page {
            // Stepwise scroll to the bottom so lazy-loaded content fires
            for _ in 0..5 {
                let _ = page
                    .evaluate("window.scrollBy(0, document.body.scrollHeight / 5);")
                    .await;
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
        }

        let mut xpath_results = HashMap::new();
        for selector in &request.xpath_selectors {
            match self.evaluate_xpath(page, selector).await {
                Ok(values) => {
                    xpath_results.insert(selector.clone(), values);
                }
                Err(e) => warn!("XPath evaluation failed for '{}': {}", selector, e),
            }
        }

        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .and_then(|u| Url::parse(&u).ok())
            .or_else(|| Url::parse(&request.url).ok())
            .ok_or_else(|| FetchError::Unknown("Invalid final URL".to_string()))?;

        let html = page
            .content()
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        Ok(FetchedDocument {
            requested_url: request.url.clone(),
            final_url,
            // CDP navigation does not surface an HTTP status here
            status_code: None,
            content_type: Some("text/html".to_string()),
            content_length: None,
            html,
            xpath_results,
            fetched_via: if self.stealth { "browser_stealth" } else { "browser" },
        })
    }

    /// 轮询等待元素出现
    async fn wait_for_element(
        &self,
        page: &Page,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), FetchError> {
        let deadline = Instant::now() + timeout;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(FetchError::Timeout);
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }

    /// 在页面内求值XPath选择器，返回匹配节点的文本序列
    async fn evaluate_xpath(&self, page: &Page, selector: &str) -> Result<Vec<String>, FetchError> {
        // Escape the selector as a JS string literal
        let encoded = serde_json::to_string(selector)
            .map_err(|e| FetchError::Unknown(e.to_string()))?;
        let script = format!(
            r#"(() => {{
                const out = [];
                const snapshot = document.evaluate({encoded}, document, null,
                    XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
                for (let i = 0; i < snapshot.snapshotLength; i++) {{
                    const node = snapshot.snapshotItem(i);
                    out.push(node.nodeType === 1 ? (node.textContent || '') : String(node.nodeValue || ''));
                }}
                return out;
            }})()"#
        );

        page.evaluate(script)
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?
            .into_value::<Vec<String>>()
            .map_err(|e| FetchError::Unknown(e.to_string()))
    }
}

#[async_trait]
impl FetchEngine for BrowserEngine {
    /// 执行浏览器自动化抓取
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
        // SSRF protection
        validators::validate_target_url(&request.url)
            .await
            .map_err(|e| FetchError::Unknown(format!("SSRF protection: {}", e)))?;

        let (mut browser, event_loop) = self.launch().await?;

        // Page work runs under the request timeout; teardown happens on
        // every path below, including timeout and error
        let result = tokio::time::timeout(request.timeout, async {
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| FetchError::Unknown(e.to_string()))?;
            self.drive_page(&page, request).await
        })
        .await;

        if let Err(e) = browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        let _ = browser.wait().await;
        event_loop.abort();

        match result {
            Ok(inner) => inner,
            Err(_) => Err(FetchError::Timeout),
        }
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        if self.stealth {
            "browser_stealth"
        } else {
            "browser"
        }
    }
}
