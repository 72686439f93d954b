// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::engines::browser_engine::BrowserEngine;
use crate::engines::crawl_engine::CrawlEngine;
use crate::engines::http_engine::HttpEngine;
use crate::engines::traits::{FetchEngine, FetchError, FetchRequest, FetchedDocument};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// 抓取方法
///
/// 请求方未指定时默认为Auto，在分发前解析为一个具体引擎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapeMethod {
    /// 按请求特征自动选择
    #[default]
    Auto,
    /// 单次HTTP GET
    Simple,
    /// 带礼貌性控制的HTTP抓取
    Crawling,
    /// 浏览器自动化
    Browser,
    /// 带反检测措施的浏览器自动化
    BrowserStealth,
}

/// 未知方法名错误，在发起任何网络请求之前返回
#[derive(Debug, thiserror::Error)]
#[error("Unknown scrape method: '{0}', expected one of auto, simple, crawling, browser, browser_stealth")]
pub struct UnknownMethod(pub String);

impl FromStr for ScrapeMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "simple" => Ok(Self::Simple),
            "crawling" => Ok(Self::Crawling),
            "browser" => Ok(Self::Browser),
            "browser_stealth" => Ok(Self::BrowserStealth),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ScrapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::Simple => "simple",
            Self::Crawling => "crawling",
            Self::Browser => "browser",
            Self::BrowserStealth => "browser_stealth",
        };
        write!(f, "{}", s)
    }
}

impl ScrapeMethod {
    /// 将Auto解析为具体方法
    ///
    /// 需要JavaScript渲染或等待元素出现时选择浏览器，否则选择
    /// 成本最低的simple。解析只发生一次，之后不再切换引擎
    pub fn resolve(self, js_required: bool, wait_for_element: bool) -> Self {
        match self {
            Self::Auto => {
                if js_required || wait_for_element {
                    Self::Browser
                } else {
                    Self::Simple
                }
            }
            concrete => concrete,
        }
    }
}

/// 引擎路由器
///
/// 持有全部引擎实例，将解析后的方法一次性分发到对应引擎。
/// 不做负载均衡和失败转移，一个请求自始至终只使用一个引擎
pub struct EngineRouter {
    http: Arc<HttpEngine>,
    crawl: Arc<CrawlEngine>,
    browser: Arc<BrowserEngine>,
    browser_stealth: Arc<BrowserEngine>,
}

impl EngineRouter {
    /// 根据配置创建路由器
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: Arc::new(HttpEngine),
            crawl: Arc::new(CrawlEngine::new(&settings.crawling)),
            browser: Arc::new(BrowserEngine::new(settings.browser.clone())),
            browser_stealth: Arc::new(BrowserEngine::stealth(settings.browser.clone())),
        }
    }

    /// 取得方法对应的引擎
    pub fn engine_for(&self, method: ScrapeMethod) -> Arc<dyn FetchEngine> {
        match method.resolve(false, false) {
            ScrapeMethod::Simple => self.http.clone(),
            ScrapeMethod::Crawling => self.crawl.clone(),
            ScrapeMethod::Browser => self.browser.clone(),
            ScrapeMethod::BrowserStealth => self.browser_stealth.clone(),
            // resolve() never returns Auto
            ScrapeMethod::Auto => self.http.clone(),
        }
    }

    /// 分发抓取请求
    ///
    /// # 参数
    ///
    /// * `method` - 已解析的抓取方法
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedDocument)` - 文档句柄
    /// * `Err(FetchError)` - 引擎返回的类型化错误
    pub async fn dispatch(
        &self,
        method: ScrapeMethod,
        request: &FetchRequest,
    ) -> Result<FetchedDocument, FetchError> {
        let engine = self.engine_for(method);
        debug!("Dispatching {} via engine '{}'", request.url, engine.name());
        engine.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_methods() {
        assert_eq!("auto".parse::<ScrapeMethod>().unwrap(), ScrapeMethod::Auto);
        assert_eq!(
            "simple".parse::<ScrapeMethod>().unwrap(),
            ScrapeMethod::Simple
        );
        assert_eq!(
            "crawling".parse::<ScrapeMethod>().unwrap(),
            ScrapeMethod::Crawling
        );
        assert_eq!(
            "browser".parse::<ScrapeMethod>().unwrap(),
            ScrapeMethod::Browser
        );
        assert_eq!(
            "browser_stealth".parse::<ScrapeMethod>().unwrap(),
            ScrapeMethod::BrowserStealth
        );
    }

    #[test]
    fn test_parse_unknown_method_is_rejected() {
        let err = "playwright".parse::<ScrapeMethod>().unwrap_err();
        assert!(err.to_string().contains("playwright"));
    }

    #[test]
    fn test_auto_resolution_matrix() {
        assert_eq!(
            ScrapeMethod::Auto.resolve(false, false),
            ScrapeMethod::Simple
        );
        assert_eq!(
            ScrapeMethod::Auto.resolve(true, false),
            ScrapeMethod::Browser
        );
        assert_eq!(
            ScrapeMethod::Auto.resolve(false, true),
            ScrapeMethod::Browser
        );
        assert_eq!(
            ScrapeMethod::Auto.resolve(true, true),
            ScrapeMethod::Browser
        );
    }

    #[test]
    fn test_concrete_methods_resolve_to_themselves() {
        for method in [
            ScrapeMethod::Simple,
            ScrapeMethod::Crawling,
            ScrapeMethod::Browser,
            ScrapeMethod::BrowserStealth,
        ] {
            assert_eq!(method.resolve(true, true), method);
        }
    }

    #[test]
    fn test_default_is_auto() {
        assert_eq!(ScrapeMethod::default(), ScrapeMethod::Auto);
    }

    #[test]
    fn test_display_round_trip() {
        for method in [
            ScrapeMethod::Auto,
            ScrapeMethod::Simple,
            ScrapeMethod::Crawling,
            ScrapeMethod::Browser,
            ScrapeMethod::BrowserStealth,
        ] {
            assert_eq!(method.to_string().parse::<ScrapeMethod>().unwrap(), method);
        }
    }
}
