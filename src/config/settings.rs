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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、抓取、限流、缓存和重试等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取配置
    pub scraping: ScrapingSettings,
    /// 速率限制配置
    pub rate_limiting: RateLimitingSettings,
    /// 响应缓存配置
    pub cache: CacheSettings,
    /// 重试配置
    pub retry: RetrySettings,
    /// 批量抓取礼貌性配置
    pub crawling: CrawlingSettings,
    /// 浏览器引擎配置
    pub browser: BrowserSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingSettings {
    /// 默认请求超时时间（秒）
    pub default_timeout_secs: u64,
    /// 默认User-Agent
    pub user_agent: String,
    /// 单次批量请求允许的最大URL数
    pub max_batch_size: usize,
}

/// 速率限制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    /// 是否启用速率限制
    pub enabled: bool,
    /// 每秒允许发起的抓取请求数
    pub requests_per_second: u32,
}

/// 响应缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// 是否启用响应缓存
    pub enabled: bool,
    /// 缓存条目存活时间（秒）
    pub ttl_secs: u64,
    /// 最大缓存条目数
    pub max_entries: usize,
}

/// 重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// 最大重试次数
    pub max_retries: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
}

/// 批量抓取礼貌性配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlingSettings {
    /// 并发上限
    pub max_concurrency: usize,
    /// 请求间隔（毫秒）
    pub delay_ms: u64,
    /// 间隔抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
    /// 是否遵循robots.txt
    pub respect_robots: bool,
}

/// 浏览器引擎配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 远程调试地址 (为空则本地启动)
    pub remote_debugging_url: Option<String>,
    /// 页面加载超时时间（秒）
    pub navigation_timeout_secs: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从默认值、配置文件和环境变量加载配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default scraping settings
            .set_default("scraping.default_timeout_secs", 30)?
            .set_default(
                "scraping.user_agent",
                "Mozilla/5.0 (compatible; extractrs/1.0; +http://extractrs.dev)",
            )?
            .set_default("scraping.max_batch_size", 50)?
            // Default rate limiting settings
            .set_default("rate_limiting.enabled", true)?
            .set_default("rate_limiting.requests_per_second", 10)?
            // Default cache settings
            .set_default("cache.enabled", true)?
            .set_default("cache.ttl_secs", 300)?
            .set_default("cache.max_entries", 1000)?
            // Default retry settings
            .set_default("retry.max_retries", 3)?
            .set_default("retry.initial_backoff_ms", 500)?
            .set_default("retry.max_backoff_ms", 10_000)?
            // Default crawling politeness settings
            .set_default("crawling.max_concurrency", 5)?
            .set_default("crawling.delay_ms", 500)?
            .set_default("crawling.jitter_factor", 0.2)?
            .set_default("crawling.respect_robots", true)?
            // Default browser settings
            .set_default("browser.navigation_timeout_secs", 60)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("EXTRACTRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
