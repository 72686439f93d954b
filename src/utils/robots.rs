// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::retry_policy::RetryPolicy;
use anyhow::Result;
use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use url::Url;

/// 缓存的Robots.txt内容
#[derive(Clone)]
struct CachedRobots {
    /// 内容
    content: String,
    /// 是否成功取到（404和持久失败都记为false）
    fetched: bool,
    /// 过期时间
    expires_at: Instant,
}

/// Robots.txt检查器
///
/// 按host缓存robots.txt内容一小时，抓取失败按"允许访问"处理
#[derive(Clone)]
pub struct RobotsChecker {
    /// HTTP客户端
    client: Client,
    /// 内存缓存
    memory_cache: Arc<Mutex<HashMap<String, CachedRobots>>>,
    /// 重试策略
    retry_policy: RetryPolicy,
}

impl Default for RobotsChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotsChecker {
    /// 创建新的Robots检查器实例
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            memory_cache: Arc::new(Mutex::new(HashMap::new())),
            retry_policy: RetryPolicy {
                max_retries: 3,
                initial_backoff: Duration::from_secs(2),
                max_backoff: Duration::from_secs(10),
                ..Default::default()
            },
        }
    }

    /// 检查URL是否被允许访问
    ///
    /// # 参数
    ///
    /// * `url_str` - 目标URL
    /// * `user_agent` - User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 允许访问（包括robots.txt不存在的情况）
    /// * `Ok(false)` - 被robots.txt禁止
    pub async fn is_allowed(&self, url_str: &str, user_agent: &str) -> Result<bool> {
        let (content, _) = self.get_robots_content(url_str).await?;
        if content.is_empty() {
            return Ok(true);
        }
        let mut matcher = DefaultMatcher::default();
        Ok(matcher.one_agent_allowed_by_robots(&content, user_agent, url_str))
    }

    /// 获取适用于该User-Agent的爬取延迟
    pub async fn crawl_delay(&self, url_str: &str, user_agent: &str) -> Result<Option<Duration>> {
        let (content, _) = self.get_robots_content(url_str).await?;
        Ok(parse_crawl_delay(&content, user_agent))
    }

    /// 取得robots.txt原始内容及诊断信息
    ///
    /// 供robots检查工具使用，返回(robots.txt的URL, 内容, 是否取到)
    pub async fn fetch_report(&self, url_str: &str) -> Result<(String, String, bool)> {
        let robots_url = robots_url_for(url_str)?;
        let (content, fetched) = self.get_robots_content(url_str).await?;
        Ok((robots_url, content, fetched))
    }

    /// 获取Robots.txt内容（带缓存）
    async fn get_robots_content(&self, url_str: &str) -> Result<(String, bool)> {
        let robots_url = robots_url_for(url_str)?;

        // 1. Check memory cache
        {
            let mut cache = self.memory_cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = cache.get(&robots_url) {
                if cached.expires_at > Instant::now() {
                    return Ok((cached.content.clone(), cached.fetched));
                } else {
                    cache.remove(&robots_url);
                }
            }
        }

        // SSRF protection
        crate::utils::validators::validate_target_url(&robots_url).await?;

        // 2. Fetch robots.txt with retry
        let mut attempt = 0;
        let mut content = String::new();
        let mut fetched = false;
        let mut last_error = None;

        while attempt < self.retry_policy.max_retries {
            attempt += 1;
            let response = self
                .client
                .get(&robots_url)
                .header("User-Agent", "extractrs-bot/1.0")
                .timeout(Duration::from_secs(5))
                .send()
                .await;

            match response {
                Ok(resp) => {
                    if resp.status().is_success() {
                        content = resp.text().await.unwrap_or_default();
                        fetched = true;
                        last_error = None;
                        break;
                    } else if resp.status() == reqwest::StatusCode::NOT_FOUND {
                        // 404 is a valid response, meaning no robots.txt
                        last_error = None;
                        break;
                    } else if resp.status().is_server_error() {
                        last_error = Some(anyhow::anyhow!("Server error: {}", resp.status()));
                    } else {
                        // Other client errors are treated as "no robots.txt"
                        last_error = None;
                        break;
                    }
                }
                Err(e) => {
                    last_error = Some(anyhow::anyhow!("Request failed: {}", e));
                }
            }

            if attempt < self.retry_policy.max_retries {
                let backoff = self.retry_policy.calculate_backoff(attempt);
                tokio::time::sleep(backoff).await;
            }
        }

        if let Some(err) = last_error {
            tracing::warn!("Failed to fetch robots.txt from {}: {}", robots_url, err);
            // Default to empty content on persistent error
            content = String::new();
        }

        // 3. Update memory cache
        {
            let mut cache = self.memory_cache.lock().unwrap_or_else(|e| e.into_inner());
            cache.insert(
                robots_url,
                CachedRobots {
                    content: content.clone(),
                    fetched,
                    expires_at: Instant::now() + Duration::from_secs(3600),
                },
            );
        }

        Ok((content, fetched))
    }
}

/// 由任意页面URL推导robots.txt的URL
fn robots_url_for(url_str: &str) -> Result<String> {
    let url = Url::parse(url_str)?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid URL: {}", url_str))?;
    let scheme = url.scheme();
    match url.port() {
        Some(port) => Ok(format!("{}://{}:{}/robots.txt", scheme, host, port)),
        None => Ok(format!("{}://{}/robots.txt", scheme, host)),
    }
}

/// 解析适用于该User-Agent的Crawl-delay指令
///
/// 精确的agent块优先于通配块
fn parse_crawl_delay(content: &str, user_agent: &str) -> Option<Duration> {
    let mut current_agent_matched = false;
    let mut delay: Option<f64> = None;
    let mut specific_agent_found = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let lower_line = line.to_lowercase();
        if lower_line.starts_with("user-agent:") {
            let agent = line[11..].trim();
            if agent == "*" {
                current_agent_matched = !specific_agent_found;
            } else if user_agent.to_lowercase().contains(&agent.to_lowercase()) {
                current_agent_matched = true;
                specific_agent_found = true;
                delay = None;
            } else {
                current_agent_matched = false;
            }
        } else if lower_line.starts_with("crawl-delay:") && current_agent_matched {
            if let Ok(d) = line[12..].trim().parse::<f64>() {
                delay = Some(d);
            }
        }
    }

    delay.map(Duration::from_secs_f64)
}
