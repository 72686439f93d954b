// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlingSettings;
use crate::engines::http_engine::HttpEngine;
use crate::engines::traits::{FetchEngine, FetchError, FetchRequest, FetchedDocument};
use crate::utils::robots::RobotsChecker;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

/// 批量抓取引擎
///
/// 与HttpEngine同一能力等级，但带有面向批量任务的礼貌性控制：
/// 并发上限、带抖动的请求间隔和robots.txt约束
pub struct CrawlEngine {
    /// 并发闸门
    permits: Arc<Semaphore>,
    /// 请求间隔
    delay: Duration,
    /// 间隔抖动因子
    jitter_factor: f64,
    /// 是否遵循robots.txt
    respect_robots: bool,
    /// robots检查器
    robots: RobotsChecker,
}

impl CrawlEngine {
    /// 根据配置创建引擎
    pub fn new(settings: &CrawlingSettings) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(settings.max_concurrency.max(1))),
            delay: Duration::from_millis(settings.delay_ms),
            jitter_factor: settings.jitter_factor.clamp(0.0, 1.0),
            respect_robots: settings.respect_robots,
            robots: RobotsChecker::new(),
        }
    }

    /// 计算带抖动的本次间隔
    fn jittered_delay(&self) -> Duration {
        if self.delay.is_zero() {
            return Duration::ZERO;
        }
        let base = self.delay.as_secs_f64();
        if self.jitter_factor <= 0.0 {
            return self.delay;
        }
        let jitter_range = base * self.jitter_factor;
        let jitter = rand::random_range(-jitter_range..jitter_range);
        Duration::from_secs_f64((base + jitter).max(0.0))
    }
}

#[async_trait]
impl FetchEngine for CrawlEngine {
    /// 执行礼貌性受控的HTTP抓取
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
        // Concurrency cap; the permit is held for the duration of the fetch
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| FetchError::Unknown(format!("Semaphore closed: {}", e)))?;

        if self.respect_robots {
            match self.robots.is_allowed(&request.url, &request.user_agent).await {
                Ok(false) => {
                    return Err(FetchError::Unknown(format!(
                        "Blocked by robots.txt: {}",
                        request.url
                    )))
                }
                Ok(true) => {
                    if let Ok(Some(crawl_delay)) = self
                        .robots
                        .crawl_delay(&request.url, &request.user_agent)
                        .await
                    {
                        debug!("Honoring robots crawl-delay of {:?}", crawl_delay);
                        tokio::time::sleep(crawl_delay).await;
                    }
                }
                // Unreachable robots.txt is treated as allow
                Err(e) => debug!("Robots check failed for {}: {}", request.url, e),
            }
        }

        let delay = self.jittered_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        HttpEngine::fetch_once(request).await
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "crawl"
    }
}
