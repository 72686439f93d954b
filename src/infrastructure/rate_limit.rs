// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RateLimitingSettings;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// 全局抓取速率闸门
///
/// 对外发请求统一经过这里排队；关闭时直接放行。
/// 构造后注入使用，没有进程级全局状态
pub struct RateLimitGate {
    limiter: Option<DefaultDirectRateLimiter>,
}

impl RateLimitGate {
    /// 根据配置创建闸门
    pub fn new(settings: &RateLimitingSettings) -> Self {
        let limiter = if settings.enabled {
            let per_second =
                NonZeroU32::new(settings.requests_per_second.max(1)).unwrap_or(NonZeroU32::MIN);
            Some(RateLimiter::direct(Quota::per_second(per_second)))
        } else {
            None
        };

        Self { limiter }
    }

    /// 等待直到允许发起一次抓取
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// 是否启用
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_disabled_gate_does_not_block() {
        let gate = RateLimitGate::new(&RateLimitingSettings {
            enabled: false,
            requests_per_second: 1,
        });
        assert!(!gate.is_enabled());

        let start = Instant::now();
        for _ in 0..100 {
            gate.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_enabled_gate_paces_requests() {
        let gate = RateLimitGate::new(&RateLimitingSettings {
            enabled: true,
            requests_per_second: 10,
        });
        assert!(gate.is_enabled());

        // Burst capacity covers the first 10; the next ones must wait
        let start = Instant::now();
        for _ in 0..12 {
            gate.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_zero_rps_is_clamped() {
        // Must not panic on a zero configuration value
        let gate = RateLimitGate::new(&RateLimitingSettings {
            enabled: true,
            requests_per_second: 0,
        });
        assert!(gate.is_enabled());
    }
}
