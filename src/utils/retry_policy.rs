// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RetrySettings;
use crate::engines::traits::FetchError;
use std::time::Duration;

/// 重试策略配置
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大重试次数
    pub max_retries: u32,
    /// 初始退避时间
    pub initial_backoff: Duration,
    /// 最大退避时间
    pub max_backoff: Duration,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
    /// 是否启用抖动
    pub enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
            enable_jitter: true,
        }
    }
}

impl RetryPolicy {
    /// 根据配置创建重试策略
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
            ..Default::default()
        }
    }

    /// 计算下次重试的退避时间
    ///
    /// attempt从1开始计数
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_secs = self.initial_backoff.as_secs_f64()
            * self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);

        let capped_backoff = backoff_secs.min(self.max_backoff.as_secs_f64());

        // A zero backoff yields an empty jitter range, which rand rejects
        let jitter_range = capped_backoff * self.jitter_factor;
        let final_backoff = if self.enable_jitter && jitter_range > 0.0 {
            let jitter = rand::random_range(-jitter_range..jitter_range);
            (capped_backoff + jitter).max(0.0)
        } else {
            capped_backoff
        };

        Duration::from_secs_f64(final_backoff)
    }

    /// 是否还有重试额度
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// 结合错误类型判断是否应该重试
    ///
    /// 只有超时、连接失败和5xx状态是可重试的；4xx和配置类
    /// 错误重试没有意义
    pub fn should_retry_with_error(&self, attempt: u32, error: &FetchError) -> bool {
        self.should_retry(attempt) && error.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff_exponential() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_secs(1),
            enable_jitter: false,
            ..Default::default()
        };

        assert_eq!(policy.calculate_backoff(1), Duration::from_secs(1));
        assert_eq!(policy.calculate_backoff(2), Duration::from_secs(2));
        assert_eq!(policy.calculate_backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn test_calculate_backoff_with_jitter() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_secs(1),
            jitter_factor: 0.1,
            enable_jitter: true,
            ..Default::default()
        };

        let backoff = policy.calculate_backoff(2);
        // 2s ± 10%
        assert!(backoff >= Duration::from_millis(1800));
        assert!(backoff <= Duration::from_millis(2200));
    }

    #[test]
    fn test_calculate_backoff_max_limit() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
            enable_jitter: false,
            ..Default::default()
        };

        assert_eq!(policy.calculate_backoff(10), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_backoff_does_not_panic_with_jitter() {
        let policy = RetryPolicy {
            initial_backoff: Duration::ZERO,
            jitter_factor: 0.1,
            enable_jitter: true,
            ..Default::default()
        };

        assert_eq!(policy.calculate_backoff(1), Duration::ZERO);
        assert_eq!(policy.calculate_backoff(5), Duration::ZERO);
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_should_retry_with_error_respects_error_class() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry_with_error(1, &FetchError::Timeout));
        assert!(policy.should_retry_with_error(1, &FetchError::HttpStatus(503)));
        assert!(!policy.should_retry_with_error(1, &FetchError::HttpStatus(404)));
        assert!(!policy.should_retry_with_error(3, &FetchError::Timeout));
    }

    #[test]
    fn test_from_settings() {
        let settings = RetrySettings {
            max_retries: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 2000,
        };
        let policy = RetryPolicy::from_settings(&settings);
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
        assert_eq!(policy.max_backoff, Duration::from_millis(2000));
    }
}
