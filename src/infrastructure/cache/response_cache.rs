// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CacheSettings;
use crate::domain::models::scrape_record::ScrapeRecord;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// 缓存条目
#[derive(Clone)]
struct CacheEntry {
    record: ScrapeRecord,
    expires_at: Instant,
}

/// 缓存统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// 命中次数
    pub hits: u64,
    /// 未命中次数
    pub misses: u64,
    /// 当前条目数
    pub entries: usize,
}

/// 抓取结果缓存
///
/// 进程内TTL缓存，只缓存成功记录。显式构造注入，
/// 不使用进程级全局状态
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// 根据配置创建缓存
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::from_secs(settings.ttl_secs),
            max_entries: settings.max_entries.max(1),
            enabled: settings.enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// 构造缓存键
    ///
    /// 同一URL在不同方法或提取配置下的结果不能互相串用
    pub fn key(method: &str, url: &str, config_fingerprint: &str) -> String {
        format!("{}|{}|{}", method, url, config_fingerprint)
    }

    /// 查询缓存
    pub fn get(&self, key: &str) -> Option<ScrapeRecord> {
        if !self.enabled {
            return None;
        }

        // Copy out and release the shard guard before any remove on the
        // same map, otherwise the expired branch deadlocks on its own shard
        let cached = self
            .entries
            .get(key)
            .map(|entry| (entry.record.clone(), entry.expires_at));

        match cached {
            Some((record, expires_at)) if expires_at > Instant::now() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("cache_hits_total").increment(1);
                Some(record)
            }
            Some(_) => {
                self.entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
        }
    }

    /// 写入缓存
    ///
    /// 失败记录不缓存，避免把瞬时故障固化到TTL窗口内
    pub fn put(&self, key: String, record: &ScrapeRecord) {
        if !self.enabled || !record.is_success() {
            return;
        }

        if self.entries.len() >= self.max_entries {
            self.evict();
        }

        self.entries.insert(
            key,
            CacheEntry {
                record: record.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// 腾出空间
    ///
    /// 先清过期条目；仍然满则按过期时间淘汰最早过期的一条
    fn evict(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);

        if self.entries.len() >= self.max_entries {
            let victim = self
                .entries
                .iter()
                .min_by_key(|e| e.value().expires_at)
                .map(|e| e.key().clone());
            if let Some(key) = victim {
                debug!("Evicting cache entry {}", key);
                self.entries.remove(&key);
            }
        }
    }

    /// 当前统计
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
