// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::analyze_links::ExtractLinksUseCase;
use crate::application::usecases::check_robots::CheckRobotsUseCase;
use crate::application::usecases::convert_markdown::ConvertMarkdownUseCase;
use crate::application::usecases::convert_pdf::ConvertPdfUseCase;
use crate::application::usecases::page_info::PageInfoUseCase;
use crate::application::usecases::scrape_batch::BatchScrapeUseCase;
use crate::application::usecases::scrape_page::ScrapeUseCase;
use crate::application::usecases::Fetcher;
use crate::config::settings::Settings;
use crate::engines::router::EngineRouter;
use crate::infrastructure::cache::response_cache::ResponseCache;
use crate::infrastructure::rate_limit::RateLimitGate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// 应用状态
///
/// 进程启动时一次性构造的全部依赖，经路由层注入各handler。
/// 不存在模块级全局单例，生命周期随进程明确起止
pub struct AppState {
    pub scrape: Arc<ScrapeUseCase>,
    pub batch_scrape: Arc<BatchScrapeUseCase>,
    pub links: Arc<ExtractLinksUseCase>,
    pub page_info: Arc<PageInfoUseCase>,
    pub robots: Arc<CheckRobotsUseCase>,
    pub markdown: Arc<ConvertMarkdownUseCase>,
    pub pdf: Arc<ConvertPdfUseCase>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// 装配全部依赖
    pub fn build(settings: Arc<Settings>, metrics_handle: Option<PrometheusHandle>) -> Self {
        let router = Arc::new(EngineRouter::new(&settings));
        let gate = Arc::new(RateLimitGate::new(&settings.rate_limiting));
        let cache = Arc::new(ResponseCache::new(&settings.cache));
        let fetcher = Arc::new(Fetcher::new(router, gate, settings.clone()));

        let scrape = Arc::new(ScrapeUseCase::new(fetcher.clone(), cache));
        let batch_scrape = Arc::new(BatchScrapeUseCase::new(
            scrape.clone(),
            settings.scraping.max_batch_size,
        ));

        Self {
            scrape,
            batch_scrape,
            links: Arc::new(ExtractLinksUseCase::new(fetcher.clone())),
            page_info: Arc::new(PageInfoUseCase::new(fetcher.clone())),
            robots: Arc::new(CheckRobotsUseCase::new(
                settings.scraping.user_agent.clone(),
            )),
            markdown: Arc::new(ConvertMarkdownUseCase::new(fetcher.clone())),
            pdf: Arc::new(ConvertPdfUseCase::new(fetcher)),
            metrics_handle,
        }
    }
}
