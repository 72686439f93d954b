// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::scrape_request::BatchScrapeRequestDto;
use crate::application::usecases::scrape_page::ScrapeUseCase;
use crate::application::usecases::{require_valid_url, UseCaseError};
use crate::domain::models::extraction::ExtractionConfig;
use crate::domain::models::scrape_record::ScrapeRecord;
use std::sync::Arc;
use tracing::info;

/// 批量抓取用例
///
/// 整批共享一份方法和提取配置；输出顺序与输入顺序一致，
/// 与完成顺序无关
pub struct BatchScrapeUseCase {
    scrape: Arc<ScrapeUseCase>,
    max_batch_size: usize,
}

impl BatchScrapeUseCase {
    /// 创建用例
    pub fn new(scrape: Arc<ScrapeUseCase>, max_batch_size: usize) -> Self {
        Self {
            scrape,
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// 执行批量抓取
    ///
    /// # 参数
    ///
    /// * `dto` - 批量抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<ScrapeRecord>)` - 与输入同序的记录；逐URL失败
    ///   体现在各自记录的error字段上
    /// * `Err(UseCaseError)` - 边界校验失败（空列表、超限、非法URL、
    ///   未知方法、非法配置），未发起任何网络请求
    pub async fn execute(
        &self,
        dto: BatchScrapeRequestDto,
    ) -> Result<Vec<ScrapeRecord>, UseCaseError> {
        if dto.urls.is_empty() {
            return Err(UseCaseError::Validation(
                "urls must not be empty".to_string(),
            ));
        }
        if dto.urls.len() > self.max_batch_size {
            return Err(UseCaseError::Validation(format!(
                "batch size {} exceeds the limit of {}",
                dto.urls.len(),
                self.max_batch_size
            )));
        }

        // Every URL is validated before the first network call
        for url in &dto.urls {
            require_valid_url(url)?;
        }

        let method = self.scrape.fetcher().parse_method(dto.method.as_deref())?;
        let config = dto
            .extract_config
            .as_ref()
            .map(ExtractionConfig::validate)
            .transpose()?;
        let options = dto.options.unwrap_or_default();

        metrics::counter!("batch_requests_total").increment(1);
        info!("Starting batch scrape of {} URLs", dto.urls.len());

        // join_all preserves input order regardless of completion order
        let futures = dto.urls.iter().map(|url| {
            self.scrape.execute_prepared(
                url,
                method,
                config.as_ref(),
                dto.extract_config.as_ref(),
                &options,
            )
        });
        let records = futures::future::join_all(futures).await;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::usecases::Fetcher;
    use crate::config::settings::Settings;
    use crate::engines::router::EngineRouter;
    use crate::infrastructure::cache::response_cache::ResponseCache;
    use crate::infrastructure::rate_limit::RateLimitGate;

    fn usecase(max_batch: usize) -> BatchScrapeUseCase {
        let settings = Arc::new(Settings::new().expect("defaults should load"));
        let fetcher = Arc::new(Fetcher::new(
            Arc::new(EngineRouter::new(&settings)),
            Arc::new(RateLimitGate::new(&settings.rate_limiting)),
            settings.clone(),
        ));
        let cache = Arc::new(ResponseCache::new(&settings.cache));
        BatchScrapeUseCase::new(Arc::new(ScrapeUseCase::new(fetcher, cache)), max_batch)
    }

    fn dto(urls: Vec<&str>) -> BatchScrapeRequestDto {
        BatchScrapeRequestDto {
            urls: urls.into_iter().map(String::from).collect(),
            method: None,
            extract_config: None,
            options: None,
        }
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_before_network() {
        let err = usecase(10).execute(dto(vec![])).await.unwrap_err();
        assert!(matches!(err, UseCaseError::Validation(_)));
    }

    #[tokio::test]
    async fn test_oversized_batch_rejected() {
        let err = usecase(2)
            .execute(dto(vec![
                "https://a.com",
                "https://b.com",
                "https://c.com",
            ]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[tokio::test]
    async fn test_invalid_url_rejects_whole_batch() {
        let err = usecase(10)
            .execute(dto(vec!["https://a.com", "not a url"]))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_method_rejected_before_network() {
        let mut request = dto(vec!["https://a.com"]);
        request.method = Some("playwright".to_string());
        let err = usecase(10).execute(request).await.unwrap_err();
        assert!(err.to_string().contains("playwright"));
    }
}
