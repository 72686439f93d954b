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

use axum::{extract::Extension, Json};
use std::sync::Arc;

use crate::application::dto::scrape_request::{BatchScrapeRequestDto, ScrapeRequestDto};
use crate::application::dto::scrape_response::{BatchScrapeResponseDto, ScrapeResponseDto};
use crate::presentation::errors::ApiError;
use crate::presentation::state::AppState;

/// 单页抓取
pub async fn scrape(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> Result<Json<ScrapeResponseDto>, ApiError> {
    let record = state.scrape.execute(payload).await?;
    Ok(Json(ScrapeResponseDto::new(record)))
}

/// 批量抓取
///
/// 信封级success只反映批次本身是否跑完；逐URL失败体现在
/// 各自记录和summary上
pub async fn scrape_batch(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<BatchScrapeRequestDto>,
) -> Result<Json<BatchScrapeResponseDto>, ApiError> {
    let records = state.batch_scrape.execute(payload).await?;
    Ok(Json(BatchScrapeResponseDto::new(records)))
}
