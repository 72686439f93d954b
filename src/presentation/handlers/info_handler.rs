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

use crate::application::dto::page_info::{PageInfoRequestDto, PageInfoResponseDto};
use crate::presentation::errors::ApiError;
use crate::presentation::state::AppState;

/// 页面信息查询
pub async fn page_info(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<PageInfoRequestDto>,
) -> Result<Json<PageInfoResponseDto>, ApiError> {
    let info = state.page_info.execute(payload).await?;
    Ok(Json(info))
}
