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

use crate::application::dto::convert_request::{
    BatchMarkdownRequestDto, BatchMarkdownResponseDto, BatchPdfRequestDto, BatchPdfResponseDto,
    MarkdownRequestDto, MarkdownResponseDto, PdfRequestDto, PdfResponseDto,
};
use crate::presentation::errors::ApiError;
use crate::presentation::state::AppState;

/// 网页转Markdown
pub async fn convert_markdown(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<MarkdownRequestDto>,
) -> Result<Json<MarkdownResponseDto>, ApiError> {
    let result = state.markdown.execute(payload).await?;
    Ok(Json(result))
}

/// 批量网页转Markdown
pub async fn convert_markdown_batch(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<BatchMarkdownRequestDto>,
) -> Result<Json<BatchMarkdownResponseDto>, ApiError> {
    let results = state.markdown.execute_batch(payload).await?;
    Ok(Json(BatchMarkdownResponseDto {
        success: true,
        results,
    }))
}

/// PDF转Markdown
pub async fn convert_pdf(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<PdfRequestDto>,
) -> Result<Json<PdfResponseDto>, ApiError> {
    let result = state.pdf.execute(payload).await?;
    Ok(Json(result))
}

/// 批量PDF转Markdown
pub async fn convert_pdf_batch(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<BatchPdfRequestDto>,
) -> Result<Json<BatchPdfResponseDto>, ApiError> {
    let results = state.pdf.execute_batch(payload).await?;
    Ok(Json(BatchPdfResponseDto {
        success: true,
        results,
    }))
}
