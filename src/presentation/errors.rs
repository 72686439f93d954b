// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::UseCaseError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// 对外API错误
///
/// 状态码由错误类别决定，响应体统一为`{success: false, error}`
#[derive(Debug)]
pub struct ApiError(UseCaseError);

impl From<UseCaseError> for ApiError {
    fn from(err: UseCaseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            // Caller input errors, rejected before any network call
            UseCaseError::Validation(_) | UseCaseError::Config(_) => StatusCode::BAD_REQUEST,
            // Upstream fetch failure after retry exhaustion
            UseCaseError::Fetch(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "success": false,
            "error": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::traits::FetchError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response =
            ApiError(UseCaseError::Validation("bad".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_fetch_maps_to_bad_gateway() {
        let response = ApiError(UseCaseError::Fetch(FetchError::Timeout)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
