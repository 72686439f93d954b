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

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 页面信息请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PageInfoRequestDto {
    /// 目标URL
    #[validate(url)]
    pub url: String,
}

/// 页面信息响应
///
/// 只包含轻量元数据，始终走成本最低的simple后端
#[derive(Debug, Serialize)]
pub struct PageInfoResponseDto {
    pub success: bool,
    /// 最终URL
    pub url: String,
    /// HTTP状态码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// 页面标题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// meta描述
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content-Type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Content-Length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
}
