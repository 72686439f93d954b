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

use crate::domain::services::link_service::LinkAnalysis;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 链接提取请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ExtractLinksRequestDto {
    /// 目标URL
    #[validate(url)]
    pub url: String,
    /// 抓取方法名
    pub method: Option<String>,
    /// 域名允许列表
    pub filter_domains: Option<Vec<String>>,
    /// 域名排除列表
    pub exclude_domains: Option<Vec<String>>,
    /// 是否仅保留同域链接
    pub internal_only: Option<bool>,
}

/// 链接提取响应
#[derive(Debug, Serialize)]
pub struct ExtractLinksResponseDto {
    pub success: bool,
    /// 源页面最终URL
    pub url: String,
    #[serde(flatten)]
    pub analysis: LinkAnalysis,
}
