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

/// robots.txt检查请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RobotsRequestDto {
    /// 任意页面URL，robots.txt按其origin推导
    #[validate(url)]
    pub url: String,
    /// 用于便捷检查的User-Agent，缺省用服务自身的UA
    pub user_agent: Option<String>,
}

/// robots.txt检查响应
///
/// 只负责取回内容并做一次便捷的allowed检查，
/// 不承诺完整的指令解析与执行
#[derive(Debug, Serialize)]
pub struct RobotsResponseDto {
    pub success: bool,
    /// robots.txt的URL
    pub robots_url: String,
    /// 是否成功取到robots.txt（404按未取到算）
    pub fetched: bool,
    /// 原始内容
    pub content: String,
    /// 对给定URL的便捷检查结果
    pub allowed: bool,
}
