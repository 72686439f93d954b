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
use serde_json::Value;
use validator::Validate;

/// 抓取请求数据传输对象
///
/// 封装客户端发起的单页抓取请求参数
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ScrapeRequestDto {
    /// 目标URL
    #[validate(url)]
    pub url: String,
    /// 抓取方法名（auto/simple/crawling/browser/browser_stealth）
    pub method: Option<String>,
    /// 原始提取配置，在边界处校验
    pub extract_config: Option<Value>,
    /// 等待出现的元素选择器（仅浏览器后端）
    pub wait_for_element: Option<String>,
    /// 抓取选项
    pub options: Option<ScrapeOptionsDto>,
}

/// 批量抓取请求数据传输对象
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BatchScrapeRequestDto {
    /// 目标URL列表，不允许为空
    #[validate(length(min = 1, message = "urls must not be empty"))]
    pub urls: Vec<String>,
    /// 抓取方法名，批内共享
    pub method: Option<String>,
    /// 原始提取配置，批内共享
    pub extract_config: Option<Value>,
    /// 抓取选项，批内共享
    pub options: Option<ScrapeOptionsDto>,
}

/// 抓取选项
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ScrapeOptionsDto {
    /// 自定义HTTP请求头
    pub headers: Option<Value>,
    /// 超时时间（秒）
    pub timeout: Option<u64>,
    /// 是否需要JavaScript渲染（影响auto的解析结果）
    pub js_rendering: Option<bool>,
    /// 是否滚动到底部触发懒加载（仅浏览器后端）
    pub scroll_page: Option<bool>,
    /// 代理配置 (URL)
    pub proxy: Option<String>,
    /// 页面交互动作（仅浏览器后端）
    pub actions: Option<Vec<ScrapeActionDto>>,
}

/// 页面交互动作
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScrapeActionDto {
    Wait { milliseconds: u64 },
    Click { selector: String },
    Scroll { direction: String },
    Input { selector: String, text: String },
}
