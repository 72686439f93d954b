// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 链接记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkRecord {
    /// 解析后的绝对URL
    pub url: String,
    /// 链接文本
    pub text: String,
}

/// 图片记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    /// 解析后的绝对图片地址
    pub src: String,
    /// 替代文本
    pub alt: String,
}

/// 单个URL抓取的归一化输出记录
///
/// 成功时包含内容字段，失败时仅包含url和error；
/// 构建后不再修改，也不做持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeRecord {
    /// 最终URL（重定向后）
    pub url: String,
    /// HTTP状态码（浏览器抓取时不可得）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// 页面标题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// meta描述
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// 提取内容（按配置的字段，或默认的 text/links/images 形状）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    /// 失败原因，仅失败时存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeRecord {
    /// 构造失败记录
    ///
    /// 失败记录只携带url和error，不包含任何部分内容
    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: None,
            title: None,
            meta_description: None,
            content: None,
            error: Some(error.into()),
        }
    }

    /// 记录是否成功
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 批量抓取汇总
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    /// 总数
    pub total: usize,
    /// 成功数
    pub successful: usize,
    /// 失败数
    pub failed: usize,
    /// 成功率 (successful / total，total为0时为0)
    pub success_rate: f64,
}

impl BatchSummary {
    /// 根据记录序列计算汇总
    ///
    /// # 参数
    ///
    /// * `records` - 抓取记录序列
    ///
    /// # 返回值
    ///
    /// 汇总统计，total为0时success_rate固定为0而不是NaN
    pub fn from_records(records: &[ScrapeRecord]) -> Self {
        let total = records.len();
        let successful = records.iter().filter(|r| r.is_success()).count();
        let failed = total - successful;
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        };

        Self {
            total,
            successful,
            failed,
            success_rate,
        }
    }
}
