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

use crate::domain::models::scrape_record::{BatchSummary, ScrapeRecord};
use serde::Serialize;

/// 单页抓取响应
///
/// 抓取失败（重试耗尽后）体现在记录自身的error字段上，
/// 信封级success只在请求本身非法时为false
#[derive(Debug, Serialize)]
pub struct ScrapeResponseDto {
    pub success: bool,
    pub data: ScrapeRecord,
}

impl ScrapeResponseDto {
    pub fn new(record: ScrapeRecord) -> Self {
        Self {
            success: true,
            data: record,
        }
    }
}

/// 批量抓取响应
///
/// 批次跑完信封即为success，哪怕每个URL都失败；
/// 逐URL失败体现在对应记录和summary.failed上
#[derive(Debug, Serialize)]
pub struct BatchScrapeResponseDto {
    pub success: bool,
    pub results: Vec<ScrapeRecord>,
    pub summary: BatchSummary,
}

impl BatchScrapeResponseDto {
    pub fn new(results: Vec<ScrapeRecord>) -> Self {
        let summary = BatchSummary::from_records(&results);
        Self {
            success: true,
            results,
            summary,
        }
    }
}
