// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义核心业务实体和值类型
pub mod extraction;
pub mod scrape_record;
