// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 模型（models）：提取配置、抓取结果等核心值类型
/// - 服务（services）：字段提取、结果归一化、链接过滤等纯业务服务
pub mod models;
pub mod services;
