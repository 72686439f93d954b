// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 负责从默认值、配置文件和环境变量加载应用配置
pub mod settings;
