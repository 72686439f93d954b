// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! extractrs - 网页内容提取服务
//!
//! 面向结构化数据提取的网页抓取服务：声明式提取配置、
//! 多引擎抓取（HTTP/浏览器）、链接分析、Markdown与PDF转换

pub mod application;
pub mod config;
pub mod domain;
pub mod engines;
pub mod infrastructure;
pub mod presentation;
pub mod utils;
