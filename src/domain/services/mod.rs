// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod extraction_service;
pub mod link_service;
pub mod markdown_service;
pub mod normalizer;
pub mod pdf_service;
