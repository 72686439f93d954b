// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod convert_handler;
pub mod info_handler;
pub mod link_handler;
pub mod robots_handler;
pub mod scrape_handler;
