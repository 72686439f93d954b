// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod convert_request;
pub mod link_request;
pub mod page_info;
pub mod robots_request;
pub mod scrape_request;
pub mod scrape_response;
