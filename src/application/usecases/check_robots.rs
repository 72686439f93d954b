// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::robots_request::{RobotsRequestDto, RobotsResponseDto};
use crate::application::usecases::{require_valid_url, UseCaseError};
use crate::utils::robots::RobotsChecker;

/// robots.txt检查用例
///
/// 取回原始内容并附带一次便捷的allowed检查；
/// 不承诺完整的指令解析与执行
pub struct CheckRobotsUseCase {
    robots: RobotsChecker,
    default_user_agent: String,
}

impl CheckRobotsUseCase {
    /// 创建用例
    pub fn new(default_user_agent: String) -> Self {
        Self {
            robots: RobotsChecker::new(),
            default_user_agent,
        }
    }

    /// 执行robots.txt检查
    pub async fn execute(&self, dto: RobotsRequestDto) -> Result<RobotsResponseDto, UseCaseError> {
        require_valid_url(&dto.url)?;

        let user_agent = dto
            .user_agent
            .unwrap_or_else(|| self.default_user_agent.clone());

        let (robots_url, content, fetched) = self
            .robots
            .fetch_report(&dto.url)
            .await
            .map_err(|e| UseCaseError::Validation(e.to_string()))?;

        let allowed = self
            .robots
            .is_allowed(&dto.url, &user_agent)
            .await
            .unwrap_or(true);

        Ok(RobotsResponseDto {
            success: true,
            robots_url,
            fetched,
            content,
            allowed,
        })
    }
}
