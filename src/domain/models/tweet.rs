// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 帖子标识
///
/// 由帖子列表服务产生，包含稳定ID和规范URL，创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostIdentifier {
    /// 帖子ID（rest_id）
    pub id: String,
    /// 帖子页面的规范URL
    pub url: String,
}

impl PostIdentifier {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    /// 根据用户名和帖子ID构造规范URL
    pub fn for_status(base_url: &str, screen_name: &str, id: &str) -> Self {
        let url = format!(
            "{}/{}/status/{}",
            base_url.trim_end_matches('/'),
            screen_name,
            id
        );
        Self::new(id, url)
    }
}

/// 目标用户信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    /// 用户ID（rest_id）
    pub id: String,
    /// 用户名（不含 @）
    pub screen_name: String,
    /// 显示名称
    pub name: Option<String>,
}
