// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::tweet::{PostIdentifier, UserInfo};

/// 帖子列表错误类型
#[derive(Error, Debug)]
pub enum ListerError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 平台返回错误状态
    #[error("Platform returned {status}: {message}")]
    Api { status: u16, message: String },
    /// 用户不存在
    #[error("User not found: {0}")]
    UserNotFound(String),
    /// 响应格式无法解析
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 帖子列表特质
///
/// 先按用户名获取用户信息，再按用户信息获取有序、有限的帖子标识序列。
#[async_trait]
pub trait PostLister: Send + Sync {
    /// 获取用户信息
    async fn get_user_info(&self, username: &str) -> Result<UserInfo, ListerError>;

    /// 获取用户的帖子列表，顺序即处理顺序
    async fn get_tweets(&self, user: &UserInfo) -> Result<Vec<PostIdentifier>, ListerError>;
}
