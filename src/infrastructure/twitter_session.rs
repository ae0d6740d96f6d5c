// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, COOKIE};
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use crate::config::settings::TwitterSettings;
use crate::domain::models::tweet::{PostIdentifier, UserInfo};
use crate::domain::repositories::post_lister::{ListerError, PostLister};
use crate::utils::json_path;

/// GraphQL 请求需要的特性开关
const GRAPHQL_FEATURES: &str = r#"{"responsive_web_graphql_exclude_directive_enabled":true,"verified_phone_label_enabled":false,"responsive_web_graphql_skip_user_profile_image_extensions_enabled":false,"responsive_web_graphql_timeline_navigation_enabled":true,"view_counts_everywhere_api_enabled":true,"longform_notetweets_consumption_enabled":true,"tweetypie_unmention_optimization_enabled":true,"hidden_profile_likes_enabled":true,"hidden_profile_subscriptions_enabled":true,"highlights_tweets_tab_ui_enabled":true,"creator_subscriptions_tweet_preview_api_enabled":true,"subscriptions_verification_info_verified_since_enabled":true}"#;

/// 时间线指令可能出现的位置（新旧两种响应结构）
const INSTRUCTION_PATHS: [&str; 2] = [
    "data.user.result.timeline_v2.timeline.instructions",
    "data.user.result.timeline.timeline.instructions",
];

/// 平台会话
///
/// 显式构造、显式传递的已登录会话句柄。凭据是浏览器会话 cookie
/// （`auth_token` 和 `ct0`）加 Web 客户端 Bearer token，只用于组装请求头。
pub struct TwitterSession {
    client: reqwest::Client,
    base_url: String,
    max_pages: u32,
    page_size: u32,
    user_by_screen_name_query_id: String,
    user_tweets_query_id: String,
}

impl TwitterSession {
    /// 根据配置创建会话
    pub fn new(settings: &TwitterSettings) -> Result<Self, ListerError> {
        let client = reqwest::Client::builder()
            .default_headers(session_headers(settings)?)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_pages: settings.max_pages,
            page_size: settings.page_size,
            user_by_screen_name_query_id: settings.user_by_screen_name_query_id.clone(),
            user_tweets_query_id: settings.user_tweets_query_id.clone(),
        })
    }

    async fn graphql(
        &self,
        query_id: &str,
        operation: &str,
        variables: Value,
    ) -> Result<Value, ListerError> {
        let endpoint = format!(
            "{}/i/api/graphql/{}/{}",
            self.base_url, query_id, operation
        );
        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("variables", variables.to_string()),
                ("features", GRAPHQL_FEATURES.to_string()),
            ],
        )
        .map_err(|e| ListerError::InvalidResponse(e.to_string()))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ListerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ListerError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PostLister for TwitterSession {
    async fn get_user_info(&self, username: &str) -> Result<UserInfo, ListerError> {
        let payload = self
            .graphql(
                &self.user_by_screen_name_query_id,
                "UserByScreenName",
                json!({ "screen_name": username, "withSafetyModeUserFields": true }),
            )
            .await?;

        parse_user(&payload).ok_or_else(|| ListerError::UserNotFound(username.to_string()))
    }

    async fn get_tweets(&self, user: &UserInfo) -> Result<Vec<PostIdentifier>, ListerError> {
        let mut posts = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..self.max_pages {
            let mut variables = json!({
                "userId": user.id,
                "count": self.page_size,
                "includePromotedContent": false,
                "withVoice": true,
                "withV2Timeline": true,
            });
            if let Some(c) = &cursor {
                variables["cursor"] = json!(c);
            }

            let payload = self
                .graphql(&self.user_tweets_query_id, "UserTweets", variables)
                .await?;
            let timeline = parse_timeline_page(&payload);
            debug!(
                "Timeline page {} for @{} returned {} tweets",
                page,
                user.screen_name,
                timeline.tweet_ids.len()
            );

            if timeline.tweet_ids.is_empty() {
                break;
            }
            posts.extend(
                timeline
                    .tweet_ids
                    .iter()
                    .map(|id| PostIdentifier::for_status(&self.base_url, &user.screen_name, id)),
            );

            match timeline.bottom_cursor {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => break,
            }
        }

        info!("Listed {} tweets for @{}", posts.len(), user.screen_name);
        Ok(posts)
    }
}

/// 组装会话请求头
fn session_headers(settings: &TwitterSettings) -> Result<HeaderMap, ListerError> {
    let invalid = |e: reqwest::header::InvalidHeaderValue| {
        ListerError::InvalidResponse(format!("invalid session header: {}", e))
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", settings.bearer_token)).map_err(invalid)?,
    );
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!(
            "auth_token={}; ct0={}",
            settings.auth_token, settings.csrf_token
        ))
        .map_err(invalid)?,
    );
    headers.insert(
        "x-csrf-token",
        HeaderValue::from_str(&settings.csrf_token).map_err(invalid)?,
    );
    headers.insert("x-twitter-active-user", HeaderValue::from_static("yes"));
    headers.insert("x-twitter-auth-type", HeaderValue::from_static("OAuth2Session"));
    Ok(headers)
}

/// 解析 `UserByScreenName` 响应
fn parse_user(payload: &Value) -> Option<UserInfo> {
    let user = json_path::lookup(payload, "data.user.result")?;
    let id = json_path::get_string(user, "rest_id")?;
    let screen_name = json_path::get_string(user, "legacy.screen_name")?;

    Some(UserInfo {
        id,
        screen_name,
        name: json_path::get_string(user, "legacy.name"),
    })
}

/// 一页时间线
#[derive(Debug, Default, PartialEq, Eq)]
struct TimelinePage {
    tweet_ids: Vec<String>,
    bottom_cursor: Option<String>,
}

/// 解析 `UserTweets` 响应中的帖子ID和下一页游标
///
/// 置顶帖子排在最前，其余帖子（包括自我回复串中的帖子）保持响应中的顺序。
fn parse_timeline_page(payload: &Value) -> TimelinePage {
    let instructions = INSTRUCTION_PATHS
        .iter()
        .map(|path| json_path::get_array(payload, path))
        .find(|items| !items.is_empty())
        .unwrap_or(&[]);

    let mut pinned = TimelinePage::default();
    let mut page = TimelinePage::default();
    for instruction in instructions {
        match json_path::get_str(instruction, "type") {
            Some("TimelineAddEntries") => {
                for entry in json_path::get_array(instruction, "entries") {
                    collect_entry(entry, &mut page);
                }
            }
            Some("TimelinePinEntry") => {
                if let Some(entry) = json_path::lookup(instruction, "entry") {
                    collect_entry(entry, &mut pinned);
                }
            }
            Some("TimelineAddToModule") => {
                collect_module_items(json_path::get_array(instruction, "moduleItems"), &mut page);
            }
            _ => {}
        }
    }

    pinned.tweet_ids.extend(page.tweet_ids);
    TimelinePage {
        tweet_ids: pinned.tweet_ids,
        bottom_cursor: page.bottom_cursor,
    }
}

fn collect_entry(entry: &Value, page: &mut TimelinePage) {
    let entry_id = json_path::get_str(entry, "entryId").unwrap_or_default();
    if entry_id.starts_with("tweet-") {
        let id = json_path::lookup(entry, "content.itemContent")
            .and_then(tweet_result_id)
            .or_else(|| entry_id.strip_prefix("tweet-").map(str::to_string));
        page.tweet_ids.extend(id);
    } else if entry_id.starts_with("profile-conversation-") {
        collect_module_items(json_path::get_array(entry, "content.items"), page);
    } else if entry_id.starts_with("cursor-bottom-") {
        page.bottom_cursor = json_path::get_string(entry, "content.value");
    }
}

/// 回复串模块中的帖子
fn collect_module_items(items: &[Value], page: &mut TimelinePage) {
    page.tweet_ids.extend(
        items
            .iter()
            .filter_map(|item| json_path::lookup(item, "item.itemContent"))
            .filter_map(tweet_result_id),
    );
}

/// `itemContent` 中的帖子ID，兼容 `TweetWithVisibilityResults` 包装
fn tweet_result_id(item_content: &Value) -> Option<String> {
    json_path::get_string(item_content, "tweet_results.result.rest_id")
        .or_else(|| json_path::get_string(item_content, "tweet_results.result.tweet.rest_id"))
}
