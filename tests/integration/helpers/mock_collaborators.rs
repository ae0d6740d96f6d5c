// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tweetrs::config::settings::ScrapeSettings;
use tweetrs::domain::models::tweet::{PostIdentifier, UserInfo};
use tweetrs::domain::repositories::post_lister::{ListerError, PostLister};
use tweetrs::domain::services::tweet_detail_service::TweetDetailService;
use tweetrs::engines::resilient_engine::ResilientScraper;
use tweetrs::engines::traits::{
    BrowserData, EngineError, ScrapeConfig, ScrapeResult, ScrapeTransport, XhrCall,
};

pub const DETAIL_URL: &str =
    "https://x.com/i/api/graphql/q/TweetResultByRestId?variables=%7B%22tweetId%22%7D";
pub const CRASH_PAGE: &str = "<div>Something went wrong, but don't fret, let's give it another shot.</div>";

/// 每个帖子页面的预设响应
#[derive(Clone)]
pub enum Page {
    /// 带详情响应的正常页面
    Detail(String),
    /// 没有详情响应的正常页面
    NoDetail,
    /// 每次都返回崩溃页面
    Crash,
}

/// 帖子详情响应体
pub fn detail_body(text: &str, favorites: i64) -> String {
    json!({
        "data": { "tweetResult": { "result": {
            "source": "Twitter Web App",
            "views": { "count": "1000" },
            "legacy": {
                "created_at": "Mon Sep 11 12:00:00 +0000 2023",
                "favorite_count": favorites,
                "bookmark_count": 1,
                "quote_count": 2,
                "reply_count": 3,
                "retweet_count": 4,
                "full_text": text,
                "is_quote_status": false,
                "retweeted": false,
                "lang": "en",
                "user_id_str": "44196397",
                "conversation_id_str": "100"
            }
        } } }
    })
    .to_string()
}

pub struct MockTransport {
    pages: HashMap<String, Page>,
    requested: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new(pages: Vec<(&str, Page)>) -> Arc<Self> {
        Arc::new(Self {
            pages: pages
                .into_iter()
                .map(|(url, page)| (url.to_string(), page))
                .collect(),
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScrapeTransport for MockTransport {
    async fn scrape(&self, url: &str, _config: &ScrapeConfig) -> Result<ScrapeResult, EngineError> {
        self.requested.lock().unwrap().push(url.to_string());
        let page = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| EngineError::InvalidRequest(format!("unexpected url {}", url)))?;

        let result = match page {
            Page::Detail(body) => ScrapeResult {
                content: "<article data-testid=\"tweet\"></article>".to_string(),
                browser_data: BrowserData {
                    xhr_call: vec![
                        XhrCall::new("https://x.com/i/api/1.1/jot/client_event.json", Some("{}")),
                        XhrCall::new(DETAIL_URL, Some(&body)),
                    ],
                },
            },
            Page::NoDetail => ScrapeResult {
                content: "<article data-testid=\"tweet\"></article>".to_string(),
                browser_data: BrowserData::default(),
            },
            Page::Crash => ScrapeResult {
                content: CRASH_PAGE.to_string(),
                browser_data: BrowserData::default(),
            },
        };
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

pub struct MockPostLister {
    user: UserInfo,
    posts: Vec<PostIdentifier>,
    fail: bool,
}

impl MockPostLister {
    pub fn new(posts: Vec<PostIdentifier>) -> Arc<Self> {
        Arc::new(Self {
            user: UserInfo {
                id: "44196397".to_string(),
                screen_name: "elonmusk".to_string(),
                name: None,
            },
            posts,
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            user: UserInfo {
                id: String::new(),
                screen_name: String::new(),
                name: None,
            },
            posts: Vec::new(),
            fail: true,
        })
    }
}

#[async_trait]
impl PostLister for MockPostLister {
    async fn get_user_info(&self, username: &str) -> Result<UserInfo, ListerError> {
        if self.fail {
            return Err(ListerError::UserNotFound(username.to_string()));
        }
        Ok(self.user.clone())
    }

    async fn get_tweets(&self, _user: &UserInfo) -> Result<Vec<PostIdentifier>, ListerError> {
        Ok(self.posts.clone())
    }
}

pub fn post(id: &str) -> PostIdentifier {
    PostIdentifier::for_status("https://x.com", "elonmusk", id)
}

pub fn detail_service(transport: Arc<MockTransport>) -> Arc<TweetDetailService> {
    let settings = ScrapeSettings::default();
    let scraper = ResilientScraper::from_settings(transport, &settings);
    Arc::new(TweetDetailService::from_settings(scraper, &settings))
}
