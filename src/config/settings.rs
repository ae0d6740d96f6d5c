// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含抓取服务、平台会话、抓取行为和输出文件的所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Scrapfly 抓取服务配置
    pub scrapfly: ScrapflySettings,
    /// 平台会话配置
    pub twitter: TwitterSettings,
    /// 抓取行为配置
    pub scrape: ScrapeSettings,
    /// 输出配置
    pub output: OutputSettings,
}

/// Scrapfly 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapflySettings {
    /// API 密钥
    pub api_key: String,
    /// API 基础地址
    pub base_url: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 平台会话配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterSettings {
    /// 目标用户名
    pub target_username: String,
    /// 会话 cookie `auth_token`
    pub auth_token: String,
    /// 会话 cookie `ct0`，同时作为 `x-csrf-token` 请求头
    pub csrf_token: String,
    /// Web 客户端的 Bearer token
    pub bearer_token: String,
    /// 站点基础地址
    pub base_url: String,
    /// 时间线最多翻页数
    pub max_pages: u32,
    /// 每页帖子数
    pub page_size: u32,
    /// GraphQL `UserByScreenName` 查询ID
    pub user_by_screen_name_query_id: String,
    /// GraphQL `UserTweets` 查询ID
    pub user_tweets_query_id: String,
}

/// 抓取行为配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeSettings {
    /// 渲染后端崩溃时页面中出现的特征文本
    pub crash_fingerprint: String,
    /// 崩溃后的最大重试次数
    pub max_retries: u32,
    /// 详情接口的路由名，用于匹配拦截到的请求
    pub detail_route: String,
    /// 页面就绪选择器
    pub wait_for_selector: String,
    /// 语言偏好
    pub lang: Vec<String>,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 输出文件路径
    pub path: String,
    /// 分隔符，必须是单个 ASCII 字符
    pub delimiter: String,
}

impl OutputSettings {
    /// 分隔符字节，未配置时为逗号
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(b',')
    }

    /// 校验分隔符，只接受单个 ASCII 字符
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(()),
            _ => Err(ConfigError::Message(format!(
                "output.delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            crash_fingerprint: "Something went wrong, but".to_string(),
            max_retries: 2,
            detail_route: "TweetResultByRestId".to_string(),
            wait_for_selector: "[data-testid='tweet']".to_string(),
            lang: vec!["en-US".to_string()],
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `TWEETRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("TWEETRS").separator("__"));

        Self::from_builder(builder)
    }

    /// 只包含内置默认值的构建器
    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Scrapfly
            .set_default("scrapfly.api_key", "")?
            .set_default("scrapfly.base_url", "https://api.scrapfly.io")?
            .set_default("scrapfly.timeout_secs", 150)?
            // Platform session
            .set_default("twitter.target_username", "elonmusk")?
            .set_default("twitter.auth_token", "")?
            .set_default("twitter.csrf_token", "")?
            .set_default("twitter.bearer_token", "")?
            .set_default("twitter.base_url", "https://x.com")?
            .set_default("twitter.max_pages", 10)?
            .set_default("twitter.page_size", 40)?
            .set_default("twitter.user_by_screen_name_query_id", "xmU6X_CKVnQ5lSrCbAmJsg")?
            .set_default("twitter.user_tweets_query_id", "E3opETHurmVJflFsUBVuUQ")?
            // Scrape behaviour
            .set_default("scrape.crash_fingerprint", "Something went wrong, but")?
            .set_default("scrape.max_retries", 2)?
            .set_default("scrape.detail_route", "TweetResultByRestId")?
            .set_default("scrape.wait_for_selector", "[data-testid='tweet']")?
            .set_default("scrape.lang", vec!["en-US"])?
            // Output
            .set_default("output.path", "tweet_details.csv")?
            .set_default("output.delimiter", ",")
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.output.validate()?;
        Ok(settings)
    }
}
