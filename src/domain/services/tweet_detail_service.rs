// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::settings::ScrapeSettings;
use crate::domain::models::tweet_record::TweetRecord;
use crate::domain::services::extraction_service::ExtractionService;
use crate::engines::resilient_engine::ResilientScraper;
use crate::engines::traits::{EngineError, ScrapeOverrides, ScrapeResult};
use crate::utils::json_path;

/// 详情接口响应中帖子节点的位置
const DETAIL_RESULT_PATH: &str = "data.tweetResult.result";

/// 帖子详情服务
///
/// 抓取帖子页面，从拦截到的详情接口响应中取出帖子节点并交给提取服务。
pub struct TweetDetailService {
    scraper: ResilientScraper,
    detail_route: String,
    wait_for_selector: String,
}

impl TweetDetailService {
    pub fn new(
        scraper: ResilientScraper,
        detail_route: impl Into<String>,
        wait_for_selector: impl Into<String>,
    ) -> Self {
        Self {
            scraper,
            detail_route: detail_route.into(),
            wait_for_selector: wait_for_selector.into(),
        }
    }

    pub fn from_settings(scraper: ResilientScraper, settings: &ScrapeSettings) -> Self {
        Self::new(
            scraper,
            settings.detail_route.clone(),
            settings.wait_for_selector.clone(),
        )
    }

    /// 获取帖子详情
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(TweetRecord))` - 成功提取
    /// * `Ok(None)` - 没有可用的详情响应，不视为错误
    /// * `Err(EngineError)` - 传输失败，包括重试耗尽
    pub async fn fetch_detail(&self, url: &str) -> Result<Option<TweetRecord>, EngineError> {
        let overrides = ScrapeOverrides {
            auto_scroll: Some(true),
            wait_for_selector: Some(self.wait_for_selector.clone()),
            ..Default::default()
        };

        let result = self.scraper.scrape_page(url, &overrides).await?;
        Ok(self.parse_detail(&result))
    }

    /// 从抓取结果中解析详情
    ///
    /// 按发生顺序扫描 URL 含详情路由的请求，跳过空响应和无法解码的响应，
    /// 只使用第一个可用的响应体，不做合并。
    pub fn parse_detail(&self, result: &ScrapeResult) -> Option<TweetRecord> {
        let payload = result
            .browser_data
            .xhr_call
            .iter()
            .filter(|call| call.url.contains(&self.detail_route))
            .find_map(|call| {
                let body = call.body()?;
                match serde_json::from_str::<Value>(body) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        debug!("Skipping undecodable detail response from {}: {}", call.url, e);
                        None
                    }
                }
            });

        let Some(payload) = payload else {
            debug!("No usable {} response found", self.detail_route);
            return None;
        };

        let document = json_path::lookup(&payload, DETAIL_RESULT_PATH).unwrap_or(&Value::Null);
        match ExtractionService::extract(document) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Detail payload could not be extracted: {}", e);
                None
            }
        }
    }
}
