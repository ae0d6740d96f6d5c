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

use crate::config::settings::ScrapflySettings;
use crate::engines::traits::{EngineError, ScrapeConfig, ScrapeResult, ScrapeTransport};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Scrapfly 响应外层
#[derive(Debug, Deserialize)]
struct ScrapflyResponse {
    result: ScrapeResult,
}

/// Scrapfly 抓取引擎
///
/// 通过 Scrapfly 的 `/scrape` 接口完成反爬绕过和无头浏览器渲染，
/// 返回页面内容和拦截到的 XHR 请求
pub struct ScrapflyEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ScrapflyEngine {
    /// 创建新的 Scrapfly 引擎
    ///
    /// # 参数
    ///
    /// * `settings` - Scrapfly 配置
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapflyEngine)` - 引擎实例
    /// * `Err(EngineError)` - HTTP 客户端构建失败
    pub fn new(settings: &ScrapflySettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 构造带查询参数的请求地址
    fn build_url(&self, url: &str, config: &ScrapeConfig) -> Result<Url, EngineError> {
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("url", url.to_string()),
            ("asp", config.asp.to_string()),
            ("render_js", config.render_js.to_string()),
            ("auto_scroll", config.auto_scroll.to_string()),
        ];
        if !config.lang.is_empty() {
            params.push(("lang", config.lang.join(",")));
        }
        if let Some(selector) = &config.wait_for_selector {
            params.push(("wait_for_selector", selector.clone()));
        }

        Url::parse_with_params(&format!("{}/scrape", self.base_url), &params)
            .map_err(|e| EngineError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl ScrapeTransport for ScrapflyEngine {
    /// 执行抓取
    ///
    /// 非 2xx 状态返回 `EngineError::Api`，响应体无法解析返回 `EngineError::InvalidResponse`
    async fn scrape(&self, url: &str, config: &ScrapeConfig) -> Result<ScrapeResult, EngineError> {
        let request_url = self.build_url(url, config)?;

        let start = Instant::now();
        let response = self.client.get(request_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EngineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ScrapflyResponse = serde_json::from_str(&body)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        debug!(
            "Scrapfly returned {} bytes and {} xhr calls for {} in {}ms",
            parsed.result.content.len(),
            parsed.result.browser_data.xhr_call.len(),
            url,
            start.elapsed().as_millis()
        );

        Ok(parsed.result)
    }

    fn name(&self) -> &'static str {
        "scrapfly"
    }
}
