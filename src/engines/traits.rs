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

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 请求参数无效
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// 抓取服务返回错误状态
    #[error("Scrape API returned {status}: {message}")]
    Api { status: u16, message: String },
    /// 响应无法解析
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// 渲染后端多次崩溃，重试耗尽
    #[error("Rendering backend crashed {attempts} times for {url}")]
    TransportCrash { url: String, attempts: u32 },
}

/// 抓取配置
///
/// 对应抓取服务的参数：反爬绕过、JS 渲染、自动滚动、语言偏好和就绪选择器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// 反爬保护绕过
    pub asp: bool,
    /// 使用无头浏览器渲染
    pub render_js: bool,
    /// 自动滚动以触发懒加载请求
    pub auto_scroll: bool,
    /// 语言偏好
    pub lang: Vec<String>,
    /// 等待该选择器出现后再返回
    pub wait_for_selector: Option<String>,
}

impl ScrapeConfig {
    /// 基础配置：开启反爬绕过、JS 渲染和自动滚动
    pub fn base(lang: Vec<String>) -> Self {
        Self {
            asp: true,
            render_js: true,
            auto_scroll: true,
            lang,
            wait_for_selector: None,
        }
    }

    /// 应用调用方覆盖项，冲突时以调用方为准
    pub fn merged(&self, overrides: &ScrapeOverrides) -> Self {
        Self {
            asp: overrides.asp.unwrap_or(self.asp),
            render_js: overrides.render_js.unwrap_or(self.render_js),
            auto_scroll: overrides.auto_scroll.unwrap_or(self.auto_scroll),
            lang: overrides.lang.clone().unwrap_or_else(|| self.lang.clone()),
            wait_for_selector: overrides
                .wait_for_selector
                .clone()
                .or_else(|| self.wait_for_selector.clone()),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::base(vec!["en-US".to_string()])
    }
}

/// 调用方提供的抓取配置覆盖项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeOverrides {
    pub asp: Option<bool>,
    pub render_js: Option<bool>,
    pub auto_scroll: Option<bool>,
    pub lang: Option<Vec<String>>,
    pub wait_for_selector: Option<String>,
}

/// 单次抓取结果
///
/// 包含渲染后的页面内容以及浏览器拦截到的网络请求，只在一次抓取尝试内有效。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeResult {
    /// 页面内容
    #[serde(default)]
    pub content: String,
    /// 浏览器数据
    #[serde(default)]
    pub browser_data: BrowserData,
}

/// 浏览器数据
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowserData {
    /// 拦截到的 XHR 请求，按发生顺序排列
    #[serde(default)]
    pub xhr_call: Vec<XhrCall>,
}

/// 拦截到的网络请求
#[derive(Debug, Clone, Deserialize)]
pub struct XhrCall {
    pub url: String,
    #[serde(default)]
    pub response: Option<XhrResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct XhrResponse {
    #[serde(default)]
    pub body: Option<String>,
}

impl XhrCall {
    pub fn new(url: impl Into<String>, body: Option<&str>) -> Self {
        Self {
            url: url.into(),
            response: body.map(|b| XhrResponse {
                body: Some(b.to_string()),
            }),
        }
    }

    /// 响应体，缺失或为空时返回 `None`
    pub fn body(&self) -> Option<&str> {
        self.response
            .as_ref()
            .and_then(|r| r.body.as_deref())
            .filter(|b| !b.trim().is_empty())
    }
}

/// 抓取传输特质
///
/// 外部渲染/反爬服务的抽象，给定URL和配置返回一次抓取结果。
#[async_trait]
pub trait ScrapeTransport: Send + Sync {
    /// 执行抓取
    async fn scrape(&self, url: &str, config: &ScrapeConfig) -> Result<ScrapeResult, EngineError>;

    /// 传输名称
    fn name(&self) -> &'static str;
}
