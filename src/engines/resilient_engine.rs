// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScrapeSettings;
use crate::engines::traits::{
    EngineError, ScrapeConfig, ScrapeOverrides, ScrapeResult, ScrapeTransport,
};
use crate::infrastructure::metrics;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 瞬时故障特征
///
/// 渲染后端以可恢复方式失败时，页面内容中会出现的一段文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientFailureFingerprint(String);

impl TransientFailureFingerprint {
    pub fn new(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }

    /// 内容是否带有该特征
    pub fn matches(&self, content: &str) -> bool {
        !self.0.is_empty() && content.contains(&self.0)
    }
}

impl Default for TransientFailureFingerprint {
    fn default() -> Self {
        Self::new("Something went wrong, but")
    }
}

/// 抓取状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// 正在进行第 n 次重试（0 为首次尝试）
    Attempting(u32),
    /// 成功
    Succeeded,
    /// 重试耗尽
    Failed,
}

impl FetchState {
    /// 根据本次尝试是否命中崩溃特征计算下一个状态
    ///
    /// 命中特征且重试计数不超过上限时继续重试，超过上限进入 `Failed`
    pub fn next(self, crashed: bool, max_retries: u32) -> FetchState {
        match self {
            FetchState::Attempting(_) if !crashed => FetchState::Succeeded,
            FetchState::Attempting(n) if n > max_retries => FetchState::Failed,
            FetchState::Attempting(n) => FetchState::Attempting(n + 1),
            terminal => terminal,
        }
    }
}

/// 带重试的抓取器
///
/// 包装底层传输，在页面内容命中瞬时故障特征时按顺序重试，无退避。
/// 其它错误直接向上传播，不在这里重试。
pub struct ResilientScraper {
    transport: Arc<dyn ScrapeTransport>,
    base_config: ScrapeConfig,
    fingerprint: TransientFailureFingerprint,
    max_retries: u32,
}

impl ResilientScraper {
    pub fn new(
        transport: Arc<dyn ScrapeTransport>,
        base_config: ScrapeConfig,
        fingerprint: TransientFailureFingerprint,
        max_retries: u32,
    ) -> Self {
        Self {
            transport,
            base_config,
            fingerprint,
            max_retries,
        }
    }

    /// 根据抓取配置创建
    pub fn from_settings(transport: Arc<dyn ScrapeTransport>, settings: &ScrapeSettings) -> Self {
        Self::new(
            transport,
            ScrapeConfig::base(settings.lang.clone()),
            TransientFailureFingerprint::new(settings.crash_fingerprint.clone()),
            settings.max_retries,
        )
    }

    /// 抓取页面
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `overrides` - 调用方的配置覆盖项，优先于基础配置
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeResult)` - 未命中崩溃特征的抓取结果，原样返回
    /// * `Err(EngineError::TransportCrash)` - 重试耗尽
    /// * `Err(EngineError)` - 传输层其它错误
    pub async fn scrape_page(
        &self,
        url: &str,
        overrides: &ScrapeOverrides,
    ) -> Result<ScrapeResult, EngineError> {
        let config = self.base_config.merged(overrides);
        let mut attempt = 0;

        loop {
            if attempt == 0 {
                info!("scraping {}", url);
            } else {
                info!("retrying {}/{} {}", attempt, self.max_retries, url);
                metrics::record_scrape_retry(self.transport.name());
            }
            metrics::record_scrape_attempt(self.transport.name());

            let result = self.transport.scrape(url, &config).await?;
            let crashed = self.fingerprint.matches(&result.content);

            match FetchState::Attempting(attempt).next(crashed, self.max_retries) {
                FetchState::Succeeded => return Ok(result),
                FetchState::Failed => {
                    error!(
                        "{} crashed {} times for {}, giving up",
                        self.transport.name(),
                        attempt + 1,
                        url
                    );
                    return Err(EngineError::TransportCrash {
                        url: url.to_string(),
                        attempts: attempt + 1,
                    });
                }
                FetchState::Attempting(next) => {
                    warn!("backend crash fingerprint found in response for {}", url);
                    attempt = next;
                }
            }
        }
    }
}
