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

use std::sync::Arc;

use anyhow::bail;
use tracing::info;
use tweetrs::application::use_cases::retrieve_tweets_use_case::RetrieveTweetsUseCase;
use tweetrs::config::settings::Settings;
use tweetrs::domain::services::tweet_detail_service::TweetDetailService;
use tweetrs::engines::resilient_engine::ResilientScraper;
use tweetrs::engines::scrapfly_engine::ScrapflyEngine;
use tweetrs::engines::traits::ScrapeTransport;
use tweetrs::infrastructure::twitter_session::TwitterSession;
use tweetrs::utils::telemetry;

/// 主函数
///
/// 一次性批处理：获取目标用户的帖子、逐条抓取详情并写入 CSV
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting tweetrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    if settings.scrapfly.api_key.is_empty() {
        bail!("scrapfly.api_key is not configured (set TWEETRS__SCRAPFLY__API_KEY)");
    }
    info!("Configuration loaded");

    // 3. Platform session
    let session = Arc::new(TwitterSession::new(&settings.twitter)?);

    // 4. Scrape transport and detail service
    let transport: Arc<dyn ScrapeTransport> = Arc::new(ScrapflyEngine::new(&settings.scrapfly)?);
    let scraper = ResilientScraper::from_settings(transport, &settings.scrape);
    let detail_service = Arc::new(TweetDetailService::from_settings(scraper, &settings.scrape));

    // 5. Run
    let use_case = RetrieveTweetsUseCase::new(
        session,
        detail_service,
        settings.twitter.target_username.clone(),
        &settings.output,
    );
    let report = use_case.run().await?;

    info!(
        "Done: {} rows written to {} in {}s",
        report.written,
        settings.output.path,
        (report.finished_at - report.started_at).num_seconds()
    );
    Ok(())
}
