// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::config::settings::OutputSettings;
use crate::domain::models::tweet::PostIdentifier;
use crate::domain::models::tweet_record::OutputRow;
use crate::domain::repositories::post_lister::PostLister;
use crate::domain::repositories::record_sink::RecordSink;
use crate::domain::services::tweet_detail_service::TweetDetailService;
use crate::infrastructure::csv_sink::CsvRecordSink;
use crate::infrastructure::metrics;
use crate::utils::errors::PipelineError;

/// 运行报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// 写入的行数
    pub written: usize,
    /// 合并了详情字段的行数
    pub with_detail: usize,
    /// 只有帖子ID的行数（无可用详情）
    pub identifier_only: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    fn started() -> Self {
        let now = Utc::now();
        Self {
            written: 0,
            with_detail: 0,
            identifier_only: 0,
            started_at: now,
            finished_at: now,
        }
    }
}

/// 帖子抓取用例
///
/// 获取目标用户的帖子列表，按列表顺序逐条抓取详情、合并并立即写出。
/// 同一时间只有一个帖子在处理；传输失败会终止整个运行，已写入的行保留。
pub struct RetrieveTweetsUseCase<L> {
    lister: Arc<L>,
    detail_service: Arc<TweetDetailService>,
    target_username: String,
    output_path: PathBuf,
    delimiter: u8,
}

impl<L> RetrieveTweetsUseCase<L>
where
    L: PostLister + 'static,
{
    pub fn new(
        lister: Arc<L>,
        detail_service: Arc<TweetDetailService>,
        target_username: impl Into<String>,
        output: &OutputSettings,
    ) -> Self {
        Self {
            lister,
            detail_service,
            target_username: target_username.into(),
            output_path: PathBuf::from(&output.path),
            delimiter: output.delimiter_byte(),
        }
    }

    /// 执行一次完整运行，覆盖已有的输出文件
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let user = self.lister.get_user_info(&self.target_username).await?;
        let posts = self.lister.get_tweets(&user).await?;
        info!(
            "Retrieved {} tweets for @{} (user id {})",
            posts.len(),
            user.screen_name,
            user.id
        );

        let mut sink = CsvRecordSink::create(&self.output_path, self.delimiter).map_err(
            |source| PipelineError::SinkUnavailable {
                path: self.output_path.clone(),
                source,
            },
        )?;
        info!("Writing rows to {}", self.output_path.display());

        self.process(&posts, &mut sink).await
    }

    /// 按顺序处理帖子并写入输出
    pub async fn process<S>(
        &self,
        posts: &[PostIdentifier],
        sink: &mut S,
    ) -> Result<RunReport, PipelineError>
    where
        S: RecordSink,
    {
        let mut report = RunReport::started();

        for (index, post) in posts.iter().enumerate() {
            debug!("Processing tweet {}/{}: {}", index + 1, posts.len(), post.id);

            let detail = self
                .detail_service
                .fetch_detail(&post.url)
                .await
                .map_err(|source| {
                    error!(
                        "Aborting run at tweet {} after {} rows: {}",
                        post.id, report.written, source
                    );
                    PipelineError::Transport {
                        rows_written: report.written,
                        source,
                    }
                })?;

            let row = OutputRow::from_identifier(post);
            let with_detail = detail.is_some();
            let row = match detail {
                Some(record) => row.merge(record),
                None => {
                    info!("No detail payload for tweet {}, writing identifier only", post.id);
                    row
                }
            };

            sink.write_row(&row)?;
            metrics::record_row_written(with_detail);
            report.written += 1;
            if with_detail {
                report.with_detail += 1;
            } else {
                report.identifier_only += 1;
            }
        }

        report.finished_at = Utc::now();
        info!(
            "Run finished: {} rows written ({} with detail, {} identifier only)",
            report.written, report.with_detail, report.identifier_only
        );
        Ok(report)
    }
}
