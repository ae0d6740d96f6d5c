// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::repositories::post_lister::ListerError;
use crate::domain::repositories::record_sink::SinkError;
use crate::engines::traits::EngineError;

/// 流水线运行错误
///
/// 这里的每一种错误都会终止本次运行；已经写入的行保持不变。
#[derive(Error, Debug)]
pub enum PipelineError {
    /// 输出文件无法打开
    #[error("Output sink unavailable at {}: {source}", path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: SinkError,
    },

    /// 写入输出行失败
    #[error("Failed to write row: {0}")]
    Sink(#[from] SinkError),

    /// 抓取传输层失败（包括重试耗尽）
    #[error("Transport failed after {rows_written} rows were written: {source}")]
    Transport {
        rows_written: usize,
        #[source]
        source: EngineError,
    },

    /// 帖子列表获取失败
    #[error("Post lister error: {0}")]
    Lister(#[from] ListerError),
}
