// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::models::tweet_record::OutputRow;

/// 输出错误类型
#[derive(Error, Debug)]
pub enum SinkError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV 编码错误
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// 输出行写入特质
///
/// 每次调用写入一行，返回前必须落盘，保证中途失败时已写入的行不丢失。
pub trait RecordSink {
    fn write_row(&mut self, row: &OutputRow) -> Result<(), SinkError>;
}
