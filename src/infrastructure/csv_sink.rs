// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::models::tweet_record::{OutputRow, OUTPUT_COLUMNS};
use crate::domain::repositories::record_sink::{RecordSink, SinkError};

/// CSV 输出
///
/// 打开时写入表头，之后每写一行立即刷新，运行中途失败也能保留已写入的行。
pub struct CsvRecordSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvRecordSink<File> {
    /// 创建（或覆盖）输出文件
    pub fn create(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Self::from_writer(file, delimiter)
    }
}

impl<W: Write> CsvRecordSink<W> {
    pub fn from_writer(inner: W, delimiter: u8) -> Result<Self, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(OUTPUT_COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    /// 取回底层写入器
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvRecordSink<W> {
    fn write_row(&mut self, row: &OutputRow) -> Result<(), SinkError> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }
}
