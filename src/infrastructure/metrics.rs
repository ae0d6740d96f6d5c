// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 运行计数器
//!
//! 只通过 `metrics` 门面记录，不安装导出器；嵌入方安装 recorder 后即可采集。

pub const SCRAPE_ATTEMPTS_TOTAL: &str = "tweetrs_scrape_attempts_total";
pub const SCRAPE_RETRIES_TOTAL: &str = "tweetrs_scrape_retries_total";
pub const ROWS_WRITTEN_TOTAL: &str = "tweetrs_rows_written_total";

pub fn record_scrape_attempt(transport: &'static str) {
    metrics::counter!(SCRAPE_ATTEMPTS_TOTAL, "transport" => transport).increment(1);
}

pub fn record_scrape_retry(transport: &'static str) {
    metrics::counter!(SCRAPE_RETRIES_TOTAL, "transport" => transport).increment(1);
}

/// 记录写入的一行，`with_detail` 表示是否合并了详情字段
pub fn record_row_written(with_detail: bool) {
    let detail = if with_detail { "full" } else { "identifier_only" };
    metrics::counter!(ROWS_WRITTEN_TOTAL, "detail" => detail).increment(1);
}
