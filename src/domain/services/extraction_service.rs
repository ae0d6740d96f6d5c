// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use thiserror::Error;

use tracing::debug;

use crate::domain::models::tweet_record::{FieldValue, TweetRecord};
use crate::utils::json_path;

/// 提取错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// 输入不是可遍历的文档
    #[error("Malformed input: expected an object, got {0}")]
    MalformedInput(&'static str),
}

/// 提取服务
///
/// 把帖子详情文档（`legacy.*`、`source`、`views.count`）映射为固定字段的
/// [`TweetRecord`]。纯函数，无副作用；单个路径缺失只会让对应字段为空，
/// 路径存在时按原值保留，不做类型校验。
pub struct ExtractionService;

impl ExtractionService {
    /// 提取数据
    ///
    /// # 参数
    ///
    /// * `document` - `tweetResult.result` 节点
    ///
    /// # 返回值
    ///
    /// * `Ok(TweetRecord)` - 提取结果，缺失字段为 `None`
    /// * `Err(ExtractionError::MalformedInput)` - 输入不是 JSON 对象
    pub fn extract(document: &Value) -> Result<TweetRecord, ExtractionError> {
        if !document.is_object() {
            return Err(ExtractionError::MalformedInput(kind_of(document)));
        }

        Ok(TweetRecord {
            created_at: field(document, "legacy.created_at"),
            favorite_count: field(document, "legacy.favorite_count"),
            bookmark_count: field(document, "legacy.bookmark_count"),
            quote_count: field(document, "legacy.quote_count"),
            reply_count: field(document, "legacy.reply_count"),
            retweet_count: field(document, "legacy.retweet_count"),
            text: field(document, "legacy.full_text"),
            is_quote: field(document, "legacy.is_quote_status"),
            is_retweet: field(document, "legacy.retweeted"),
            language: field(document, "legacy.lang"),
            user_id: field(document, "legacy.user_id_str"),
            conversation_id: field(document, "legacy.conversation_id_str"),
            source: field(document, "source"),
            views: field(document, "views.count"),
        })
    }
}

fn field(document: &Value, path: &str) -> Option<FieldValue> {
    let value = json_path::lookup(document, path)?;
    if value.is_object() || value.is_array() {
        debug!("Field {} holds a {}, keeping it as JSON text", path, kind_of(value));
    }
    FieldValue::from_json(value)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
