// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use serde_json::{Number, Value};

use super::tweet::PostIdentifier;

/// 输出文件的固定列，顺序与 [`OutputRow`] 字段顺序一致
pub const OUTPUT_COLUMNS: [&str; 15] = [
    "tweet_id",
    "created_at",
    "favorite_count",
    "bookmark_count",
    "quote_count",
    "reply_count",
    "retweet_count",
    "text",
    "is_quote",
    "is_retweet",
    "language",
    "user_id",
    "conversation_id",
    "source",
    "views",
];

/// 详情字段的标量值
///
/// 按源文档中的原始类型保存，不做类型转换：数量以字符串形式下发时仍按字符串写出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl FieldValue {
    /// 从 JSON 值构造；`null` 视为缺失。
    /// 对象和数组不是标量，按紧凑 JSON 文本保存。
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Text(other.to_string())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// 规范化后的帖子详情
///
/// 由字段提取器从详情文档中生成，创建后不再修改。
/// 只有路径在源文档中缺失（或为 `null`）时字段才为 `None`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweetRecord {
    pub created_at: Option<FieldValue>,
    pub favorite_count: Option<FieldValue>,
    pub bookmark_count: Option<FieldValue>,
    pub quote_count: Option<FieldValue>,
    pub reply_count: Option<FieldValue>,
    pub retweet_count: Option<FieldValue>,
    pub text: Option<FieldValue>,
    pub is_quote: Option<FieldValue>,
    pub is_retweet: Option<FieldValue>,
    pub language: Option<FieldValue>,
    pub user_id: Option<FieldValue>,
    pub conversation_id: Option<FieldValue>,
    /// 发布客户端（原样保留的 HTML 片段）
    pub source: Option<FieldValue>,
    pub views: Option<FieldValue>,
}

/// 输出行
///
/// 帖子ID加上详情字段。`tweet_id` 总是存在，其余列缺失时写为空值，
/// 保证输出表格每行列数一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub tweet_id: String,
    pub created_at: Option<FieldValue>,
    pub favorite_count: Option<FieldValue>,
    pub bookmark_count: Option<FieldValue>,
    pub quote_count: Option<FieldValue>,
    pub reply_count: Option<FieldValue>,
    pub retweet_count: Option<FieldValue>,
    pub text: Option<FieldValue>,
    pub is_quote: Option<FieldValue>,
    pub is_retweet: Option<FieldValue>,
    pub language: Option<FieldValue>,
    pub user_id: Option<FieldValue>,
    pub conversation_id: Option<FieldValue>,
    pub source: Option<FieldValue>,
    pub views: Option<FieldValue>,
}

impl OutputRow {
    /// 创建只包含帖子ID的行
    pub fn from_identifier(post: &PostIdentifier) -> Self {
        Self::with_record(post.id.clone(), TweetRecord::default())
    }

    /// 合并详情字段，`tweet_id` 不会被覆盖
    pub fn merge(self, record: TweetRecord) -> Self {
        Self::with_record(self.tweet_id, record)
    }

    fn with_record(tweet_id: String, record: TweetRecord) -> Self {
        Self {
            tweet_id,
            created_at: record.created_at,
            favorite_count: record.favorite_count,
            bookmark_count: record.bookmark_count,
            quote_count: record.quote_count,
            reply_count: record.reply_count,
            retweet_count: record.retweet_count,
            text: record.text,
            is_quote: record.is_quote,
            is_retweet: record.is_retweet,
            language: record.language,
            user_id: record.user_id,
            conversation_id: record.conversation_id,
            source: record.source,
            views: record.views,
        }
    }
}
