use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// 无固定结构的 JSON 对象（保持键的插入顺序）
pub type JsonObject = serde_json::Map<String, Value>;

/// 收件箱中的一条消息
///
/// 除 `chatId` / `timestamp` 外，接口返回的其它字段原样保存在 `fields` 中。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxMessage {
    #[serde(rename = "chatId")]
    pub chat_id: String,

    pub timestamp: Number,

    /// 下一页页码，由客户端写入
    #[serde(default)]
    pub offset: i64,

    #[serde(flatten)]
    pub fields: JsonObject,
}

impl InboxMessage {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// 消息正文（`body` 字段）
    pub fn text(&self) -> Option<&str> {
        self.field("body").and_then(Value::as_str)
    }

    pub fn timestamp_secs(&self) -> Option<i64> {
        self.timestamp
            .as_i64()
            .or_else(|| self.timestamp.as_f64().map(|t| t as i64))
    }

    /// 按时间戳比较，相等时返回 Equal 以保持稳定排序
    pub fn cmp_timestamp(&self, other: &Self) -> Ordering {
        match (self.timestamp.as_i64(), other.timestamp.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self
                .timestamp
                .as_f64()
                .partial_cmp(&other.timestamp.as_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pager {
    #[serde(rename = "currentPage")]
    pub current_page: i64,
}

impl Pager {
    /// 页码溢出时返回 None
    pub fn next_offset(&self) -> Option<i64> {
        self.current_page.checked_add(1)
    }
}

/// `messages` 接口的响应体（status 已在解码前校验）
#[derive(Debug, Deserialize)]
pub(crate) struct InboxEnvelope {
    pub pager: Pager,
    pub messages: Vec<InboxMessage>,
}
