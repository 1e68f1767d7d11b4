use chrono::{DateTime, Local};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};
use serde_json::Value;

use crate::InboxMessage;

/// 正文预览的最大字符数
const PREVIEW_CHARS: usize = 60;

/// 把收件箱消息渲染成表格
pub fn format_inbox(messages: &[InboxMessage]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Chat", "Time", "Offset", "Text"]);

    for message in messages {
        table.add_row(vec![
            Cell::new(&message.chat_id).fg(Color::Cyan),
            Cell::new(format_timestamp(message)),
            Cell::new(message.offset).add_attribute(Attribute::Dim),
            Cell::new(preview(message.text().unwrap_or_default())),
        ]);
    }

    table.to_string()
}

/// 尝试格式化为漂亮的 JSON
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn format_timestamp(message: &InboxMessage) -> String {
    message
        .timestamp_secs()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| message.timestamp.to_string())
}

fn preview(text: &str) -> String {
    let single_line = text.replace(['\r', '\n'], " ");
    if single_line.chars().count() <= PREVIEW_CHARS {
        single_line
    } else {
        let cut: String = single_line.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "x".repeat(100);
        let out = preview(&long);
        assert_eq!(out.chars().count(), PREVIEW_CHARS + 1);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("a\nb"), "a b");
    }

    #[test]
    fn test_format_inbox_contains_rows() {
        let message: InboxMessage = serde_json::from_value(json!({
            "chatId": "7900@c.us",
            "timestamp": 1700000000,
            "offset": 2,
            "body": "hello"
        }))
        .unwrap();

        let table = format_inbox(&[message]);
        assert!(table.contains("7900@c.us"));
        assert!(table.contains("hello"));
        assert!(table.contains("Offset"));
    }

    #[test]
    fn test_format_json_is_pretty() {
        let out = format_json(&json!({"status": "OK"}));
        assert_eq!(out, "{\n  \"status\": \"OK\"\n}");
    }
}
