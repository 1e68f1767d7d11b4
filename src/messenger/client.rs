use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::http::{HttpClient, Method, Request};
use crate::messenger::query::{build_query, to_query_args};
use crate::messenger::types::{InboxEnvelope, InboxMessage, JsonObject};
use crate::{ApiMessengerError, Result};

/// api-messenger.com 接口客户端
///
/// 所有便捷方法都经由 [`ApiMessenger::query`] 发出请求。客户端本身不保存
/// 任何可变状态，可以 clone 后在多个任务间共享。
#[derive(Clone, Debug)]
pub struct ApiMessenger {
    config: ClientConfig,
    http: HttpClient,
}

impl ApiMessenger {
    /// 使用默认地址创建客户端
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(token))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::new(config.timeout)?;
        Ok(Self { config, http })
    }

    /// 复用调用方已有的 reqwest 客户端（此时忽略 `config.timeout`）
    pub fn with_http_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            http: HttpClient::from_reqwest(client),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 拼接接口地址: `{base_url}/{method}?{args}&token=...`
    ///
    /// `token` 总会写入参数；若 `args` 已含 `token` 则原位替换。
    pub fn create_url(&self, method: &str, mut args: JsonObject) -> String {
        args.insert(
            "token".to_string(),
            Value::String(self.config.token.clone()),
        );
        format!("{}/{}?{}", self.config.base_url, method, build_query(&args))
    }

    /// 发送一次请求并返回原始响应体
    ///
    /// - `POST`: `args` 序列化为 JSON 请求体，不放入查询串
    /// - `GET`: `args` 放入查询串
    /// - 其它方法: 不构造任何请求选项，`args` 被丢弃，直接 GET
    ///   `create_url(method)`，不带 Content-type 头
    pub async fn query(
        &self,
        method: &str,
        args: &Value,
        http_method: impl Into<Method>,
    ) -> Result<String> {
        let http_method = http_method.into();
        let request = match &http_method {
            Method::Post => {
                Request::new(Method::Post, &self.create_url(method, JsonObject::new()))?
                    .with_json(args)?
            }
            Method::Get => {
                let url = self.create_url(method, to_query_args(args)?);
                Request::new(Method::Get, &url)?.with_header("Content-type", "application/json")?
            }
            Method::Other(name) => {
                warn!(
                    endpoint = method,
                    http_method = %name,
                    "unsupported HTTP method, sending plain GET without arguments"
                );
                Request::new(
                    http_method.clone(),
                    &self.create_url(method, JsonObject::new()),
                )?
            }
        };

        debug!(endpoint = method, http_method = %http_method, "sending request");
        let response = self.http.execute(request).await?;
        debug!(
            endpoint = method,
            status = response.status.code(),
            elapsed_ms = response.duration.as_millis() as u64,
            "response received"
        );

        if !response.is_success() {
            return Err(ApiMessengerError::HttpStatus {
                status: response.status.code(),
                body: response.body,
            });
        }

        Ok(response.body)
    }

    /// 读取收件箱
    ///
    /// `offset > 0` 时读取指定页，否则读取新消息。返回的每条消息都带有
    /// 下一页页码 `offset`，并按时间戳升序（稳定）排列。
    pub async fn get_inbox(&self, offset: i64) -> Result<Vec<InboxMessage>> {
        let args = if offset > 0 {
            json!({ "page": offset })
        } else {
            json!({ "new": 1 })
        };
        let body = self.query("messages", &args, Method::Get).await?;
        decode_inbox(&body)
    }

    /// 只扫描新消息页（offset 0），不做翻页
    pub async fn get_chat_messages(&self, author: &str) -> Result<Vec<InboxMessage>> {
        let inbox = self.get_inbox(0).await?;
        Ok(inbox
            .into_iter()
            .filter(|message| message.chat_id == author)
            .collect())
    }

    /// 向手机号发送消息，chatId 自动追加 `@c.us`
    pub async fn send_phone_message(&self, chat: &str, text: &str) -> Result<JsonObject> {
        let args = json!([{ "chatId": format!("{}@c.us", chat), "message": text }]);
        let body = self.query("sendmessage", &args, Method::Post).await?;
        decode_object(&body)
    }

    /// 发送消息，返回响应中的 `status`
    pub async fn send_message(&self, chat: &str, text: &str) -> Result<String> {
        let args = json!([{ "chatId": chat, "message": text }]);
        let body = self.query("sendmessage", &args, Method::Post).await?;
        let response = decode_object(&body)?;

        match response.get("status") {
            Some(Value::String(status)) => Ok(status.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(ApiMessengerError::Api(format!(
                "Message was not accepted. Result: {}",
                body
            ))),
        }
    }

    /// 发送文件；请求体是单个对象而不是列表
    pub async fn send_file(
        &self,
        chat: &str,
        body: &str,
        filename: &str,
        caption: &str,
    ) -> Result<JsonObject> {
        let args = json!({
            "chatId": chat,
            "caption": caption,
            "filename": filename,
            "body": body,
        });
        let response = self.query("sendFile", &args, Method::Post).await?;
        decode_object(&response)
    }

    pub async fn get_webhook(&self) -> Result<JsonObject> {
        let body = self
            .query("webhook", &Value::Object(JsonObject::new()), Method::Get)
            .await?;
        decode_object(&body)
    }

    /// 获取设备配对二维码图片
    pub async fn get_qr_code(&self) -> Result<Vec<u8>> {
        let body = self
            .query("go", &Value::Object(JsonObject::new()), Method::Get)
            .await?;
        let response = decode_object(&body)?;

        let img = match response.get("img") {
            Some(Value::String(img)) => img,
            _ => {
                return Err(ApiMessengerError::Api(format!(
                    "Cannot read QR code. Result: {}",
                    body
                )));
            }
        };

        Ok(STANDARD.decode(img.trim())?)
    }
}

fn decode_inbox(body: &str) -> Result<Vec<InboxMessage>> {
    let inbox: Value = serde_json::from_str(body).map_err(|_| cannot_read_inbox(body))?;

    if inbox.get("status").and_then(Value::as_str) != Some("OK") {
        warn!(status = ?inbox.get("status"), "inbox request rejected");
        return Err(cannot_read_inbox(&dump(&inbox)));
    }

    let envelope: InboxEnvelope = serde_json::from_value(inbox)?;
    let new_offset = envelope.pager.next_offset().ok_or_else(|| {
        ApiMessengerError::Decode(format!(
            "pager.currentPage out of range: {}",
            envelope.pager.current_page
        ))
    })?;

    let mut messages: Vec<InboxMessage> = envelope
        .messages
        .into_iter()
        .map(|mut message| {
            message.offset = new_offset;
            message
        })
        .collect();

    // sort_by 是稳定排序，时间戳相同的消息保持接口返回的顺序
    messages.sort_by(InboxMessage::cmp_timestamp);

    Ok(messages)
}

fn cannot_read_inbox(dump: &str) -> ApiMessengerError {
    ApiMessengerError::Api(format!("Cannot read inbox. Result: {}", dump))
}

fn decode_object(body: &str) -> Result<JsonObject> {
    match serde_json::from_str(body)? {
        Value::Object(map) => Ok(map),
        other => Err(ApiMessengerError::Decode(format!(
            "expected a JSON object, got: {}",
            dump(&other)
        ))),
    }
}

fn dump(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiMessenger {
        ApiMessenger::new("secret").unwrap()
    }

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_create_url_appends_token_last() {
        let url = client().create_url("foo", object(json!({"a": "1"})));
        assert_eq!(url, "https://app.api-messenger.com/foo?a=1&token=secret");
    }

    #[test]
    fn test_create_url_without_args() {
        let url = client().create_url("webhook", JsonObject::new());
        assert_eq!(url, "https://app.api-messenger.com/webhook?token=secret");
    }

    #[test]
    fn test_create_url_replaces_token_in_place() {
        let url = client().create_url("foo", object(json!({"token": "x", "b": "2"})));
        assert_eq!(url, "https://app.api-messenger.com/foo?token=secret&b=2");
    }

    #[test]
    fn test_create_url_custom_base() {
        let config = ClientConfig::new("t").with_base_url("http://localhost:8080");
        let client = ApiMessenger::with_config(config).unwrap();
        assert_eq!(
            client.create_url("go", JsonObject::new()),
            "http://localhost:8080/go?token=t"
        );
    }

    #[test]
    fn test_decode_inbox_sorts_stably_and_sets_offset() {
        let body = json!({
            "status": "OK",
            "pager": {"currentPage": 2},
            "messages": [
                {"chatId": "b", "timestamp": 30, "body": "third"},
                {"chatId": "a", "timestamp": 10, "body": "first"},
                {"chatId": "c", "timestamp": 20, "body": "second-1"},
                {"chatId": "d", "timestamp": 20, "body": "second-2"}
            ]
        })
        .to_string();

        let inbox = decode_inbox(&body).unwrap();
        let texts: Vec<_> = inbox.iter().filter_map(|m| m.text()).collect();
        assert_eq!(texts, vec!["first", "second-1", "second-2", "third"]);
        assert!(inbox.iter().all(|m| m.offset == 3));
    }

    #[test]
    fn test_decode_inbox_rejects_bad_status() {
        for body in [r#"{"status":"FAIL"}"#, "{}", "not json"] {
            match decode_inbox(body) {
                Err(ApiMessengerError::Api(msg)) => {
                    assert!(msg.starts_with("Cannot read inbox. Result: "))
                }
                other => panic!("expected Api error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_decode_inbox_missing_pager() {
        let result = decode_inbox(r#"{"status":"OK","messages":[]}"#);
        assert!(matches!(result, Err(ApiMessengerError::Decode(_))));
    }

    #[test]
    fn test_decode_inbox_page_overflow() {
        let body = json!({
            "status": "OK",
            "pager": {"currentPage": i64::MAX},
            "messages": [{"chatId": "a", "timestamp": 1}]
        })
        .to_string();

        match decode_inbox(&body) {
            Err(ApiMessengerError::Decode(msg)) => assert!(msg.contains("currentPage")),
            other => panic!("expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_inbox_missing_messages() {
        let result = decode_inbox(r#"{"status":"OK","pager":{"currentPage":1}}"#);
        assert!(matches!(result, Err(ApiMessengerError::Decode(_))));
    }

    #[test]
    fn test_decode_inbox_message_without_chat_id() {
        let body = json!({
            "status": "OK",
            "pager": {"currentPage": 1},
            "messages": [{"timestamp": 1, "body": "orphan"}]
        })
        .to_string();

        let result = decode_inbox(&body);
        assert!(matches!(result, Err(ApiMessengerError::Decode(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = ApiMessenger::new("very-secret-token").unwrap();
        let out = format!("{:?}", client);
        assert!(!out.contains("very-secret-token"));
        assert!(out.contains("app.api-messenger.com"));
    }

    #[test]
    fn test_decode_object_rejects_list() {
        assert!(matches!(
            decode_object("[1, 2]"),
            Err(ApiMessengerError::Decode(_))
        ));
        assert!(matches!(
            decode_object("<html>"),
            Err(ApiMessengerError::Decode(_))
        ));
    }
}
