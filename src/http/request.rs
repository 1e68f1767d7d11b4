use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderMap as Headers, HeaderName, HeaderValue};
use serde::Serialize;

use crate::http::types::Method;
use crate::{ApiMessengerError, Result};

pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url)?,
            headers: Headers::new(),
            body: None,
        })
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        let name: HeaderName = key
            .parse()
            .map_err(|_| ApiMessengerError::InvalidArgs(format!("invalid header name: {}", key)))?;
        let value: HeaderValue = value.parse().map_err(|_| {
            ApiMessengerError::InvalidArgs(format!("invalid header value for {}", key))
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// 设置 JSON 请求体，同时写入 Content-type 头
    pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_string(data)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(json);
        Ok(self)
    }
}
