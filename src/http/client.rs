use std::time::{Duration, Instant};

use crate::Result;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::types::Method;

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// 默认不设置超时，需要时由调用方指定
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// 使用外部构造的 reqwest 客户端
    pub fn from_reqwest(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    pub async fn execute(&self, request: Request) -> Result<Response> {
        // 未知方法按普通 GET 发送
        let method = match request.method {
            Method::Post => reqwest::Method::POST,
            Method::Get | Method::Other(_) => reqwest::Method::GET,
        };
        let mut req = self
            .inner
            .request(method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let start = Instant::now();
        // 错误信息中去掉 URL，查询串里带有 token
        let response = req.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let duration = start.elapsed();

        Response::new(status, body, duration)
    }
}
