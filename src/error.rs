use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiMessengerError {
    #[error("HTTP 请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP 状态异常 {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// 接口返回了失败状态或缺少必要字段
    #[error("{0}")]
    Api(String),

    #[error("响应解析错误: {0}")]
    Decode(String),

    #[error("无效的 URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("无效的请求参数: {0}")]
    InvalidArgs(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiMessengerError {
    /// 网络层失败（连接失败或非 2xx 响应）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiMessengerError::Transport(_) | ApiMessengerError::HttpStatus { .. }
        )
    }
}

impl From<serde_json::Error> for ApiMessengerError {
    fn from(err: serde_json::Error) -> Self {
        ApiMessengerError::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for ApiMessengerError {
    fn from(err: base64::DecodeError) -> Self {
        ApiMessengerError::Decode(format!("invalid base64: {}", err))
    }
}

/// Result type for apimessenger crate
pub type Result<T> = std::result::Result<T, ApiMessengerError>;
