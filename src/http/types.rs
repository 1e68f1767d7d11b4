use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::{ApiMessengerError, Result};

/// 请求方法
///
/// 只有 `GET` 和 `POST` 会构造请求选项，其它任何取值都保留为 `Other`，
/// 由调用方按普通 GET 处理。匹配区分大小写。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl FromStr for Method {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        })
    }
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);

impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..1000).contains(&code) {
            Ok(Self(code))
        } else {
            Err(ApiMessengerError::Decode(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_methods() {
        assert_eq!(Method::from("GET"), Method::Get);
        assert_eq!(Method::from("POST"), Method::Post);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(Method::from("get"), Method::Other("get".to_string()));
        assert_eq!(Method::from("post").as_str(), "post");
    }

    #[test]
    fn test_unknown_method_kept_verbatim() {
        let method = Method::from("PUT");
        assert_eq!(method, Method::Other("PUT".to_string()));
        assert_eq!(method.to_string(), "PUT");
    }

    #[test]
    fn test_status_ranges() {
        assert!(Status::new(200).unwrap().is_success());
        assert!(Status::new(299).unwrap().is_success());
        assert!(!Status::new(404).unwrap().is_success());
        assert!(Status::new(42).is_err());
        assert!(Status::new(1000).is_err());
        assert!(!Status::new(999).unwrap().is_success());
        assert_eq!(Status::new(503).unwrap().code(), 503);
    }
}
