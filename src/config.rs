use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{ApiMessengerError, Result};

pub const DEFAULT_BASE_URL: &str = "https://app.api-messenger.com";

/// 客户端配置，构造后不可变
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub token: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// apimessenger.toml 的内容
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// 配置文件加载器（仅供命令行使用，库本身不读取任何文件）
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "apimessenger.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ApiMessengerError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| ApiMessengerError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/apimessenger/
    pub fn find_and_load() -> Option<FileConfig> {
        Self::try_load_from_current_dir().or_else(Self::try_load_from_user_dir)
    }

    fn try_load_from_current_dir() -> Option<FileConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path).ok();
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<FileConfig> {
        let home = dirs::home_dir()?;
        let config_path = home
            .join(".config")
            .join("apimessenger")
            .join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_path(&config_path).ok()
        } else {
            None
        }
    }

    /// 合并命令行参数与配置文件，命令行优先
    pub fn build_config(
        file: Option<FileConfig>,
        token: Option<String>,
        base_url: Option<String>,
    ) -> Result<ClientConfig> {
        let file = file.unwrap_or_default();

        let token = token.or(file.token).ok_or_else(|| {
            ApiMessengerError::Config(
                "no API token: pass --token or set `token` in apimessenger.toml".to_string(),
            )
        })?;

        let mut config = ClientConfig::new(token);
        if let Some(base_url) = base_url.or(file.base_url) {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = file.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
