pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod messenger;
pub mod utils;

// Re-export commonly used types
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiMessengerError, Result};
pub use messenger::{ApiMessenger, InboxMessage, JsonObject, Pager};
