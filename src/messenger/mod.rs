pub mod client;
pub mod query;
pub mod types;

pub use client::ApiMessenger;
pub use query::build_query;
pub use types::{InboxMessage, JsonObject, Pager};
