pub mod formatter;

pub use formatter::{format_inbox, format_json};
