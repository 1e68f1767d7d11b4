use std::time::Duration;

use crate::Result;
use crate::http::types::Status;

pub struct Response {
    pub status: Status,
    pub body: String,
    pub duration: Duration,
}

impl Response {
    pub fn new(status: u16, body: String, duration: Duration) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            body,
            duration,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
