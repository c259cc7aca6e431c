// Source trait for the remote status server
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one request against the status server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub http_status: u16,
    pub body_len: usize,
    pub elapsed: Duration,
}

impl ServerStatus {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status)
    }
}

#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current status page
    async fn fetch_status(&self) -> anyhow::Result<ServerStatus>;
}
