pub mod discord;

use anyhow::Result;
use async_trait::async_trait;

/// A message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Platform-specific author ID
    pub author_id: u64,
    /// Display name of the author, for logs only
    pub author_name: String,
    /// Name of the channel the message was posted in
    pub channel_name: String,
    /// The message text
    pub text: String,
}

/// Where a reply to the current message goes.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply(&self, text: &str) -> Result<()>;
}
