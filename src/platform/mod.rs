use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Failure surfaced by the chat-platform client. Every call made through
/// [`PlatformClient`] is best-effort: callers log these and carry on, the
/// recorded moderation decision stands either way.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("platform call failed: {0}")]
    Call(String),

    #[error("platform call timed out")]
    Timeout,
}

/// Abstract chat-platform operations the engine needs. The concrete
/// protocol client (Telegram, etc.) lives outside this crate; it implements
/// this trait and interprets the pipeline's decisions.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Delete a message from a chat.
    async fn delete_message(&self, chat_id: i64, message_ref: i64) -> Result<(), PlatformError>;

    /// Permanently ban a user from a chat.
    async fn ban_user(&self, chat_id: i64, user_id: i64) -> Result<(), PlatformError>;

    /// Restrict a user from sending messages until the given unix timestamp.
    async fn restrict_user(
        &self,
        chat_id: i64,
        user_id: i64,
        until_ts: i64,
    ) -> Result<(), PlatformError>;

    /// Restore full send permissions for a user.
    async fn lift_restriction(&self, chat_id: i64, user_id: i64) -> Result<(), PlatformError>;

    /// Send a sticker by platform reference.
    async fn send_sticker(&self, chat_id: i64, sticker: &str) -> Result<(), PlatformError>;

    /// Post a human-readable moderation notice to the chat.
    async fn send_notice(&self, chat_id: i64, text: &str) -> Result<(), PlatformError>;
}

/// Stand-in client used by the stdin driver and dry runs: logs every call
/// and reports success.
#[derive(Debug, Default)]
pub struct LoggingClient;

#[async_trait]
impl PlatformClient for LoggingClient {
    async fn delete_message(&self, chat_id: i64, message_ref: i64) -> Result<(), PlatformError> {
        info!(chat_id, message_ref, "platform: delete_message");
        Ok(())
    }

    async fn ban_user(&self, chat_id: i64, user_id: i64) -> Result<(), PlatformError> {
        info!(chat_id, user_id, "platform: ban_user");
        Ok(())
    }

    async fn restrict_user(
        &self,
        chat_id: i64,
        user_id: i64,
        until_ts: i64,
    ) -> Result<(), PlatformError> {
        info!(chat_id, user_id, until_ts, "platform: restrict_user");
        Ok(())
    }

    async fn lift_restriction(&self, chat_id: i64, user_id: i64) -> Result<(), PlatformError> {
        info!(chat_id, user_id, "platform: lift_restriction");
        Ok(())
    }

    async fn send_sticker(&self, chat_id: i64, sticker: &str) -> Result<(), PlatformError> {
        info!(chat_id, sticker, "platform: send_sticker");
        Ok(())
    }

    async fn send_notice(&self, chat_id: i64, text: &str) -> Result<(), PlatformError> {
        info!(chat_id, text, "platform: send_notice");
        Ok(())
    }
}
