use std::env;

use crate::constants::policy::{
    DEFAULT_SPAM_LIMIT, DEFAULT_SPAM_WINDOW_SECONDS, DEFAULT_WELCOME_TEXT,
};

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    /// Spam detection: rolling window in seconds
    pub spam_window_seconds: u64,
    /// Spam detection: default per-chat message limit inside the window
    pub default_spam_limit: i64,
    /// Welcome text used until a chat configures its own
    pub welcome_fallback: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "sqlite://chatwarden.db?mode=rwc".to_string());

        let spam_window_seconds = env::var("SPAM_WINDOW_SEC")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SPAM_WINDOW_SECONDS);

        let default_spam_limit = env::var("SPAM_MAX_MSG")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SPAM_LIMIT);

        let welcome_fallback = env::var("WELCOME_DEFAULT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_WELCOME_TEXT.to_string());

        Ok(Self {
            database_url,
            spam_window_seconds,
            default_spam_limit,
            welcome_fallback,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            spam_window_seconds: DEFAULT_SPAM_WINDOW_SECONDS,
            default_spam_limit: DEFAULT_SPAM_LIMIT,
            welcome_fallback: DEFAULT_WELCOME_TEXT.to_string(),
        }
    }
}
