use std::fmt;

use sqlx::SqlitePool;

use crate::config::Settings;
use crate::services::settings::SettingsCache;
use crate::services::spam::SpamWindow;

/// Shared state available to the pipeline, handlers, and background tasks.
/// Explicitly owned and injectable; tests construct isolated instances
/// around in-memory pools.
pub struct Data {
    pub pool: SqlitePool,
    pub settings: Settings,
    /// Write-through mirror of the chat_settings store
    pub chat_settings: SettingsCache,
    /// In-memory message-rate tracker for spam detection
    pub spam_window: SpamWindow,
}

impl Data {
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        let chat_settings = SettingsCache::new(pool.clone(), settings.clone());
        let spam_window = SpamWindow::new(settings.spam_window_seconds);
        Self {
            pool,
            settings,
            chat_settings,
            spam_window,
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("cached_chats", &self.chat_settings.len())
            .field("spam_keys", &self.spam_window.tracked_keys())
            .finish_non_exhaustive()
    }
}
