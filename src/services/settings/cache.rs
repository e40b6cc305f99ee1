use dashmap::DashMap;
use sqlx::SqlitePool;
use tracing::warn;

use crate::bot::error::Error;
use crate::config::Settings;
use crate::db::models::ChatSettings;
use crate::db::queries::chat_settings;

/// Write-through cache over the chat_settings store, one entry per chat
/// ever seen this process lifetime. Owned and injectable: tests construct
/// isolated instances around their own pool.
pub struct SettingsCache {
    pool: SqlitePool,
    settings: Settings,
    entries: DashMap<i64, ChatSettings>,
}

impl SettingsCache {
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        Self {
            pool,
            settings,
            entries: DashMap::new(),
        }
    }

    /// Fetch a chat's settings. Never fails observably: a cache miss loads
    /// from the store (materializing the default row for a chat seen for
    /// the first time); a store error logs and returns built-in defaults
    /// without caching them, so the next call retries the store.
    pub async fn get(&self, chat_id: i64) -> ChatSettings {
        if let Some(entry) = self.entries.get(&chat_id) {
            return entry.clone();
        }

        match chat_settings::get(&self.pool, &self.settings, chat_id).await {
            Ok(Some(loaded)) => {
                self.entries.insert(chat_id, loaded.clone());
                loaded
            }
            Ok(None) => {
                let defaults = ChatSettings::defaults(chat_id, &self.settings);
                if let Err(e) = chat_settings::create_defaults(&self.pool, &defaults).await {
                    warn!(chat_id, "failed to materialize default settings row: {}", e);
                    return defaults;
                }
                self.entries.insert(chat_id, defaults.clone());
                defaults
            }
            Err(e) => {
                warn!(chat_id, "settings load failed, using defaults: {}", e);
                ChatSettings::defaults(chat_id, &self.settings)
            }
        }
    }

    /// Apply a field-level mutation and persist the whole row before
    /// returning. The cache is updated first; a crash between the two
    /// leaves the cache ahead of the store until next process start.
    /// Concurrent writers to the same chat are last-writer-wins; readers
    /// only ever see whole settings objects.
    pub async fn update<F>(&self, chat_id: i64, mutate: F) -> Result<ChatSettings, Error>
    where
        F: FnOnce(&mut ChatSettings),
    {
        // Ensure the row is loaded (and materialized) before mutating.
        let current = self.get(chat_id).await;

        let mut updated = current;
        mutate(&mut updated);
        self.entries.insert(chat_id, updated.clone());

        chat_settings::upsert(&self.pool, &updated).await?;
        Ok(updated)
    }

    /// Number of chats resident in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for SettingsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsCache")
            .field("cached_chats", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::db::pool::run_migrations(&pool).await.expect("migrations");
        pool
    }

    #[test]
    fn get_before_any_write_returns_defaults() {
        tokio_test::block_on(async {
            let cache = SettingsCache::new(memory_pool().await, Settings::default());

            let s = cache.get(42).await;
            assert!(s.anti_link);
            assert!(!s.locked);
            assert!(s.spam_enabled);
            assert_eq!(s.spam_limit, 20);
            assert_eq!(s.spam_ban_reason, "auto-spam-limit");
            assert!(s.sticker_triggers.is_empty());
        });
    }

    #[test]
    fn update_is_visible_to_later_gets() {
        tokio_test::block_on(async {
            let cache = SettingsCache::new(memory_pool().await, Settings::default());

            cache
                .update(42, |s| s.locked = true)
                .await
                .expect("update persists");

            assert!(cache.get(42).await.locked);
        });
    }

    #[test]
    fn update_survives_cache_drop() {
        tokio_test::block_on(async {
            let pool = memory_pool().await;
            let cache = SettingsCache::new(pool.clone(), Settings::default());
            cache
                .update(7, |s| {
                    s.anti_link = false;
                    s.spam_limit = 5;
                })
                .await
                .expect("update persists");
            drop(cache);

            // A fresh cache over the same store sees the write.
            let fresh = SettingsCache::new(pool, Settings::default());
            let s = fresh.get(7).await;
            assert!(!s.anti_link);
            assert_eq!(s.spam_limit, 5);
        });
    }

    #[test]
    fn get_is_idempotent() {
        tokio_test::block_on(async {
            let cache = SettingsCache::new(memory_pool().await, Settings::default());
            let a = cache.get(1).await;
            let b = cache.get(1).await;
            assert_eq!(a, b);
            assert_eq!(cache.len(), 1);
        });
    }
}
