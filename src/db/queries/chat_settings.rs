use sqlx::SqlitePool;

use crate::config::Settings;
use crate::db::models::{ChatSettings, TriggerTable};

/// Raw chat_settings row as persisted; trigger JSON is parsed on the way
/// out and non-positive spam limits are normalized once at load.
#[derive(Debug, sqlx::FromRow)]
struct ChatSettingsRow {
    chat_id: i64,
    welcome_text: String,
    welcome_photo: String,
    welcome_video: String,
    anti_link: bool,
    sticker_triggers: String,
    locked: bool,
    rules_text: String,
    bye_text: String,
    bye_photo: String,
    spam_enabled: bool,
    spam_limit: i64,
    spam_ban_reason: String,
}

impl ChatSettingsRow {
    fn into_settings(self, settings: &Settings) -> ChatSettings {
        ChatSettings {
            chat_id: self.chat_id,
            welcome_text: if self.welcome_text.is_empty() {
                settings.welcome_fallback.clone()
            } else {
                self.welcome_text
            },
            welcome_photo: self.welcome_photo,
            welcome_video: self.welcome_video,
            anti_link: self.anti_link,
            locked: self.locked,
            rules_text: self.rules_text,
            bye_text: self.bye_text,
            bye_photo: self.bye_photo,
            spam_enabled: self.spam_enabled,
            spam_limit: if self.spam_limit > 0 {
                self.spam_limit
            } else {
                settings.default_spam_limit
            },
            spam_ban_reason: if self.spam_ban_reason.is_empty() {
                crate::constants::policy::DEFAULT_SPAM_BAN_REASON.to_string()
            } else {
                self.spam_ban_reason
            },
            sticker_triggers: TriggerTable::from_json(&self.sticker_triggers),
        }
    }
}

pub async fn get(
    pool: &SqlitePool,
    settings: &Settings,
    chat_id: i64,
) -> Result<Option<ChatSettings>, sqlx::Error> {
    let row = sqlx::query_as::<_, ChatSettingsRow>(
        r#"
        SELECT chat_id, welcome_text, welcome_photo, welcome_video, anti_link,
               sticker_triggers, locked, rules_text, bye_text, bye_photo,
               spam_enabled, spam_limit, spam_ban_reason
        FROM chat_settings
        WHERE chat_id = ?1
        "#,
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into_settings(settings)))
}

/// Materialize the default row for a chat on first contact. INSERT OR
/// IGNORE keeps the call idempotent under concurrent first reads.
pub async fn create_defaults(
    pool: &SqlitePool,
    defaults: &ChatSettings,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO chat_settings
            (chat_id, welcome_text, welcome_photo, welcome_video, anti_link,
             sticker_triggers, locked, rules_text, bye_text, bye_photo,
             spam_enabled, spam_limit, spam_ban_reason)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(defaults.chat_id)
    .bind(&defaults.welcome_text)
    .bind(&defaults.welcome_photo)
    .bind(&defaults.welcome_video)
    .bind(defaults.anti_link)
    .bind(defaults.sticker_triggers.to_json())
    .bind(defaults.locked)
    .bind(&defaults.rules_text)
    .bind(&defaults.bye_text)
    .bind(&defaults.bye_photo)
    .bind(defaults.spam_enabled)
    .bind(defaults.spam_limit)
    .bind(&defaults.spam_ban_reason)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist the entire settings row (replace semantics, not a partial
/// update).
pub async fn upsert(pool: &SqlitePool, row: &ChatSettings) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        REPLACE INTO chat_settings
            (chat_id, welcome_text, welcome_photo, welcome_video, anti_link,
             sticker_triggers, locked, rules_text, bye_text, bye_photo,
             spam_enabled, spam_limit, spam_ban_reason)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(row.chat_id)
    .bind(&row.welcome_text)
    .bind(&row.welcome_photo)
    .bind(&row.welcome_video)
    .bind(row.anti_link)
    .bind(row.sticker_triggers.to_json())
    .bind(row.locked)
    .bind(&row.rules_text)
    .bind(&row.bye_text)
    .bind(&row.bye_photo)
    .bind(row.spam_enabled)
    .bind(row.spam_limit)
    .bind(&row.spam_ban_reason)
    .execute(pool)
    .await?;

    Ok(())
}
