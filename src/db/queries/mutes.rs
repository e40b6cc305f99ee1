use sqlx::SqlitePool;

use crate::db::models::MuteRecord;

/// Create or overwrite the mute for a user in a chat.
pub async fn set(
    pool: &SqlitePool,
    chat_id: i64,
    user_id: i64,
    until_ts: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("REPLACE INTO mutes (chat_id, user_id, until_ts) VALUES (?1, ?2, ?3)")
        .bind(chat_id)
        .bind(user_id)
        .bind(until_ts)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn clear(pool: &SqlitePool, chat_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM mutes WHERE chat_id = ?1 AND user_id = ?2")
        .bind(chat_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get(
    pool: &SqlitePool,
    chat_id: i64,
    user_id: i64,
) -> Result<Option<MuteRecord>, sqlx::Error> {
    sqlx::query_as::<_, MuteRecord>(
        "SELECT chat_id, user_id, until_ts FROM mutes WHERE chat_id = ?1 AND user_id = ?2",
    )
    .bind(chat_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Mutes whose expiry has passed. until_ts = 0 rows are "not muted"
/// placeholders and never come due.
pub async fn list_due(pool: &SqlitePool, now: i64) -> Result<Vec<MuteRecord>, sqlx::Error> {
    sqlx::query_as::<_, MuteRecord>(
        r#"
        SELECT chat_id, user_id, until_ts
        FROM mutes
        WHERE until_ts > 0 AND until_ts <= ?1
        "#,
    )
    .bind(now)
    .fetch_all(pool)
    .await
}
