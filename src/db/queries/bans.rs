use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;

use crate::db::models::BanRecord;

/// Upsert a ban-ledger entry. Re-banning the same user replaces the
/// existing entry, so the call is idempotent.
pub async fn record(
    pool: &SqlitePool,
    chat_id: i64,
    user_id: i64,
    username: &str,
    mod_id: i64,
    reason: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        REPLACE INTO bans (chat_id, user_id, username, mod_id, reason, banned_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(chat_id)
    .bind(user_id)
    .bind(username)
    .bind(mod_id)
    .bind(reason)
    .bind(Utc::now().timestamp())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn remove(pool: &SqlitePool, chat_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bans WHERE chat_id = ?1 AND user_id = ?2")
        .bind(chat_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List a chat's ban ledger in insertion order.
///
/// Rows persisted before the ledger grew its mod_id/reason columns must
/// still read back; if the primary query fails against such a schema, fall
/// back to the original column set and synthesize the defaults.
pub async fn list(pool: &SqlitePool, chat_id: i64) -> Result<Vec<BanRecord>, sqlx::Error> {
    let primary = sqlx::query_as::<_, BanRecord>(
        r#"
        SELECT chat_id, user_id, username, mod_id, reason, banned_at
        FROM bans
        WHERE chat_id = ?1
        ORDER BY rowid
        "#,
    )
    .bind(chat_id)
    .fetch_all(pool)
    .await;

    match primary {
        Ok(rows) => Ok(rows),
        Err(e) => {
            warn!("ban ledger query failed, falling back to legacy columns: {}", e);
            let legacy: Vec<(i64, i64, String, i64)> = sqlx::query_as(
                r#"
                SELECT chat_id, user_id, username, banned_at
                FROM bans
                WHERE chat_id = ?1
                ORDER BY rowid
                "#,
            )
            .bind(chat_id)
            .fetch_all(pool)
            .await?;

            Ok(legacy
                .into_iter()
                .map(|(chat_id, user_id, username, banned_at)| BanRecord {
                    chat_id,
                    user_id,
                    username,
                    mod_id: 0,
                    reason: String::new(),
                    banned_at,
                })
                .collect())
        }
    }
}

pub async fn is_banned(pool: &SqlitePool, chat_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM bans WHERE chat_id = ?1 AND user_id = ?2")
            .bind(chat_id)
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(row.0 > 0)
}
