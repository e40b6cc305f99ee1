use sqlx::SqlitePool;

/// Apply a warn delta for a user in a chat and return the new count.
///
/// A single upsert statement so concurrent increments for the same
/// (chat, user) serialize in the database and never lose updates. The
/// count is floored at zero on both insert and update.
pub async fn change(
    pool: &SqlitePool,
    chat_id: i64,
    user_id: i64,
    delta: i64,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO warns (chat_id, user_id, warns)
        VALUES (?1, ?2, MAX(0, ?3))
        ON CONFLICT (chat_id, user_id)
        DO UPDATE SET warns = MAX(0, warns + ?3)
        RETURNING warns
        "#,
    )
    .bind(chat_id)
    .bind(user_id)
    .bind(delta)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

pub async fn get(pool: &SqlitePool, chat_id: i64, user_id: i64) -> Result<i64, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT warns FROM warns WHERE chat_id = ?1 AND user_id = ?2")
            .bind(chat_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|r| r.0).unwrap_or(0))
}
