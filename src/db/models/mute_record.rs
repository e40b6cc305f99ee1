#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct MuteRecord {
    pub chat_id: i64,
    pub user_id: i64,
    /// Unix timestamp the restriction lifts at; 0 means not muted
    pub until_ts: i64,
}

impl MuteRecord {
    pub fn is_expired(&self, now: i64) -> bool {
        self.until_ts > 0 && self.until_ts <= now
    }
}
