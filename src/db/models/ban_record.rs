#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BanRecord {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    /// Moderator who issued the ban; 0 for automatic escalations
    pub mod_id: i64,
    pub reason: String,
    pub banned_at: i64,
}

impl BanRecord {
    pub fn is_automated(&self) -> bool {
        self.mod_id == 0
    }
}
