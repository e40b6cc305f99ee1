pub mod bans;
pub mod chat_settings;
pub mod mutes;
pub mod warns;
