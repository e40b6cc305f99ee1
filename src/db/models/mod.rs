mod ban_record;
mod chat_settings;
mod mute_record;

pub use ban_record::BanRecord;
pub use chat_settings::{ChatSettings, TriggerTable};
pub use mute_record::MuteRecord;
