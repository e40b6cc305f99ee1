pub mod moderation;
pub mod settings;
pub mod spam;
