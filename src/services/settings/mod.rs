mod cache;

pub use cache::SettingsCache;
