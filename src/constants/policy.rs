/// Moderation policy defaults (some overridable via env vars, see `config::Settings`)
pub const DEFAULT_SPAM_WINDOW_SECONDS: u64 = 7; // Rolling window for the message-rate detector
pub const DEFAULT_SPAM_LIMIT: i64 = 20; // Messages allowed inside the window
pub const DEFAULT_SPAM_BAN_REASON: &str = "auto-spam-limit";

/// Fallback welcome text when a chat has not configured one
pub const DEFAULT_WELCOME_TEXT: &str = "Welcome {first_name}! Read the rules and be kind.";

/// Warns at which an auto-ban fires. Shared by every warning call site
/// (manual warn, link filter, profanity filter, spam filter).
pub const WARN_BAN_THRESHOLD: i64 = 3;

/// Ban-ledger reason strings for automatic escalations
pub const REASON_LINK_BAN: &str = "auto-link-3";
pub const REASON_PROFANITY_BAN: &str = "auto-profanity-3";
pub const REASON_MANUAL_WARN_BAN: &str = "auto-warn-3";

/// Interval between mute-expiry sweeps (not user-configurable)
pub const MUTE_SWEEP_INTERVAL_SECONDS: u64 = 30;
