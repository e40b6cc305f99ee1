use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bot::data::Data;
use crate::constants::policy::{REASON_LINK_BAN, REASON_PROFANITY_BAN};
use crate::db::queries::{bans, warns};
use crate::services::moderation::escalation::{escalate, Escalation};
use crate::utils::{links, profanity};

/// One inbound non-command message, as supplied by the platform layer.
/// The is_admin flag is resolved once per event by that layer; every
/// filter in the pipeline reads the same capability bit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub chat_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub has_media: bool,
    pub message_ref: i64,
    /// Unix timestamp the message arrived at
    pub sent_at: i64,
}

impl MessageEvent {
    /// Text the link/profanity filters inspect: message text, or the media
    /// caption when there is no text.
    pub fn body(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}

/// Which filter produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    Link,
    Profanity,
    Spam,
}

/// The pipeline's decision for one message. The caller interprets it:
/// delete the message, send the sticker, apply the platform ban. Warn
/// counts and ban-ledger writes are already committed by the time an
/// action is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Allow,
    Delete,
    DeleteAndWarn {
        warns: i64,
        violation: Violation,
    },
    DeleteWarnAndBan {
        warns: i64,
        violation: Violation,
        reason: String,
    },
    /// Message stays; the configured sticker is sent in response.
    SendSticker {
        trigger: String,
        sticker: String,
    },
}

/// Run a message through the moderation stages in fixed order; the first
/// matching stage decides and later stages never run. Never calls the
/// platform and never fails observably: store errors degrade to the
/// weakest enforcement that is still correct and are logged.
pub async fn evaluate(data: &Data, event: &MessageEvent) -> Action {
    let settings = data.chat_settings.get(event.chat_id).await;

    // 1. Locked chat: drop everything from non-admins.
    if settings.locked && !event.is_admin {
        return Action::Delete;
    }

    // 2. Sticker triggers: non-punitive, apply to admins too.
    if let Some(text) = event.text.as_deref() {
        if let Some((trigger, sticker)) = settings.sticker_triggers.match_text(text) {
            return Action::SendSticker {
                trigger: trigger.to_string(),
                sticker: sticker.to_string(),
            };
        }
    }

    // 3. Link filter.
    if settings.anti_link && !event.is_admin {
        if let Some(body) = event.body() {
            if links::contains_link(body) {
                return warn_and_escalate(data, event, Violation::Link, REASON_LINK_BAN).await;
            }
        }
    }

    // 4. Profanity filter.
    if !event.is_admin {
        if let Some(body) = event.body() {
            if profanity::contains_profanity(body) {
                return warn_and_escalate(
                    data,
                    event,
                    Violation::Profanity,
                    REASON_PROFANITY_BAN,
                )
                .await;
            }
        }
    }

    // 5. Spam filter. The timestamp is recorded for every message,
    //    admins included, so the window reflects real traffic.
    let window_size = data
        .spam_window
        .record(event.chat_id, event.user_id, event.sent_at);

    if settings.spam_enabled && !event.is_admin && window_size as i64 > settings.spam_limit {
        return warn_and_escalate(data, event, Violation::Spam, &settings.spam_ban_reason).await;
    }

    Action::Allow
}

/// Shared tail of the three warning filters: increment the warn counter,
/// apply the escalation policy, and append to the ban ledger before the
/// caller gets to attempt the platform ban.
async fn warn_and_escalate(
    data: &Data,
    event: &MessageEvent,
    violation: Violation,
    ban_reason: &str,
) -> Action {
    let warns = match warns::change(&data.pool, event.chat_id, event.user_id, 1).await {
        Ok(n) => n,
        Err(e) => {
            // The message still gets deleted; the counter catches up on the
            // user's next infraction.
            warn!(
                chat_id = event.chat_id,
                user_id = event.user_id,
                ?violation,
                "warn increment failed: {}",
                e
            );
            return Action::Delete;
        }
    };

    debug!(
        chat_id = event.chat_id,
        user_id = event.user_id,
        warns,
        ?violation,
        "warned user"
    );

    match escalate(warns) {
        Escalation::Ban => {
            let username = event.username.as_deref().unwrap_or("");
            if let Err(e) = bans::record(
                &data.pool,
                event.chat_id,
                event.user_id,
                username,
                0,
                ban_reason,
            )
            .await
            {
                warn!(
                    chat_id = event.chat_id,
                    user_id = event.user_id,
                    "ban ledger write failed: {}",
                    e
                );
            }
            data.spam_window.forget(event.chat_id, event.user_id);
            Action::DeleteWarnAndBan {
                warns,
                violation,
                reason: ban_reason.to_string(),
            }
        }
        Escalation::None => Action::DeleteAndWarn { warns, violation },
    }
}
