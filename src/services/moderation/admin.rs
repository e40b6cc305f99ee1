//! Ledger-facing halves of the manual moderation commands. The external
//! command layer validates arguments and performs the platform calls; these
//! functions own the durable state transitions.

use sqlx::SqlitePool;
use tracing::warn;

use crate::bot::error::Error;
use crate::constants::policy::REASON_MANUAL_WARN_BAN;
use crate::db::models::BanRecord;
use crate::db::queries::{bans, mutes, warns};
use crate::services::moderation::escalation::{escalate, Escalation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarnOutcome {
    pub warns: i64,
    /// Set when this warn crossed the ban threshold; the ledger entry is
    /// already written and the caller must apply the platform ban.
    pub banned: bool,
}

/// Manual warn: the fourth escalation call site, sharing the same
/// threshold as the link/profanity/spam filters.
pub async fn warn_user(
    pool: &SqlitePool,
    chat_id: i64,
    user_id: i64,
    username: &str,
    mod_id: i64,
) -> Result<WarnOutcome, Error> {
    let new = warns::change(pool, chat_id, user_id, 1).await?;

    if escalate(new) == Escalation::Ban {
        if let Err(e) =
            bans::record(pool, chat_id, user_id, username, mod_id, REASON_MANUAL_WARN_BAN).await
        {
            warn!(chat_id, user_id, "ban ledger write failed: {}", e);
        }
        return Ok(WarnOutcome {
            warns: new,
            banned: true,
        });
    }

    Ok(WarnOutcome {
        warns: new,
        banned: false,
    })
}

/// Administrative warn removal, clamped at zero.
pub async fn remove_warn(pool: &SqlitePool, chat_id: i64, user_id: i64) -> Result<i64, Error> {
    Ok(warns::change(pool, chat_id, user_id, -1).await?)
}

pub async fn warn_count(pool: &SqlitePool, chat_id: i64, user_id: i64) -> Result<i64, Error> {
    Ok(warns::get(pool, chat_id, user_id).await?)
}

/// Record a mute lasting `seconds` from `now`; returns the expiry the
/// caller passes to the platform restriction.
pub async fn mute_user(
    pool: &SqlitePool,
    chat_id: i64,
    user_id: i64,
    seconds: i64,
    now: i64,
) -> Result<i64, Error> {
    let until_ts = now + seconds.max(0);
    mutes::set(pool, chat_id, user_id, until_ts).await?;
    Ok(until_ts)
}

/// Drop the mute record immediately (explicit unmute).
pub async fn unmute_user(pool: &SqlitePool, chat_id: i64, user_id: i64) -> Result<bool, Error> {
    Ok(mutes::clear(pool, chat_id, user_id).await?)
}

/// Manual ban: append to the ledger with the acting moderator's id.
pub async fn ban_user(
    pool: &SqlitePool,
    chat_id: i64,
    user_id: i64,
    username: &str,
    mod_id: i64,
    reason: &str,
) -> Result<(), Error> {
    bans::record(pool, chat_id, user_id, username, mod_id, reason).await?;
    Ok(())
}

pub async fn unban_user(pool: &SqlitePool, chat_id: i64, user_id: i64) -> Result<bool, Error> {
    Ok(bans::remove(pool, chat_id, user_id).await?)
}

/// Ban ledger for audit display, insertion-ordered.
pub async fn ban_log(pool: &SqlitePool, chat_id: i64) -> Result<Vec<BanRecord>, Error> {
    Ok(bans::list(pool, chat_id).await?)
}
