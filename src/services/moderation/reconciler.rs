use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

use crate::bot::data::Data;
use crate::constants::policy::MUTE_SWEEP_INTERVAL_SECONDS;
use crate::db::queries::mutes;
use crate::platform::PlatformClient;

/// Start the periodic mute-expiry sweep as a background task. Runs for the
/// process lifetime and shares no locks with the message path.
pub fn spawn_mute_reconciler(platform: Arc<dyn PlatformClient>, data: Arc<Data>) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(MUTE_SWEEP_INTERVAL_SECONDS));

        loop {
            ticker.tick().await;

            let now = Utc::now().timestamp();
            match sweep_expired_mutes(&data.pool, platform.as_ref(), now).await {
                Ok(0) => {}
                Ok(released) => info!(released, "released expired mutes"),
                Err(e) => error!("mute sweep failed: {:?}", e),
            }

            // Piggyback in-memory housekeeping on the same tick.
            data.spam_window.prune_idle(now);
        }
    });
}

/// Release every mute whose expiry has passed. The platform call is best
/// effort: a failure only logs, the record is removed either way, because
/// re-sending a once-expired restriction is immaterial.
pub async fn sweep_expired_mutes(
    pool: &SqlitePool,
    platform: &dyn PlatformClient,
    now: i64,
) -> Result<usize, sqlx::Error> {
    let due = mutes::list_due(pool, now).await?;
    let count = due.len();

    for record in due {
        if let Err(e) = platform
            .lift_restriction(record.chat_id, record.user_id)
            .await
        {
            debug!(
                chat_id = record.chat_id,
                user_id = record.user_id,
                "failed to lift restriction: {}",
                e
            );
        }
        mutes::clear(pool, record.chat_id, record.user_id).await?;
    }

    Ok(count)
}
