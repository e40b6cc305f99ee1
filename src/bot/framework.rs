use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::config::Settings;
use crate::handlers::message;
use crate::platform::{LoggingClient, PlatformClient};
use crate::services::moderation::pipeline::MessageEvent;
use crate::services::moderation::reconciler;

/// Run the moderation loop: newline-delimited `MessageEvent` JSON on
/// stdin, one decided `Action` JSON per line on stdout. The platform
/// integration layer normally feeds this engine directly; the stdin driver
/// serves local runs and smoke tests with the same wiring.
pub async fn run(settings: Settings, pool: SqlitePool) -> Result<(), Error> {
    let data = Arc::new(Data::new(pool, settings));
    let platform: Arc<dyn PlatformClient> = Arc::new(LoggingClient);

    reconciler::spawn_mute_reconciler(platform.clone(), data.clone());
    info!("Started mute-expiry reconciler");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: MessageEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!("skipping unparsable event: {}", e);
                continue;
            }
        };

        let action = message::handle_message(&data, platform.as_ref(), &event).await;
        println!("{}", serde_json::to_string(&action)?);
    }

    info!("Input closed, shutting down");
    Ok(())
}
