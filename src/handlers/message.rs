use tracing::warn;

use crate::bot::data::Data;
use crate::platform::PlatformClient;
use crate::services::moderation::pipeline::{self, Action, MessageEvent, Violation};

/// Evaluate one inbound message and execute the decided action against the
/// platform. Every platform call is best-effort: a failed delete or ban
/// never un-records the warn count or ledger entry, it only logs.
pub async fn handle_message(
    data: &Data,
    platform: &dyn PlatformClient,
    event: &MessageEvent,
) -> Action {
    let action = pipeline::evaluate(data, event).await;

    match &action {
        Action::Allow => {}
        Action::Delete => {
            delete_message(platform, event).await;
        }
        Action::DeleteAndWarn { warns, violation } => {
            delete_message(platform, event).await;
            let notice = warn_notice(event, *violation, *warns);
            send_notice(platform, event.chat_id, &notice).await;
        }
        Action::DeleteWarnAndBan { warns, reason, .. } => {
            delete_message(platform, event).await;
            if let Err(e) = platform.ban_user(event.chat_id, event.user_id).await {
                warn!(
                    chat_id = event.chat_id,
                    user_id = event.user_id,
                    "platform ban failed: {}",
                    e
                );
            }
            let notice = format!(
                "{} was banned after reaching {} warns ({}).",
                display_name(event),
                warns,
                reason
            );
            send_notice(platform, event.chat_id, &notice).await;
        }
        Action::SendSticker { trigger, sticker } => {
            if let Err(e) = platform.send_sticker(event.chat_id, sticker).await {
                warn!(chat_id = event.chat_id, "sticker send failed: {}", e);
            }
            let notice = format!("{} triggered: '{}'", display_name(event), trigger);
            send_notice(platform, event.chat_id, &notice).await;
        }
    }

    action
}

async fn delete_message(platform: &dyn PlatformClient, event: &MessageEvent) {
    if let Err(e) = platform
        .delete_message(event.chat_id, event.message_ref)
        .await
    {
        warn!(
            chat_id = event.chat_id,
            message_ref = event.message_ref,
            "message delete failed: {}",
            e
        );
    }
}

async fn send_notice(platform: &dyn PlatformClient, chat_id: i64, text: &str) {
    if let Err(e) = platform.send_notice(chat_id, text).await {
        warn!(chat_id, "notice send failed: {}", e);
    }
}

fn display_name(event: &MessageEvent) -> String {
    event
        .username
        .clone()
        .unwrap_or_else(|| event.user_id.to_string())
}

fn warn_notice(event: &MessageEvent, violation: Violation, warns: i64) -> String {
    let name = display_name(event);
    match violation {
        Violation::Link => format!("Links are not allowed — {} was warned. Warns: {}", name, warns),
        Violation::Profanity => format!(
            "{}, inappropriate language is not allowed. Warns: {}",
            name, warns
        ),
        Violation::Spam => format!(
            "{}, please stop spamming. You were warned. Warns: {}",
            name, warns
        ),
    }
}
