//! End-to-end moderation pipeline scenarios against an in-memory store.

use chatwarden::bot::data::Data;
use chatwarden::config::Settings;
use chatwarden::db;
use chatwarden::db::queries::bans;
use chatwarden::services::moderation::pipeline::{evaluate, Action, MessageEvent, Violation};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn memory_pool() -> SqlitePool {
    // One connection so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    db::pool::run_migrations(&pool).await.expect("migrations");
    pool
}

async fn test_data() -> Data {
    Data::new(memory_pool().await, Settings::default())
}

fn event(chat_id: i64, user_id: i64, text: &str, message_ref: i64, sent_at: i64) -> MessageEvent {
    MessageEvent {
        chat_id,
        user_id,
        username: Some("testuser".to_string()),
        is_admin: false,
        text: Some(text.to_string()),
        caption: None,
        has_media: false,
        message_ref,
        sent_at,
    }
}

#[tokio::test]
async fn link_message_is_deleted_and_warned() {
    // Scenario A: anti_link on by default, non-admin posts an invite link.
    let data = test_data().await;

    let action = evaluate(&data, &event(100, 1, "join t.me/spam", 1, 1000)).await;
    assert_eq!(
        action,
        Action::DeleteAndWarn {
            warns: 1,
            violation: Violation::Link
        }
    );

    let ledger = bans::list(&data.pool, 100).await.unwrap();
    assert!(ledger.is_empty(), "no ban before the third warn");
}

#[tokio::test]
async fn third_link_warn_escalates_to_ban() {
    // Scenario B: two more link messages push the shared counter to 3.
    let data = test_data().await;

    let a1 = evaluate(&data, &event(100, 1, "t.me/spam one", 1, 1000)).await;
    let a2 = evaluate(&data, &event(100, 1, "t.me/spam two", 2, 1001)).await;
    let a3 = evaluate(&data, &event(100, 1, "t.me/spam three", 3, 1002)).await;

    assert_eq!(
        a1,
        Action::DeleteAndWarn {
            warns: 1,
            violation: Violation::Link
        }
    );
    assert_eq!(
        a2,
        Action::DeleteAndWarn {
            warns: 2,
            violation: Violation::Link
        }
    );
    assert_eq!(
        a3,
        Action::DeleteWarnAndBan {
            warns: 3,
            violation: Violation::Link,
            reason: "auto-link-3".to_string()
        }
    );

    // The ledger was written before the caller ever attempts the platform ban.
    let ledger = bans::list(&data.pool, 100).await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].user_id, 1);
    assert_eq!(ledger[0].reason, "auto-link-3");
    assert_eq!(ledger[0].mod_id, 0);
    assert_eq!(ledger[0].username, "testuser");
}

#[tokio::test]
async fn sticker_trigger_allows_message_and_sends_sticker() {
    // Scenario C: registered trigger "gm" -> sticker "S1".
    let data = test_data().await;
    data.chat_settings
        .update(100, |s| s.sticker_triggers.insert("gm", "S1"))
        .await
        .unwrap();

    let action = evaluate(&data, &event(100, 1, "gm friends", 1, 1000)).await;
    assert_eq!(
        action,
        Action::SendSticker {
            trigger: "gm".to_string(),
            sticker: "S1".to_string()
        }
    );

    // No warn was issued for a trigger match.
    let warns = chatwarden::db::queries::warns::get(&data.pool, 100, 1)
        .await
        .unwrap();
    assert_eq!(warns, 0);
}

#[tokio::test]
async fn spam_limit_triggers_on_message_after_limit() {
    // Scenario D: spam_limit 5, six clean messages inside the 7 s window.
    let data = test_data().await;
    data.chat_settings
        .update(100, |s| s.spam_limit = 5)
        .await
        .unwrap();

    for i in 0..5 {
        let action = evaluate(&data, &event(100, 1, "hello", i, 1000 + i)).await;
        assert_eq!(action, Action::Allow, "message {} should pass", i + 1);
    }

    let action = evaluate(&data, &event(100, 1, "hello", 6, 1005)).await;
    assert_eq!(
        action,
        Action::DeleteAndWarn {
            warns: 1,
            violation: Violation::Spam
        }
    );
}

#[tokio::test]
async fn spam_escalation_uses_configured_reason() {
    let data = test_data().await;
    data.chat_settings
        .update(100, |s| {
            s.spam_limit = 1;
            s.spam_ban_reason = "flooding".to_string();
        })
        .await
        .unwrap();

    // Each burst message past the limit warns once; the third warn bans.
    let mut last = Action::Allow;
    for i in 0..4 {
        last = evaluate(&data, &event(100, 1, "hi", i, 1000 + i)).await;
    }
    assert_eq!(
        last,
        Action::DeleteWarnAndBan {
            warns: 3,
            violation: Violation::Spam,
            reason: "flooding".to_string()
        }
    );
}

#[tokio::test]
async fn warn_counter_is_shared_across_filters() {
    let data = test_data().await;

    evaluate(&data, &event(100, 1, "t.me/spam", 1, 1000)).await;
    evaluate(&data, &event(100, 1, "what the fuck", 2, 1001)).await;
    let third = evaluate(&data, &event(100, 1, "bit.ly/xyz", 3, 1002)).await;

    assert_eq!(
        third,
        Action::DeleteWarnAndBan {
            warns: 3,
            violation: Violation::Link,
            reason: "auto-link-3".to_string()
        }
    );
}

#[tokio::test]
async fn locked_chat_deletes_non_admin_messages() {
    let data = test_data().await;
    data.chat_settings
        .update(100, |s| s.locked = true)
        .await
        .unwrap();

    let action = evaluate(&data, &event(100, 1, "hello", 1, 1000)).await;
    assert_eq!(action, Action::Delete);

    let mut admin = event(100, 2, "hello", 2, 1000);
    admin.is_admin = true;
    assert_eq!(evaluate(&data, &admin).await, Action::Allow);
}

#[tokio::test]
async fn admins_bypass_link_profanity_and_spam() {
    let data = test_data().await;
    data.chat_settings
        .update(100, |s| s.spam_limit = 1)
        .await
        .unwrap();

    let mut e = event(100, 2, "t.me/spam fuck", 1, 1000);
    e.is_admin = true;
    assert_eq!(evaluate(&data, &e).await, Action::Allow);

    // Flood as admin: recorded in the window but never punished.
    for i in 0..5 {
        let mut e = event(100, 2, "hi", 10 + i, 1001 + i);
        e.is_admin = true;
        assert_eq!(evaluate(&data, &e).await, Action::Allow);
    }
}

#[tokio::test]
async fn caption_is_checked_when_text_is_absent() {
    let data = test_data().await;

    let e = MessageEvent {
        chat_id: 100,
        user_id: 1,
        username: None,
        is_admin: false,
        text: None,
        caption: Some("check out https://spam.example".to_string()),
        has_media: true,
        message_ref: 1,
        sent_at: 1000,
    };

    assert_eq!(
        evaluate(&data, &e).await,
        Action::DeleteAndWarn {
            warns: 1,
            violation: Violation::Link
        }
    );
}

#[tokio::test]
async fn trigger_match_precedes_link_filter() {
    // A message that both matches a trigger and carries a link: the trigger
    // stage runs first and short-circuits.
    let data = test_data().await;
    data.chat_settings
        .update(100, |s| s.sticker_triggers.insert("gm", "S1"))
        .await
        .unwrap();

    let action = evaluate(&data, &event(100, 1, "gm t.me/spam", 1, 1000)).await;
    assert!(matches!(action, Action::SendSticker { .. }));
}

#[tokio::test]
async fn disabled_spam_filter_never_warns() {
    let data = test_data().await;
    data.chat_settings
        .update(100, |s| {
            s.spam_enabled = false;
            s.spam_limit = 1;
        })
        .await
        .unwrap();

    for i in 0..10 {
        let action = evaluate(&data, &event(100, 1, "hi", i, 1000 + i)).await;
        assert_eq!(action, Action::Allow);
    }
}

#[tokio::test]
async fn disabled_anti_link_allows_links() {
    let data = test_data().await;
    data.chat_settings
        .update(100, |s| s.anti_link = false)
        .await
        .unwrap();

    let action = evaluate(&data, &event(100, 1, "t.me/ok", 1, 1000)).await;
    assert_eq!(action, Action::Allow);
}
