use serde_json::Value;
use tracing::warn;

use crate::config::Settings;
use crate::constants::policy::DEFAULT_SPAM_BAN_REASON;

/// Ordered sticker-trigger table: lower-cased trigger phrase -> sticker
/// reference. Insertion order is preserved because trigger matching is
/// first-match-wins and that order is observable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerTable {
    entries: Vec<(String, String)>,
}

impl TriggerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger. An existing phrase keeps its position and only
    /// updates the sticker reference.
    pub fn insert(&mut self, phrase: &str, sticker: &str) {
        let key = phrase.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = sticker.to_string();
        } else {
            self.entries.push((key, sticker.to_string()));
        }
    }

    pub fn remove(&mut self, phrase: &str) -> bool {
        let key = phrase.trim().to_lowercase();
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    /// Case-insensitive substring match against the message text; the first
    /// registered phrase that appears anywhere in the text wins.
    pub fn match_text(&self, text: &str) -> Option<(&str, &str)> {
        let haystack = text.to_lowercase();
        self.entries
            .iter()
            .find(|(phrase, _)| !phrase.is_empty() && haystack.contains(phrase.as_str()))
            .map(|(phrase, sticker)| (phrase.as_str(), sticker.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the persisted JSON column. Accepts the current array-of-pairs
    /// layout and the legacy object layout; anything unparsable degrades to
    /// an empty table rather than failing the settings load.
    pub fn from_json(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        let mut table = Self::default();
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(pairs)) => {
                for pair in pairs {
                    if let (Some(k), Some(v)) = (
                        pair.get(0).and_then(Value::as_str),
                        pair.get(1).and_then(Value::as_str),
                    ) {
                        table.insert(k, v);
                    }
                }
            }
            Ok(Value::Object(map)) => {
                for (k, v) in map {
                    if let Some(v) = v.as_str() {
                        table.insert(&k, v);
                    }
                }
            }
            Ok(_) => warn!("sticker_triggers column holds non-table JSON, ignoring"),
            Err(e) => warn!("sticker_triggers column unparsable, ignoring: {}", e),
        }
        table
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Per-chat moderation configuration. One row per chat ever observed;
/// absent rows materialize with these defaults on first read and the row is
/// never deleted afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub chat_id: i64,
    pub welcome_text: String,
    pub welcome_photo: String,
    pub welcome_video: String,
    pub anti_link: bool,
    pub locked: bool,
    pub rules_text: String,
    pub bye_text: String,
    pub bye_photo: String,
    pub spam_enabled: bool,
    pub spam_limit: i64,
    pub spam_ban_reason: String,
    pub sticker_triggers: TriggerTable,
}

impl ChatSettings {
    pub fn defaults(chat_id: i64, settings: &Settings) -> Self {
        Self {
            chat_id,
            welcome_text: settings.welcome_fallback.clone(),
            welcome_photo: String::new(),
            welcome_video: String::new(),
            anti_link: true,
            locked: false,
            rules_text: String::new(),
            bye_text: String::new(),
            bye_photo: String::new(),
            spam_enabled: true,
            spam_limit: settings.default_spam_limit,
            spam_ban_reason: DEFAULT_SPAM_BAN_REASON.to_string(),
            sticker_triggers: TriggerTable::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_match_is_first_wins() {
        let mut table = TriggerTable::new();
        table.insert("Good Morning", "S-LONG");
        table.insert("gm", "S1");

        // both phrases appear; the earlier registration wins
        let hit = table.match_text("good morning and gm everyone").unwrap();
        assert_eq!(hit, ("good morning", "S-LONG"));

        let hit = table.match_text("gm friends").unwrap();
        assert_eq!(hit, ("gm", "S1"));
    }

    #[test]
    fn insert_existing_phrase_keeps_position() {
        let mut table = TriggerTable::new();
        table.insert("a", "1");
        table.insert("b", "2");
        table.insert("a", "3");

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let mut table = TriggerTable::new();
        table.insert("GM", "S1");
        assert!(table.match_text("GM friends").is_some());
        assert!(table.match_text("no greeting here").is_none());
    }

    #[test]
    fn json_round_trip_keeps_order() {
        let mut table = TriggerTable::new();
        table.insert("zz", "1");
        table.insert("aa", "2");

        let parsed = TriggerTable::from_json(&table.to_json());
        assert_eq!(parsed, table);
    }

    #[test]
    fn legacy_object_layout_is_accepted() {
        let table = TriggerTable::from_json(r#"{"gm": "S1", "gn": "S2"}"#);
        assert_eq!(table.len(), 2);
        assert!(table.match_text("gm all").is_some());
    }

    #[test]
    fn malformed_json_degrades_to_empty() {
        assert!(TriggerTable::from_json("{not json").is_empty());
        assert!(TriggerTable::from_json("42").is_empty());
        assert!(TriggerTable::from_json("").is_empty());
    }
}
