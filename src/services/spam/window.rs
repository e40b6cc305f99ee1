use std::collections::VecDeque;

use dashmap::DashMap;

/// Sliding time-window of message timestamps per (chat, user), purely
/// in-memory. A restart resets spam history — false negatives after
/// restart, never false positives.
pub struct SpamWindow {
    window_seconds: i64,
    /// (chat_id, user_id) -> unix timestamps inside the window
    history: DashMap<(i64, i64), VecDeque<i64>>,
}

impl SpamWindow {
    pub fn new(window_seconds: u64) -> Self {
        Self {
            window_seconds: window_seconds as i64,
            history: DashMap::new(),
        }
    }

    /// Append a message timestamp, prune everything older than the window,
    /// and return the resulting count.
    ///
    /// Timestamps are monotonically non-decreasing per key (messages arrive
    /// in real time), so pruning from the oldest end is always correct. The
    /// whole mutation happens under the map's entry lock, so two messages
    /// from the same user serialize.
    pub fn record(&self, chat_id: i64, user_id: i64, timestamp: i64) -> usize {
        let mut events = self.history.entry((chat_id, user_id)).or_default();
        events.push_back(timestamp);

        while let Some(&oldest) = events.front() {
            if timestamp - oldest > self.window_seconds {
                events.pop_front();
            } else {
                break;
            }
        }

        events.len()
    }

    /// Current count for a key as of `now`, without recording anything.
    pub fn count(&self, chat_id: i64, user_id: i64, now: i64) -> usize {
        self.history
            .get(&(chat_id, user_id))
            .map(|events| {
                events
                    .iter()
                    .filter(|&&t| now - t <= self.window_seconds)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Drop keys whose newest entry has fallen out of the window. Called
    /// periodically so many short-lived chats do not grow the map without
    /// bound.
    pub fn prune_idle(&self, now: i64) {
        let window = self.window_seconds;
        self.history
            .retain(|_, events| events.back().is_some_and(|&t| now - t <= window));
    }

    /// Forget one key entirely (e.g. after a ban).
    pub fn forget(&self, chat_id: i64, user_id: i64) {
        self.history.remove(&(chat_id, user_id));
    }

    /// Number of tracked (chat, user) keys.
    pub fn tracked_keys(&self) -> usize {
        self.history.len()
    }
}
