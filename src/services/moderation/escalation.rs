use crate::constants::policy::WARN_BAN_THRESHOLD;

/// Outcome of applying the warn-to-ban policy to a warn count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    None,
    Ban,
}

/// Pure warn-count policy, shared by every call site that can warn
/// (manual warn, link filter, profanity filter, spam filter).
pub fn escalate(warns: i64) -> Escalation {
    if warns >= WARN_BAN_THRESHOLD {
        Escalation::Ban
    } else {
        Escalation::None
    }
}
