pub mod admin;
pub mod escalation;
pub mod pipeline;
pub mod reconciler;
