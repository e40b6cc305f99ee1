pub mod links;
pub mod profanity;
