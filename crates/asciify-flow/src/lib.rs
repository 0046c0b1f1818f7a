//! The upload → palette → action conversation, independent of any transport.

pub mod error;
pub mod machine;
pub mod prompts;

pub use error::FlowError;
pub use machine::{Conversation, Outcome};
