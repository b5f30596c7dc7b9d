//! Reply orchestration for tenderbot.
//!
//! This crate ties link extraction and title resolution together into the
//! message handler the chat platform calls for every inbound message.

pub mod handler;

pub use handler::{MessageHandler, ReplySink, truncate_title};
