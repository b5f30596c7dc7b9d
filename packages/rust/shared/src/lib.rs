//! Shared types, error model, and configuration for tenderbot.
//!
//! This crate is the foundation depended on by all other tenderbot crates.
//! It provides:
//! - [`TenderBotError`] — the unified error type
//! - Domain types ([`CandidateLink`], [`FetchResult`], [`DisplayUnit`], [`Reply`])
//! - Configuration ([`AppConfig`], [`LinkPolicy`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CredentialStatus, DiscordConfig, FetchConfig, FetchSection, LinkPolicy,
    LinksSection, ReplyConfig, ReplySection, check_bot_credentials, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, TenderBotError};
pub use types::{CandidateLink, DisplayUnit, Embed, FetchResult, IncomingMessage, Reply};
