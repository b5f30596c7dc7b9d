//! Application configuration for tenderbot.
//!
//! User config lives at `~/.tenderbot/tenderbot.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TenderBotError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "tenderbot.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".tenderbot";

// ---------------------------------------------------------------------------
// Config structs (matching tenderbot.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which links the bot reacts to.
    #[serde(default)]
    pub links: LinksSection,

    /// Outbound HTTP settings.
    #[serde(default)]
    pub fetch: FetchSection,

    /// Reply formatting.
    #[serde(default)]
    pub reply: ReplySection,

    /// Chat platform credentials (env var names only).
    #[serde(default)]
    pub discord: DiscordConfig,
}

/// `[links]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksSection {
    /// Host that links must point at (compared case-insensitively).
    #[serde(default = "default_allowed_host")]
    pub allowed_host: String,

    /// Path prefix that links must start with (compared case-insensitively).
    #[serde(default = "default_allowed_path_prefix")]
    pub allowed_path_prefix: String,

    /// Maximum number of links handled per message.
    #[serde(default = "default_max_links")]
    pub max_links: usize,
}

impl Default for LinksSection {
    fn default() -> Self {
        Self {
            allowed_host: default_allowed_host(),
            allowed_path_prefix: default_allowed_path_prefix(),
            max_links: default_max_links(),
        }
    }
}

fn default_allowed_host() -> String {
    "web.pcc.gov.tw".into()
}
fn default_allowed_path_prefix() -> String {
    "/tps".into()
}
fn default_max_links() -> usize {
    5
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSection {
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `Accept` header.
    #[serde(default = "default_accept")]
    pub accept: String,

    /// `Accept-Language` header.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// `Referer` sent with the first fetch of a link.
    #[serde(default = "default_referer")]
    pub referer: String,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            referer: default_referer(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5000
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; SummaryBot/1.0; +https://discord.com)".into()
}
fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into()
}
fn default_accept_language() -> String {
    "zh-TW,zh;q=0.9,en;q=0.8".into()
}
fn default_referer() -> String {
    "https://web.pcc.gov.tw/tps/".into()
}

/// `[reply]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplySection {
    /// Maximum embed title length in characters (ellipsis included).
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,
}

impl Default for ReplySection {
    fn default() -> Self {
        Self {
            max_title_chars: default_max_title_chars(),
        }
    }
}

fn default_max_title_chars() -> usize {
    256
}

/// `[discord]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Name of the env var holding the bot token (never store the token itself).
    #[serde(default = "default_bot_token_env")]
    pub bot_token_env: String,

    /// Name of the env var holding the application client ID.
    #[serde(default = "default_client_id_env")]
    pub client_id_env: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token_env: default_bot_token_env(),
            client_id_env: default_client_id_env(),
        }
    }
}

fn default_bot_token_env() -> String {
    "BOT_TOKEN".into()
}
fn default_client_id_env() -> String {
    "CLIENT_ID".into()
}

// ---------------------------------------------------------------------------
// Runtime configs (derived from AppConfig)
// ---------------------------------------------------------------------------

/// Allow-list used by the link extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    /// Lowercased host.
    pub allowed_host: String,
    /// Lowercased path prefix.
    pub allowed_path_prefix: String,
    /// Cap on links per message.
    pub max_links: usize,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for LinkPolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            allowed_host: config.links.allowed_host.to_lowercase(),
            allowed_path_prefix: config.links.allowed_path_prefix.to_lowercase(),
            max_links: config.links.max_links,
        }
    }
}

/// Runtime HTTP settings for page fetches.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request deadline.
    pub timeout: Duration,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Default `Accept` header.
    pub accept: String,
    /// Default `Accept-Language` header.
    pub accept_language: String,
    /// Referer for the first fetch; redirect fetches use the original URL.
    pub referer: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.fetch.timeout_ms),
            user_agent: config.fetch.user_agent.clone(),
            accept: config.fetch.accept.clone(),
            accept_language: config.fetch.accept_language.clone(),
            referer: config.fetch.referer.clone(),
        }
    }
}

/// Runtime reply formatting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyConfig {
    /// Embed titles longer than this are cut and end in `…`.
    pub max_title_chars: usize,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ReplyConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_title_chars: config.reply.max_title_chars,
        }
    }
}

impl AppConfig {
    /// Reject settings the handler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.links.allowed_host.trim().is_empty() {
            return Err(TenderBotError::config("links.allowed_host must not be empty"));
        }
        if !self.links.allowed_path_prefix.starts_with('/') {
            return Err(TenderBotError::config(format!(
                "links.allowed_path_prefix must start with '/', got {:?}",
                self.links.allowed_path_prefix
            )));
        }
        if self.links.max_links == 0 {
            return Err(TenderBotError::config("links.max_links must be at least 1"));
        }
        if self.fetch.timeout_ms == 0 {
            return Err(TenderBotError::config("fetch.timeout_ms must be positive"));
        }
        if self.reply.max_title_chars < 2 {
            return Err(TenderBotError::config("reply.max_title_chars must be at least 2"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.tenderbot/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TenderBotError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.tenderbot/tenderbot.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load and validate the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TenderBotError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        TenderBotError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| TenderBotError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| TenderBotError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| TenderBotError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Which platform credentials are present in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStatus {
    /// Env var expected to hold the bot token.
    pub bot_token_env: String,
    /// Whether `bot_token_env` is set and non-empty.
    pub bot_token_set: bool,
    /// Env var expected to hold the application client id.
    pub client_id_env: String,
    /// Whether `client_id_env` is set and non-empty.
    pub client_id_set: bool,
}

impl CredentialStatus {
    /// Both credentials are available.
    pub fn is_complete(&self) -> bool {
        self.bot_token_set && self.client_id_set
    }
}

/// Check that the platform credential env vars are set and non-empty.
/// Values are never returned, only their presence.
pub fn check_bot_credentials(config: &AppConfig) -> CredentialStatus {
    let is_set = |name: &str| matches!(std::env::var(name), Ok(v) if !v.is_empty());
    CredentialStatus {
        bot_token_env: config.discord.bot_token_env.clone(),
        bot_token_set: is_set(&config.discord.bot_token_env),
        client_id_env: config.discord.client_id_env.clone(),
        client_id_set: is_set(&config.discord.client_id_env),
    }
}
