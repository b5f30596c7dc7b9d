//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tenderbot_core::{MessageHandler, ReplySink};
use tenderbot_extract::LinkExtractor;
use tenderbot_resolver::TitleResolver;
use tenderbot_shared::{
    AppConfig, FetchConfig, IncomingMessage, LinkPolicy, Reply, check_bot_credentials,
    init_config, load_config, load_config_from,
};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// tenderbot: resolve government e-procurement links to tender titles.
#[derive(Parser)]
#[command(
    name = "tenderbot",
    version,
    about = "Find e-procurement portal links in chat text and resolve them to tender titles.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.tenderbot/tenderbot.toml.
    #[arg(long, global = true, env = "TENDERBOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the portal links the bot would react to in TEXT.
    Links {
        /// Message text to scan.
        text: String,
    },

    /// Fetch one URL and print its resolved title.
    Resolve {
        /// Page URL.
        url: String,
    },

    /// Run the full message handler and print the reply it would send.
    Handle {
        /// Message text (read from stdin when omitted).
        text: Option<String>,

        /// Treat the message as written by a bot (the handler ignores it).
        #[arg(long)]
        bot: bool,

        /// Print the reply as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
    /// Report whether the chat platform credentials are set.
    Check,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so replies on
/// stdout stay machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "tenderbot=info",
        1 => "tenderbot=debug",
        _ => "tenderbot=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Links { text } => cmd_links(config_path, &text),
        Command::Resolve { url } => cmd_resolve(config_path, &url).await,
        Command::Handle { text, bot, json } => cmd_handle(config_path, text, bot, json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
            ConfigAction::Check => cmd_config_check(config_path),
        },
    }
}

/// Load config from `--config` when given, else the default location.
fn resolve_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(&path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_links(config_path: Option<PathBuf>, text: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let extractor = LinkExtractor::new(LinkPolicy::from(&config))?;

    let policy = extractor.policy();
    let links = extractor.extract(text);
    info!(
        host = %policy.allowed_host,
        prefix = %policy.allowed_path_prefix,
        found = links.len(),
        "scanned text"
    );
    for link in links {
        println!("{link}");
    }
    Ok(())
}

async fn cmd_resolve(config_path: Option<PathBuf>, url: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let parsed = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;

    let resolver = TitleResolver::from_config(&FetchConfig::from(&config))?;
    match resolver.resolve_title(&parsed).await? {
        Some(title) => println!("{title}"),
        None => println!("(no title found for {parsed})"),
    }
    Ok(())
}

async fn cmd_handle(
    config_path: Option<PathBuf>,
    text: Option<String>,
    bot: bool,
    json: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let content = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let message = IncomingMessage {
        author_is_bot: bot,
        content,
    };
    let handler = MessageHandler::from_config(&config)?;
    let sink = StdoutSink { json };

    handler.handle(&message, &sink).await;
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn cmd_config_check(config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let status = check_bot_credentials(&config);

    let mark = |set: bool| if set { "set" } else { "missing" };
    println!("  {:<12} {}", status.bot_token_env, mark(status.bot_token_set));
    println!("  {:<12} {}", status.client_id_env, mark(status.client_id_set));

    if !status.is_complete() {
        return Err(eyre!(
            "chat platform credentials incomplete. Set {} and {}.",
            status.bot_token_env,
            status.client_id_env
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Stdout reply sink
// ---------------------------------------------------------------------------

/// Prints replies instead of posting them to the chat platform.
struct StdoutSink {
    json: bool,
}

impl ReplySink for StdoutSink {
    async fn reply(&self, reply: Reply) -> tenderbot_shared::Result<()> {
        if self.json {
            let out = serde_json::to_string_pretty(&reply)
                .map_err(|e| tenderbot_shared::TenderBotError::reply(e.to_string()))?;
            println!("{out}");
            return Ok(());
        }

        match reply {
            Reply::Text(text) => println!("{text}"),
            Reply::Embeds(embeds) => {
                for embed in embeds {
                    println!("{}\n  {}", embed.title, embed.url);
                }
            }
        }
        Ok(())
    }
}
