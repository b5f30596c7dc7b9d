//! Message handler: links in, one embed reply out.
//!
//! Every candidate link is resolved on its own task. A failed, timed-out, or
//! panicking task costs only its own embed; the rest of the batch still
//! replies. Nothing escapes [`MessageHandler::handle`], because the caller is
//! the chat platform's event loop.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use tenderbot_extract::LinkExtractor;
use tenderbot_resolver::{HttpFetcher, PageFetcher, TitleResolver};
use tenderbot_shared::{
    AppConfig, CandidateLink, DisplayUnit, Embed, FetchConfig, IncomingMessage, LinkPolicy,
    Reply, ReplyConfig, Result,
};

/// Appended to titles cut at the length limit.
const ELLIPSIS: char = '…';

/// Delivers replies back to the chat platform.
pub trait ReplySink: Send + Sync {
    /// Reply to the message currently being handled.
    fn reply(&self, reply: Reply) -> impl Future<Output = Result<()>> + Send;
}

/// Watches messages for portal links and replies with resolved titles.
pub struct MessageHandler<F = HttpFetcher> {
    extractor: LinkExtractor,
    resolver: Arc<TitleResolver<F>>,
    reply: ReplyConfig,
}

impl MessageHandler<HttpFetcher> {
    /// Build the production handler from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            LinkExtractor::new(LinkPolicy::from(config))?,
            TitleResolver::from_config(&FetchConfig::from(config))?,
            ReplyConfig::from(config),
        ))
    }
}

impl<F: PageFetcher + 'static> MessageHandler<F> {
    /// Assemble a handler from parts. Unlike [`MessageHandler::from_config`]
    /// this does not validate; `reply.max_title_chars` of 0 empties every title.
    pub fn new(extractor: LinkExtractor, resolver: TitleResolver<F>, reply: ReplyConfig) -> Self {
        Self {
            extractor,
            resolver: Arc::new(resolver),
            reply,
        }
    }

    /// Handle one inbound message. Errors are logged, never returned.
    #[instrument(skip_all, fields(author_is_bot = message.author_is_bot))]
    pub async fn handle<S: ReplySink>(&self, message: &IncomingMessage, sink: &S) {
        if message.author_is_bot {
            debug!("ignoring message from bot author");
            return;
        }

        let links = self.extractor.extract(&message.content);
        if links.is_empty() {
            return;
        }

        let requested = links.len();
        let units = self.resolve_all(links).await;
        if units.is_empty() {
            info!(links = requested, "no link resolved, not replying");
            return;
        }

        let embeds = units.len();
        let reply = Reply::Embeds(units.into_iter().map(Embed::from).collect());
        match sink.reply(reply).await {
            Ok(()) => info!(links = requested, embeds, "reply sent"),
            Err(e) => error!(error = %e, "failed to send reply"),
        }
    }

    /// Resolve every link concurrently and build display units in link order.
    ///
    /// A link whose fetch fails is dropped; a link that fetched but produced no
    /// title is shown with its URL as the title.
    pub async fn resolve_all(&self, links: Vec<CandidateLink>) -> Vec<DisplayUnit> {
        let mut tasks = JoinSet::new();

        for (index, link) in links.into_iter().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            tasks.spawn(async move {
                let result = resolver.resolve_title(link.url()).await;
                (index, link, result)
            });
        }

        let mut units = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, link, Ok(title))) => {
                    let title = title.unwrap_or_else(|| link.to_string());
                    units.push((
                        index,
                        DisplayUnit {
                            title: truncate_title(&title, self.reply.max_title_chars),
                            url: link.to_string(),
                        },
                    ));
                }
                Ok((_, link, Err(e))) => {
                    warn!(url = %link, error = %e, "failed to fetch title");
                }
                Err(e) => {
                    warn!(error = %e, "title task did not complete");
                }
            }
        }

        units.sort_by_key(|(index, _)| *index);
        units.into_iter().map(|(_, unit)| unit).collect()
    }
}

/// Cut `title` to at most `max` characters, ending in `…` when shortened.
/// A limit of 0 leaves no room for the ellipsis and yields an empty string.
pub fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = title.chars().take(max.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}
