//! Tender title resolution: fetch, follow a meta refresh, run the title chain.
//!
//! Portal detail links often land on an interstitial page that redirects with
//! `<meta http-equiv="refresh">` instead of an HTTP status. The resolver
//! follows one such hop; if the hop fails it keeps the first page rather than
//! giving up.

pub mod fetch;

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, instrument, warn};
use url::Url;

use tenderbot_extract::TitleChain;
use tenderbot_shared::{FetchConfig, FetchResult, Result, TenderBotError};

pub use fetch::{HttpFetcher, PageFetcher};

/// Matches `<meta http-equiv="refresh" content="0; url=TARGET">`.
static META_REFRESH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv=["']?refresh["']?[^>]+content=["']?\s*\d+\s*;\s*url=([^"'>\s]+)["']?[^>]*>"#,
    )
    .expect("meta refresh regex")
});

/// Find a meta-refresh target in `html`, resolved against `base`.
pub fn meta_refresh_target(html: &str, base: &Url) -> Option<Url> {
    let caps = META_REFRESH_RE.captures(html)?;
    base.join(caps.get(1)?.as_str()).ok()
}

// ---------------------------------------------------------------------------
// TitleResolver
// ---------------------------------------------------------------------------

/// Resolves a portal URL to a display title.
pub struct TitleResolver<F = HttpFetcher> {
    fetcher: F,
    chain: TitleChain,
    timeout: Duration,
    referer: String,
}

impl TitleResolver<HttpFetcher> {
    /// Resolver backed by a reqwest client built from `config`.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Ok(Self::new(HttpFetcher::new(config)?, config))
    }
}

impl<F: PageFetcher> TitleResolver<F> {
    /// Resolver over an arbitrary fetcher, with the default title chain.
    pub fn new(fetcher: F, config: &FetchConfig) -> Self {
        Self {
            fetcher,
            chain: TitleChain::new(),
            timeout: config.timeout,
            referer: config.referer.clone(),
        }
    }

    /// Replace the title chain.
    pub fn with_chain(mut self, chain: TitleChain) -> Self {
        self.chain = chain;
        self
    }

    /// Fetch `url` and derive its title.
    ///
    /// - `Err` — transport failure or timeout on the first fetch.
    /// - `Ok(None)` — non-2xx response, or no strategy found a title.
    /// - `Ok(Some(title))` — first non-empty title from the chain.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn resolve_title(&self, url: &Url) -> Result<Option<String>> {
        let first = self.fetch(url, &self.referer).await?;
        let Some(body) = first.into_body() else {
            return Ok(None);
        };

        let body = match meta_refresh_target(&body, url) {
            Some(target) => self.follow_refresh(url, &target, body).await,
            None => body,
        };

        Ok(self.chain.resolve(&body))
    }

    /// Fetch the refresh target; any failure keeps `original`.
    async fn follow_refresh(&self, origin: &Url, target: &Url, original: String) -> String {
        debug!(%target, "following meta refresh");

        match self.fetch(target, origin.as_str()).await {
            Ok(result) => match result.into_body() {
                Some(body) => body,
                None => {
                    debug!(%target, "refresh target not successful, keeping original page");
                    original
                }
            },
            Err(e) => {
                warn!(%target, error = %e, "refresh target fetch failed, keeping original page");
                original
            }
        }
    }

    /// One fetch under the per-request deadline. Expiry drops only this future.
    async fn fetch(&self, url: &Url, referer: &str) -> Result<FetchResult> {
        tokio::time::timeout(self.timeout, self.fetcher.fetch(url, referer))
            .await
            .map_err(|_| TenderBotError::timeout(url.as_str()))?
    }
}
