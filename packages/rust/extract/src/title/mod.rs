//! Title strategies and the ordered chain that evaluates them.
//!
//! Strategies are tried in priority order; the first non-empty title wins.
//! The tender form comes first because it yields `agency：subject`, which is
//! far more useful than the portal's generic `<title>`.

mod document;
mod open_graph;
mod tender;

use std::cell::OnceCell;

use scraper::Html;
use tracing::debug;

pub use document::DocumentTitle;
pub use open_graph::OpenGraphTitle;
pub use tender::TenderTitle;

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A fetched document shared by every strategy in one chain run.
///
/// The DOM is parsed on first use and reused afterwards, so a page the
/// tender patterns already resolved is never parsed at all.
pub struct Page<'a> {
    html: &'a str,
    doc: OnceCell<Html>,
}

impl<'a> Page<'a> {
    /// Wrap raw HTML; nothing is parsed yet.
    pub fn new(html: &'a str) -> Self {
        Self {
            html,
            doc: OnceCell::new(),
        }
    }

    /// The raw markup.
    pub fn html(&self) -> &'a str {
        self.html
    }

    /// The parsed document.
    pub fn document(&self) -> &Html {
        self.doc.get_or_init(|| Html::parse_document(self.html))
    }

    #[cfg(test)]
    fn is_parsed(&self) -> bool {
        self.doc.get().is_some()
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// One way of deriving a display title from an HTML document.
pub trait TitleStrategy: Send + Sync {
    /// Derive a title, or `None` when the document lacks this strategy's structure.
    /// Returned titles are trimmed and non-empty.
    fn extract(&self, page: &Page<'_>) -> Option<String>;

    /// Human-readable strategy name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Holds title strategies in priority order.
pub struct TitleChain {
    strategies: Vec<Box<dyn TitleStrategy>>,
}

impl TitleChain {
    /// Create a chain with the built-in strategies (tender, og:title, `<title>`).
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(TenderTitle),
                Box::new(OpenGraphTitle),
                Box::new(DocumentTitle),
            ],
        }
    }

    /// Create a chain from explicit strategies, highest priority first.
    pub fn with_strategies(strategies: Vec<Box<dyn TitleStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the strategies in order and return the first title found.
    pub fn resolve(&self, html: &str) -> Option<String> {
        self.resolve_page(&Page::new(html))
    }

    /// [`TitleChain::resolve`] over a page the caller already holds.
    pub fn resolve_page(&self, page: &Page<'_>) -> Option<String> {
        for strategy in &self.strategies {
            match strategy.extract(page) {
                Some(title) if !title.trim().is_empty() => {
                    debug!(strategy = strategy.name(), %title, "title resolved");
                    return Some(title);
                }
                _ => debug!(strategy = strategy.name(), "no title, falling through"),
            }
        }
        None
    }
}

impl Default for TitleChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TitleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleChain")
            .field("strategies", &self.names())
            .finish()
    }
}
