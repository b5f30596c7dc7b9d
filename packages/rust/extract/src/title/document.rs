//! `<title>` fallback.

use std::sync::LazyLock;

use scraper::Selector;

use super::{Page, TitleStrategy};

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector"));

/// Uses the document `<title>` when its text sits on a single line.
pub struct DocumentTitle;

impl TitleStrategy for DocumentTitle {
    fn extract(&self, page: &Page<'_>) -> Option<String> {
        let text: String = page.document().select(&TITLE_SEL).next()?.text().collect();
        let title = text.trim();

        // Multi-line titles are layout noise on the portal, not a usable heading.
        if title.is_empty() || title.contains(['\n', '\r']) {
            return None;
        }
        Some(title.to_string())
    }

    fn name(&self) -> &str {
        "document-title"
    }
}
