//! `<meta property="og:title">` fallback.

use std::sync::LazyLock;

use scraper::Selector;

use super::{Page, TitleStrategy};

static OG_TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:title"]"#).expect("og:title selector")
});

/// Uses the Open Graph title; the parser decodes entities in attribute values.
pub struct OpenGraphTitle;

impl TitleStrategy for OpenGraphTitle {
    fn extract(&self, page: &Page<'_>) -> Option<String> {
        page.document()
            .select(&OG_TITLE_SEL)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
            .map(String::from)
    }

    fn name(&self) -> &str {
        "og:title"
    }
}
