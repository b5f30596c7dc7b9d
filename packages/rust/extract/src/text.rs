//! Cleanup passes for text captured out of HTML.
//!
//! Each pass is a function `&str -> String`. [`clean_text`] runs entity
//! decoding and whitespace normalization in sequence.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Run the full cleanup on text that has already had its tags stripped.
pub fn clean_text(input: &str) -> String {
    collapse_whitespace(&decode_entities(input))
}

/// Replace every tag with a single space so adjacent cell text stays separated.
pub fn strip_tags(input: &str) -> String {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

    TAG_RE.replace_all(input, " ").into_owned()
}

/// Decode the five entities the portal emits.
///
/// Decoding is a single pass, so `&amp;lt;` becomes `&lt;` rather than `<`.
pub fn decode_entities(input: &str) -> String {
    static ENTITY_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"&(?:amp|lt|gt|quot|#39);").expect("valid regex"));

    ENTITY_RE
        .replace_all(input, |caps: &Captures<'_>| match &caps[0] {
            "&amp;" => "&",
            "&lt;" => "<",
            "&gt;" => ">",
            "&quot;" => "\"",
            _ => "'",
        })
        .into_owned()
}

/// Collapse whitespace runs (including NBSP and the ideographic space) to one
/// ASCII space and trim both ends.
pub fn collapse_whitespace(input: &str) -> String {
    static WS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[\s\u{00A0}\u{3000}]+").expect("valid regex"));

    WS_RE.replace_all(input, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nested_tags() {
        let out = strip_tags("<span><b>高雄</b>市</span>");
        assert_eq!(collapse_whitespace(&out), "高雄 市");
    }

    #[test]
    fn decodes_common_entities() {
        assert_eq!(
            decode_entities("A &amp; B &lt;x&gt; &quot;q&quot; it&#39;s"),
            "A & B <x> \"q\" it's"
        );
    }

    #[test]
    fn leaves_unknown_entities_alone() {
        assert_eq!(decode_entities("&nbsp;&copy;"), "&nbsp;&copy;");
    }

    #[test]
    fn collapses_unicode_spaces() {
        assert_eq!(collapse_whitespace("\u{3000} 標案\u{00A0}\u{00A0}名稱 \n\t"), "標案 名稱");
    }

    #[test]
    fn clean_text_is_idempotent() {
        let inputs = [
            "  臺北市政府 &amp; 工務局\u{3000}\n",
            "114學年度\u{00A0}六年級 &quot;專題&quot;",
            "plain",
            "",
        ];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "input: {input:?}");
        }
    }
}
