//! Portal link detection in free-form chat text.
//!
//! Messages carry links wrapped in sentence punctuation, angle brackets, or
//! markdown. The extractor finds candidates with a tolerant pattern, trims the
//! punctuation the sentence added, and then re-checks every candidate against
//! the allow-list with a real URL parser.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;
use url::Url;

use tenderbot_shared::{CandidateLink, LinkPolicy, Result, TenderBotError};

/// Characters that end a sentence or a wrapper, never a portal URL.
const TRAILING_PUNCTUATION: &[char] = &[')', '>', ']', ',', '.', ';', ':', '!', '?'];

/// Finds allow-listed links in message text.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    policy: LinkPolicy,
    pattern: Regex,
}

impl LinkExtractor {
    /// Build an extractor for the given allow-list.
    pub fn new(policy: LinkPolicy) -> Result<Self> {
        let pattern = format!(
            r"(?i)https?://(?:www\.)?{host}(?::\d+)?{prefix}[^\s<>)]*",
            host = regex::escape(&policy.allowed_host),
            prefix = regex::escape(&policy.allowed_path_prefix),
        );
        let pattern = Regex::new(&pattern).map_err(|e| {
            TenderBotError::validation(format!("invalid link allow-list: {e}"))
        })?;

        Ok(Self { policy, pattern })
    }

    /// The allow-list this extractor enforces.
    pub fn policy(&self) -> &LinkPolicy {
        &self.policy
    }

    /// Extract up to `max_links` distinct candidate links, in first-seen order.
    pub fn extract(&self, text: &str) -> Vec<CandidateLink> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for m in self.pattern.find_iter(text) {
            let raw = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            let Some(link) = self.accept(raw) else {
                debug!(candidate = raw, "rejected by allow-list");
                continue;
            };
            if seen.insert(link.as_str().to_string()) {
                links.push(link);
            }
            if links.len() >= self.policy.max_links {
                break;
            }
        }

        links
    }

    /// Parse a raw match and check it against the allow-list.
    fn accept(&self, raw: &str) -> Option<CandidateLink> {
        let url = Url::parse(raw).ok()?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return None;
        }

        let host = url.host_str()?.to_lowercase();
        if host != self.policy.allowed_host {
            return None;
        }

        if !url
            .path()
            .to_lowercase()
            .starts_with(&self.policy.allowed_path_prefix)
        {
            return None;
        }

        Some(CandidateLink::new(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new(LinkPolicy::default()).unwrap()
    }

    fn urls(text: &str) -> Vec<String> {
        extractor()
            .extract(text)
            .into_iter()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn finds_link_in_sentence() {
        let found = urls(
            "請看 https://web.pcc.gov.tw/tps/QueryTender/query/searchTenderDetail?pkPmsMain=abc 謝謝",
        );
        assert_eq!(
            found,
            vec!["https://web.pcc.gov.tw/tps/QueryTender/query/searchTenderDetail?pkPmsMain=abc"]
        );
    }

    #[test]
    fn strips_trailing_punctuation() {
        let found = urls("see (https://web.pcc.gov.tw/tps/a?x=1). and <https://web.pcc.gov.tw/tps/b>!");
        assert_eq!(
            found,
            vec!["https://web.pcc.gov.tw/tps/a?x=1", "https://web.pcc.gov.tw/tps/b"]
        );
    }

    #[test]
    fn dedupes_across_punctuation_variants() {
        let found = urls(
            "https://web.pcc.gov.tw/tps/a, https://web.pcc.gov.tw/tps/a. https://web.pcc.gov.tw/tps/a?!",
        );
        assert_eq!(found, vec!["https://web.pcc.gov.tw/tps/a"]);
    }

    #[test]
    fn caps_at_five_links() {
        let text = (0..8)
            .map(|i| format!("https://web.pcc.gov.tw/tps/t{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let found = urls(&text);
        assert_eq!(found.len(), 5);
        assert_eq!(found[0], "https://web.pcc.gov.tw/tps/t0");
        assert_eq!(found[4], "https://web.pcc.gov.tw/tps/t4");
    }

    #[test]
    fn rejects_other_paths_and_hosts() {
        assert!(urls("https://web.pcc.gov.tw/pis/some/path").is_empty());
        assert!(urls("https://example.com/tps/x").is_empty());
        // The pattern tolerates www., but the host must still match exactly.
        assert!(urls("https://www.web.pcc.gov.tw/tps/x").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let found = urls("HTTPS://WEB.PCC.GOV.TW/TPS/Detail");
        assert_eq!(found, vec!["https://web.pcc.gov.tw/TPS/Detail"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(urls("").is_empty());
        assert!(urls("no links here, just 機關名稱 and words").is_empty());
    }

    #[test]
    fn every_result_satisfies_policy() {
        let text = "x https://web.pcc.gov.tw/tps/1) https://web.pcc.gov.tw/tpsfoo \
                    http://web.pcc.gov.tw/tps/2]; https://web.pcc.gov.tw/prkms/3 \
                    https://web.pcc.gov.tw/tps/1 https://web.pcc.gov.tw/tps/4:";
        let extractor = extractor();
        let policy = extractor.policy();
        let links = extractor.extract(text);
        assert!(links.len() <= policy.max_links);
        for link in &links {
            let url = link.url();
            assert!(matches!(url.scheme(), "http" | "https"));
            assert_eq!(url.host_str(), Some(policy.allowed_host.as_str()));
            assert!(url.path().to_lowercase().starts_with(&policy.allowed_path_prefix));
        }
        let unique: HashSet<_> = links.iter().map(|l| l.as_str()).collect();
        assert_eq!(unique.len(), links.len());
    }

    #[test]
    fn custom_policy_with_port() {
        let policy = LinkPolicy {
            allowed_host: "127.0.0.1".into(),
            allowed_path_prefix: "/tps".into(),
            max_links: 2,
        };
        let links = LinkExtractor::new(policy)
            .unwrap()
            .extract("http://127.0.0.1:8080/tps/detail?id=1");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url().port(), Some(8080));
    }
}
