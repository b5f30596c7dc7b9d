//! Core domain types shared by the extractor, resolver, and message handler.

use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// CandidateLink
// ---------------------------------------------------------------------------

/// A normalized absolute URL that passed the portal allow-list.
///
/// Only the link extractor constructs these, so holders can rely on the
/// scheme being http/https and the host/path matching the active policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateLink(Url);

impl CandidateLink {
    /// Wrap an already-validated URL.
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    /// The underlying parsed URL.
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// The serialized URL.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CandidateLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

// ---------------------------------------------------------------------------
// FetchResult
// ---------------------------------------------------------------------------

/// Outcome of a single HTTP fetch that reached the server.
///
/// Transport failures are reported as errors instead; this type only
/// distinguishes a successful (2xx) response from any other status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Whether the response status was 2xx.
    pub ok: bool,
    /// Response body, present only when `ok`.
    pub body: Option<String>,
}

impl FetchResult {
    /// A successful response carrying `body`.
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            ok: true,
            body: Some(body.into()),
        }
    }

    /// A non-2xx response.
    pub fn failure() -> Self {
        Self {
            ok: false,
            body: None,
        }
    }

    /// The body if the fetch succeeded.
    pub fn into_body(self) -> Option<String> {
        if self.ok { self.body } else { None }
    }
}

// ---------------------------------------------------------------------------
// Display units and replies
// ---------------------------------------------------------------------------

/// A resolved (title, URL) pair rendered as one entry of the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUnit {
    /// Display title, already truncated for the platform.
    pub title: String,
    /// The originating link.
    pub url: String,
}

impl From<DisplayUnit> for Embed {
    fn from(unit: DisplayUnit) -> Self {
        Self {
            title: unit.title,
            url: unit.url,
        }
    }
}

/// A rich embed as delivered to the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Embed title (clickable).
    pub title: String,
    /// Target URL of the title.
    pub url: String,
}

/// An outgoing reply to the message that triggered the handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    /// Plain text content.
    Text(String),
    /// One or more embeds.
    Embeds(Vec<Embed>),
}

/// An inbound chat message as dispatched by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Whether the author is a bot account (including ourselves).
    pub author_is_bot: bool,
    /// Raw message content.
    pub content: String,
}

impl IncomingMessage {
    /// A message written by a human user.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            author_is_bot: false,
            content: content.into(),
        }
    }

    /// A message written by a bot account.
    pub fn from_bot(content: impl Into<String>) -> Self {
        Self {
            author_is_bot: true,
            content: content.into(),
        }
    }
}
