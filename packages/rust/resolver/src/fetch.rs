//! The network fetch boundary.
//!
//! [`PageFetcher`] is the seam between title resolution and HTTP; the
//! production implementation is [`HttpFetcher`] (reqwest).

use std::future::Future;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use tracing::debug;
use url::Url;

use tenderbot_shared::{FetchConfig, FetchResult, Result, TenderBotError};

/// Maximum number of HTTP-level redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Fetches a page body.
///
/// Transport failures are errors; a response that arrives with a non-2xx
/// status is `Ok(FetchResult { ok: false, .. })`.
pub trait PageFetcher: Send + Sync {
    /// GET `url`, sending `referer` as the `Referer` header.
    fn fetch(&self, url: &Url, referer: &str) -> impl Future<Output = Result<FetchResult>> + Send;
}

/// reqwest-backed fetcher with the portal's expected header set.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the configured User-Agent, Accept, and
    /// Accept-Language headers and request timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value("accept", &config.accept)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("accept_language", &config.accept_language)?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| TenderBotError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, referer: &str) -> Result<FetchResult> {
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .header(REFERER, referer)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "non-success response");
            return Ok(FetchResult::failure());
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(url, e))?;

        Ok(FetchResult::success(body))
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| TenderBotError::config(format!("fetch.{name} is not a valid header value: {e}")))
}

fn transport_error(url: &Url, err: reqwest::Error) -> TenderBotError {
    if err.is_timeout() {
        TenderBotError::timeout(url.as_str())
    } else {
        TenderBotError::Network(format!("{url}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn page_url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{p}", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn sends_portal_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tps/detail"))
            .and(header("referer", "https://web.pcc.gov.tw/tps/"))
            .and(header(
                "user-agent",
                "Mozilla/5.0 (compatible; SummaryBot/1.0; +https://discord.com)",
            ))
            .and(header_exists("accept"))
            .and(header_exists("accept-language"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let result = fetcher
            .fetch(&page_url(&server, "/tps/detail"), "https://web.pcc.gov.tw/tps/")
            .await
            .unwrap();

        assert_eq!(result, FetchResult::success("<p>ok</p>"));
    }

    #[tokio::test]
    async fn non_success_status_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let result = fetcher
            .fetch(&page_url(&server, "/tps/x"), "https://web.pcc.gov.tw/tps/")
            .await
            .unwrap();

        assert_eq!(result, FetchResult::failure());
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(800)),
            )
            .mount(&server)
            .await;

        let config = FetchConfig {
            timeout: Duration::from_millis(100),
            ..FetchConfig::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let err = fetcher
            .fetch(&page_url(&server, "/tps/slow"), "https://web.pcc.gov.tw/tps/")
            .await
            .unwrap_err();

        assert!(matches!(err, TenderBotError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // Nothing listens on port 1.
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let url = Url::parse("http://127.0.0.1:1/tps/gone").unwrap();
        let err = fetcher.fetch(&url, "https://web.pcc.gov.tw/tps/").await.unwrap_err();

        assert!(matches!(err, TenderBotError::Network(_)), "got {err:?}");
    }

    #[test]
    fn rejects_invalid_header_config() {
        let config = FetchConfig {
            accept_language: "zh\nTW".into(),
            ..FetchConfig::default()
        };
        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(err.to_string().contains("accept_language"));
    }
}
