// ABOUTME: Blocking HTTP client for the catalog scraper with base-URL resolution.
// ABOUTME: Provides get() returning a FetchResult and get_html() parse-on-response convenience.

use bytes::Bytes;
use scraper::Html;
use tracing::debug;
use url::Url;

use crate::error::ScrapeError;
use crate::options::{ClientBuilder, Options};

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using the charset hint from the content-type
    /// header when present and charset detection otherwise.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    // No usable charset declared. The site has historically served both
    // utf-8 and windows-1251, so detect instead of assuming.
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Blocking scraper client bound to a single site.
///
/// Holds one `reqwest` client configured once with the user agent and
/// timeout; every operation is a single synchronous GET.
pub struct Client {
    opts: Options,
    http: reqwest::blocking::Client,
    base: Url,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, ScrapeError> {
        let base = Url::parse(&opts.base_url).map_err(|e| {
            ScrapeError::invalid_url(
                &opts.base_url,
                "NewClient",
                Some(anyhow::anyhow!("invalid base URL: {}", e)),
            )
        })?;

        let http = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::blocking::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        Ok(Self { opts, http, base })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a path against the base URL.
    ///
    /// Absolute URLs are used as-is; anything else is joined onto the base.
    pub fn absolute(&self, path: &str) -> Result<Url, ScrapeError> {
        if let Ok(url) = Url::parse(path) {
            return Ok(url);
        }
        self.base.join(path).map_err(|e| {
            ScrapeError::invalid_url(path, "Resolve", Some(anyhow::anyhow!("join failed: {}", e)))
        })
    }

    /// Fetch a resource with a single GET request.
    ///
    /// The static header set is applied to every request. Transport errors
    /// and non-2xx statuses surface as Fetch errors; there is no retry.
    pub fn get(&self, path: &str) -> Result<FetchResult, ScrapeError> {
        let url = self.absolute(path)?;

        let mut request = self.http.get(url.clone());
        for (key, value) in &self.opts.headers {
            request = request.header(key, value);
        }

        let response = request.send().map_err(|e| {
            ScrapeError::fetch(
                url.as_str(),
                "Get",
                Some(anyhow::anyhow!("request failed: {}", e)),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::fetch(
                url.as_str(),
                "Get",
                Some(anyhow::anyhow!("unexpected status {}", status)),
            ));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = response.bytes().map_err(|e| {
            ScrapeError::fetch(
                url.as_str(),
                "Get",
                Some(anyhow::anyhow!("failed to read body: {}", e)),
            )
        })?;

        debug!(
            url = %url,
            status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or("-"),
            bytes = body.len(),
            "fetched"
        );

        Ok(FetchResult {
            status: status.as_u16(),
            url: url.to_string(),
            final_url,
            content_type,
            body,
        })
    }

    /// Fetch a resource and parse the body as an HTML document.
    pub fn get_html(&self, path: &str) -> Result<Html, ScrapeError> {
        let result = self.get(path)?;
        Ok(Html::parse_document(&result.text()))
    }
}
