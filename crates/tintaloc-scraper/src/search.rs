//! Candidate discovery against a search engine's results page.
//!
//! There is no API key or structured endpoint involved: the client requests
//! the plain HTML results page and scrapes result URLs out of it. Returned
//! URLs carry no relevance or liveness guarantee — downstream stages must
//! tolerate dead links, timeouts, and non-HTML content.

use std::time::Duration;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::{Client, Url};

use crate::error::DiscoveryError;

const DEFAULT_BASE_URL: &str = "https://www.google.com/";

/// Hosts that belong to the search engine itself and must never be returned
/// as candidates.
const INTERNAL_HOST_MARKERS: [&str; 4] = ["google.", "gstatic.", "googleusercontent.", "webcache."];

/// Client for a general-purpose web search, scraped from the results page.
///
/// Use [`SearchClient::new`] for production or [`SearchClient::with_base_url`]
/// to point at a mock server in tests.
pub struct SearchClient {
    client: Client,
    base_url: Url,
}

impl SearchClient {
    /// Creates a client pointed at the production search engine.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, DiscoveryError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DiscoveryError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, DiscoveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DiscoveryError::InvalidBaseUrl {
            base_url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Runs one search phrase and returns up to `max_results` candidate URLs,
    /// in result order, de-duplicated. `locale` biases results toward a
    /// language/region (sent as the `hl` parameter).
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::Http`] on network failure.
    /// - [`DiscoveryError::UnexpectedStatus`] on a non-2xx response.
    pub async fn search(
        &self,
        phrase: &str,
        max_results: usize,
        locale: &str,
    ) -> Result<Vec<String>, DiscoveryError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| DiscoveryError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("q", phrase)
            .append_pair("hl", locale)
            .append_pair("num", &max_results.to_string());

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(extract_result_urls(&body, max_results))
    }
}

/// Scrapes candidate URLs out of a results page.
///
/// Handles both the `/url?q=<encoded>` redirect form and plain absolute
/// hrefs, skipping the engine's own hosts. First occurrence wins; the list
/// is truncated to `max_results`.
pub(crate) fn extract_result_urls(html: &str, max_results: usize) -> Vec<String> {
    let redirect_re =
        Regex::new(r#"href="/url\?q=([^&"]+)"#).expect("valid regex");
    let absolute_re = Regex::new(r#"<a[^>]+href="(https?://[^"]+)""#).expect("valid regex");

    let mut urls: Vec<String> = Vec::new();

    for caps in redirect_re.captures_iter(html) {
        if let Some(m) = caps.get(1) {
            if let Ok(decoded) = percent_decode_str(m.as_str()).decode_utf8() {
                push_candidate(&mut urls, decoded.into_owned());
            }
        }
    }

    for caps in absolute_re.captures_iter(html) {
        if let Some(m) = caps.get(1) {
            push_candidate(&mut urls, m.as_str().to_owned());
        }
    }

    urls.truncate(max_results);
    urls
}

fn push_candidate(urls: &mut Vec<String>, candidate: String) {
    if !candidate.starts_with("http") {
        return;
    }
    let host = candidate
        .split("//")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("");
    if INTERNAL_HOST_MARKERS.iter().any(|m| host.contains(m)) {
        return;
    }
    if !urls.contains(&candidate) {
        urls.push(candidate);
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
