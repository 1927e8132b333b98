//! HTTP client for the ViaCEP postal-code lookup service.
//!
//! Wraps `reqwest` with ViaCEP-specific error handling. The service answers
//! `GET /ws/{cep}/json/` with locality data, or a body carrying an `"erro"`
//! marker when the CEP does not exist.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::GeoError;

const DEFAULT_BASE_URL: &str = "https://viacep.com.br/";

/// Locality record returned by a successful CEP lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct CepRecord {
    /// City name (`localidade` in the ViaCEP payload).
    #[serde(default)]
    pub localidade: Option<String>,
    /// Two-letter state code (`uf`).
    #[serde(default)]
    pub uf: Option<String>,
}

/// Raw ViaCEP response envelope. A present `erro` field means "CEP not found".
#[derive(Debug, Deserialize)]
struct CepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

/// Client for the ViaCEP REST API.
///
/// Use [`CepClient::new`] for production or [`CepClient::with_base_url`] to
/// point at a mock server in tests.
pub struct CepClient {
    client: Client,
    base_url: Url,
}

impl CepClient {
    /// Creates a new client pointed at the production ViaCEP API.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GeoError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`GeoError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so Url::join keeps the path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeoError::InvalidBaseUrl {
            base_url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Looks up a CEP and returns its locality record, or `None` when the
    /// service reports the CEP as unknown.
    ///
    /// Non-digit characters are stripped from `cep` before the call, so
    /// `"01310-100"` and `"01310100"` are equivalent.
    ///
    /// # Errors
    ///
    /// - [`GeoError::Http`] on network failure.
    /// - [`GeoError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeoError::Deserialize`] if the body is not the expected JSON shape.
    pub async fn lookup(&self, cep: &str) -> Result<Option<CepRecord>, GeoError> {
        let digits: String = cep.chars().filter(char::is_ascii_digit).collect();
        let url = self
            .base_url
            .join(&format!("ws/{digits}/json/"))
            .map_err(|e| GeoError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: CepResponse =
            serde_json::from_str(&body).map_err(|e| GeoError::Deserialize {
                context: format!("CEP lookup for {digits}"),
                source: e,
            })?;

        if parsed.erro.is_some() {
            return Ok(None);
        }

        Ok(Some(CepRecord {
            localidade: parsed.localidade,
            uf: parsed.uf,
        }))
    }
}
