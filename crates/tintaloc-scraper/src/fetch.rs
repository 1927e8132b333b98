//! Candidate-page fetching.

use crate::error::DiscoveryError;

/// Fetches a candidate page's body. The client's configured timeout bounds
/// the whole request; a non-2xx response is an error so the caller can drop
/// the candidate.
pub(crate) async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, DiscoveryError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DiscoveryError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }
    Ok(response.text().await?)
}
