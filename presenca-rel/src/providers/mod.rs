//! Source data providers
//!
//! One module per legislative house: raw record shapes (as the source
//! publishes them), a provider trait the adapter orchestrates against,
//! and a reqwest-backed implementation. The traits are the seam tests
//! use to inject in-memory fakes.
//!
//! Transport policy: a single fixed backoff-and-retry on HTTP 429,
//! nothing else. Retrying harder failures is not this layer's job;
//! they surface as [`ProviderError`] and abort the report.

pub mod alesp;
pub mod camara;
pub mod cmsp;

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Fixed backoff before the single 429 retry
const BACKOFF_429_MS: u64 = 2000;

/// Transport/decoding errors raised by provider clients
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// GET a JSON document, with the 429 backoff-and-retry policy
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, ProviderError> {
    let corpo = get_text(client, url).await?;
    serde_json::from_str(&corpo).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// GET a raw document (the ALESP repository serves XML), with the 429
/// backoff-and-retry policy
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, ProviderError> {
    let mut repetida = false;

    loop {
        tracing::debug!(url = %url, "Querying provider");

        let resposta = client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resposta.status();

        if status.as_u16() == 429 && !repetida {
            repetida = true;
            tracing::debug!(url = %url, "Rate limited, backing off {}ms", BACKOFF_429_MS);
            tokio::time::sleep(Duration::from_millis(BACKOFF_429_MS)).await;
            continue;
        }

        if !status.is_success() {
            let corpo = resposta.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), corpo));
        }

        return resposta
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()));
    }
}

/// Build the shared HTTP client for provider calls
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent("presenca/0.1.0")
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::Network(e.to_string()))
}
