//! Bearer token retrieval from the local secret service.
//!
//! One `GET` per live request. The token is never cached and never logged;
//! it lives on the stack of the request that fetched it.

use std::time::Duration;

use crate::config::SecretConfig;
use crate::error::{ClientBuildError, RelayError, RelayResult};
use crate::observability::metrics;

/// Opaque broker credential.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Client for the secret service.
#[derive(Clone)]
pub struct CredentialFetcher {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl CredentialFetcher {
    pub fn new(config: &SecretConfig) -> Result<Self, ClientBuildError> {
        // The secret service is local; never route it through an env proxy.
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .no_proxy()
            .build()
            .map_err(|source| ClientBuildError::Http {
                target: "secret",
                source,
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch a fresh token.
    pub async fn fetch(&self) -> RelayResult<BearerToken> {
        let result = self.fetch_inner().await;
        metrics::record_upstream_call(
            "secret",
            if result.is_ok() { "ok" } else { "error" },
        );
        result
    }

    async fn fetch_inner(&self) -> RelayResult<BearerToken> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RelayError::CredentialService(format!(
                        "timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    RelayError::CredentialService(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::CredentialService(format!(
                "secret service returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RelayError::CredentialService(e.to_string()))?;

        let token = unquote_token(&body);
        if token.is_empty() {
            return Err(RelayError::CredentialService(
                "secret service returned an empty token".to_string(),
            ));
        }

        tracing::debug!(url = %self.url, "Bearer token fetched");
        Ok(BearerToken::new(token))
    }
}

/// Accepts both a bare token and a JSON-encoded string.
pub fn unquote_token(raw: &str) -> &str {
    let token = raw.trim();
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        &token[1..token.len() - 1]
    } else {
        token
    }
}
