// Proxy to the livestream provider. Credentials live in config; the secret
// key doubles as the basic-auth username, per the provider's API.

use serde_json::Value;
use thiserror::Error;

use crate::config::LivestreamConfig;

#[derive(Debug, Error)]
pub enum LivestreamError {
    /// Integration is not configured; clients see 503 with an empty body.
    #[error("livestream integration is not configured")]
    Disabled,

    #[error("livestream upstream request failed: {0}")]
    Upstream(String),
}

/// Fetch the account's event feed from the provider and pass the JSON
/// through untouched.
pub async fn fetch_events(cfg: &LivestreamConfig) -> Result<Value, LivestreamError> {
    let (account_id, secret_key) = match (&cfg.account_id, &cfg.secret_key) {
        (Some(account_id), Some(secret_key)) => (account_id, secret_key),
        _ => return Err(LivestreamError::Disabled),
    };

    let url = format!("{}/accounts/{}/events", cfg.upstream_url, account_id);

    let response = reqwest::Client::new()
        .get(&url)
        .basic_auth(secret_key, None::<&str>)
        .send()
        .await
        .map_err(|e| LivestreamError::Upstream(e.to_string()))?;

    if !response.status().is_success() {
        return Err(LivestreamError::Upstream(format!(
            "upstream returned {}",
            response.status()
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| LivestreamError::Upstream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_report_disabled() {
        let cfg = LivestreamConfig {
            account_id: Some("acct".into()),
            secret_key: None,
            upstream_url: "https://livestreamapis.com/v3".into(),
        };
        assert!(matches!(
            fetch_events(&cfg).await,
            Err(LivestreamError::Disabled)
        ));
    }
}
