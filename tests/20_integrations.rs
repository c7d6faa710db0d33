mod common;

use anyhow::Result;
use reqwest::StatusCode;

// These tests run against the default development configuration, where the
// editor, livestream, and SAML integrations are all unconfigured.

#[tokio::test]
async fn livestream_is_503_with_empty_body_when_unconfigured() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/livestream", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(res.text().await?.is_empty(), "disabled feature must not carry a body");
    Ok(())
}

#[tokio::test]
async fn saml_metadata_is_404_when_disabled() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/saml/metadata", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
