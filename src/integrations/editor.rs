// Token issuance for the hosted rich-text editor service. The editor
// authenticates our users against its own API with a short JWT signed by a
// shared secret; the issuer claim identifies our environment.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EditorConfig;

#[derive(Debug, Error)]
pub enum EditorTokenError {
    /// Integration is not configured. Surfaced to clients as 503 with an
    /// empty body, distinguishing "disabled" from "broken".
    #[error("editor integration is not configured")]
    Disabled,

    #[error("editor token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EditorClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
}

/// Sign an editor token for the given subject. Requires both the shared
/// secret and the environment identifier; anything less is `Disabled`.
pub fn issue_token(cfg: &EditorConfig, subject: &str) -> Result<String, EditorTokenError> {
    let (secret, environment_id) = match (&cfg.shared_secret, &cfg.environment_id) {
        (Some(secret), Some(env_id)) => (secret, env_id),
        _ => return Err(EditorTokenError::Disabled),
    };

    let claims = EditorClaims {
        iss: environment_id.clone(),
        sub: subject.to_string(),
        iat: Utc::now().timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| EditorTokenError::Signing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn configured() -> EditorConfig {
        EditorConfig {
            shared_secret: Some("editor-secret".into()),
            environment_id: Some("atrium-prod".into()),
        }
    }

    #[test]
    fn issues_decodable_token_with_environment_issuer() {
        let token = issue_token(&configured(), "alice").expect("token");

        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["iss"]);
        validation.set_issuer(&["atrium-prod"]);
        let decoded = decode::<EditorClaims>(
            &token,
            &DecodingKey::from_secret(b"editor-secret"),
            &validation,
        )
        .expect("decode");

        assert_eq!(decoded.claims.iss, "atrium-prod");
        assert_eq!(decoded.claims.sub, "alice");
        assert!(decoded.claims.iat <= Utc::now().timestamp());
    }

    #[test]
    fn missing_config_is_disabled_in_every_combination() {
        let combos = [
            (None, None),
            (Some("s".to_string()), None),
            (None, Some("e".to_string())),
        ];
        for (shared_secret, environment_id) in combos {
            let cfg = EditorConfig {
                shared_secret,
                environment_id,
            };
            assert!(matches!(
                issue_token(&cfg, "alice"),
                Err(EditorTokenError::Disabled)
            ));
        }
    }
}
