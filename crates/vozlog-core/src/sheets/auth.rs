//! Service-account OAuth: the JWT-bearer flow.
//!
//! The service account signs an RS256 assertion with its private key and
//! trades it at the token endpoint for a short-lived access token. No user
//! interaction, no refresh tokens, no caching: one token per pipeline run.

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::ServiceAccountKey;

/// Scopes requested for the access token. Drive is included alongside
/// Sheets to match what the spreadsheet backend grants the account.
const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime. Google caps it at one hour.
const ASSERTION_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

fn build_claims(key: &ServiceAccountKey, issued_at: i64) -> Claims {
    Claims {
        iss: key.client_email.clone(),
        scope: SCOPES.to_string(),
        aud: key.token_uri.clone(),
        iat: issued_at,
        exp: issued_at + ASSERTION_TTL_SECS,
    }
}

/// Sign the JWT assertion with the account's RSA private key.
fn sign_assertion(key: &ServiceAccountKey) -> Result<String> {
    let claims = build_claims(key, chrono::Utc::now().timestamp());

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(key.private_key_id.clone());

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .context("Service account private key is not a valid RSA PEM")?;

    jsonwebtoken::encode(&header, &claims, &encoding_key)
        .context("Failed to sign the OAuth assertion")
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange a signed assertion for an access token at the key's token URI.
pub(crate) async fn fetch_access_token(
    client: &reqwest::Client,
    key: &ServiceAccountKey,
) -> Result<String> {
    let assertion = sign_assertion(key)?;

    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
        .send()
        .await
        .context("Failed to reach the OAuth token endpoint")?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        anyhow::bail!("Spreadsheet authentication failed ({status}): {message}");
    }

    let token: TokenResponse = response
        .json()
        .await
        .context("Failed to parse the OAuth token response")?;
    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::tests::SAMPLE_KEY;

    #[test]
    fn claims_carry_the_account_identity_and_token_audience() {
        let key = ServiceAccountKey::from_json(SAMPLE_KEY).unwrap();
        let claims = build_claims(&key, 1_700_000_000);
        assert_eq!(claims.iss, key.client_email);
        assert_eq!(claims.aud, key.token_uri);
        assert_eq!(claims.exp - claims.iat, ASSERTION_TTL_SECS);
        assert!(claims.scope.contains("auth/spreadsheets"));
        assert!(claims.scope.contains("auth/drive"));
    }

    #[test]
    fn signing_rejects_a_malformed_private_key() {
        // SAMPLE_KEY holds a placeholder PEM body, not a real RSA key.
        let key = ServiceAccountKey::from_json(SAMPLE_KEY).unwrap();
        let err = sign_assertion(&key).unwrap_err();
        assert!(err.to_string().contains("private key"));
    }

    #[test]
    fn parses_an_access_token_response() {
        let body = r#"{"access_token": "ya29.token", "expires_in": 3599, "token_type": "Bearer"}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token, "ya29.token");
    }
}
