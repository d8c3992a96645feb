use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use chirpy_types::api::Claims;

use crate::error::{ApiError, Result};

pub const ISSUER: &str = "chirpy";

/// The only algorithm accepted on either side.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Issue a signed access token for `user_id`, valid for `ttl_seconds`.
pub fn issue_access_token(secret: &str, user_id: u64, ttl_seconds: i64) -> Result<String> {
    issue_access_token_at(secret, user_id, ttl_seconds, Utc::now())
}

pub(crate) fn issue_access_token_at(
    secret: &str,
    user_id: u64,
    ttl_seconds: i64,
    issued_at: DateTime<Utc>,
) -> Result<String> {
    let expires_at = Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| issued_at.checked_add_signed(ttl))
        .ok_or_else(|| ApiError::Internal(anyhow!("access token ttl out of range: {}s", ttl_seconds)))?;

    let claims = Claims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(token)
}

/// Validate signature, algorithm, issuer and expiry; return the subject id.
pub fn validate_access_token(token: &str, secret: &str) -> Result<u64> {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| {
            debug!("Access token rejected: {}", e);
            ApiError::InvalidToken
        })?;

    data.claims.sub.parse().map_err(|_| ApiError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_signing_key_32_bytes_long!!";

    #[test]
    fn issue_then_validate() {
        let token = issue_access_token(SECRET, 42, 3600).unwrap();
        assert_eq!(validate_access_token(&token, SECRET).unwrap(), 42);
    }

    #[test]
    fn claims_carry_issuer_and_window() {
        let issued_at = Utc::now();
        let token = issue_access_token_at(SECRET, 7, 60, issued_at).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        let data = decode::<Claims>(&token, &DecodingKey::from_secret(SECRET.as_bytes()), &validation)
            .unwrap();

        assert_eq!(data.header.alg, Algorithm::HS256);
        assert_eq!(data.claims.iss, "chirpy");
        assert_eq!(data.claims.sub, "7");
        assert_eq!(data.claims.exp - data.claims.iat, 60);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = issue_access_token(SECRET, 1, 3600).unwrap();
        assert!(matches!(
            validate_access_token(&token, "another-secret"),
            Err(ApiError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_fails() {
        let issued_at = Utc::now() - Duration::seconds(120);
        let token = issue_access_token_at(SECRET, 1, 60, issued_at).unwrap();
        assert!(matches!(validate_access_token(&token, SECRET), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn other_hmac_algorithm_fails() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: ISSUER.into(),
            sub: "1".into(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(validate_access_token(&token, SECRET), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn unsigned_token_fails() {
        // {"alg":"none","typ":"JWT"} . {"iss":"chirpy","sub":"1","iat":1,"exp":99999999999} .
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                     eyJpc3MiOiJjaGlycHkiLCJzdWIiOiIxIiwiaWF0IjoxLCJleHAiOjk5OTk5OTk5OTk5fQ.";
        assert!(matches!(validate_access_token(token, SECRET), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn foreign_issuer_fails() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: "someone-else".into(),
            sub: "1".into(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(validate_access_token(&token, SECRET), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn out_of_range_ttl_is_an_error() {
        assert!(matches!(issue_access_token(SECRET, 1, i64::MAX), Err(ApiError::Internal(_))));
        assert!(matches!(
            issue_access_token(SECRET, 1, 100_000_000_000_000),
            Err(ApiError::Internal(_))
        ));
    }

    #[test]
    fn garbage_fails() {
        assert!(matches!(validate_access_token("not.a.jwt", SECRET), Err(ApiError::InvalidToken)));
        assert!(matches!(validate_access_token("", SECRET), Err(ApiError::InvalidToken)));
    }
}
