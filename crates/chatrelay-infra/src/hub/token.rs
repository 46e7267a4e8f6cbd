//! Publisher JWT minting for Mercure hubs.
//!
//! A Mercure hub authorizes publishers with an HS256 JWT whose
//! `mercure.publish` claim lists the topics they may publish to (`*` for
//! any). The relay only ever sends a pre-minted token; this helper exists
//! for operators provisioning one.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Topic selector granting publish rights on every topic.
pub const ALL_TOPICS: &str = "*";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token lifetime of {0:?} is out of range")]
    TtlOutOfRange(Duration),

    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MercureClaim {
    pub publish: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherClaims {
    pub mercure: MercureClaim,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Sign a publisher token for `topics` with the hub's shared secret.
///
/// Without a `ttl` the token never expires.
pub fn mint_publisher_token(
    secret: &SecretString,
    topics: &[String],
    ttl: Option<Duration>,
) -> Result<String, TokenError> {
    let topics = if topics.is_empty() {
        vec![ALL_TOPICS.to_string()]
    } else {
        topics.to_vec()
    };
    let claims = PublisherClaims {
        mercure: MercureClaim { publish: topics },
        exp: ttl.map(expires_at).transpose()?,
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )?;
    Ok(token)
}

fn expires_at(ttl: Duration) -> Result<i64, TokenError> {
    i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| Utc::now().timestamp().checked_add(secs))
        .ok_or(TokenError::TtlOutOfRange(ttl))
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, DecodingKey, Validation};

    use super::*;

    fn decode(token: &str, secret: &str) -> PublisherClaims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        jsonwebtoken::decode::<PublisherClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims
    }

    #[test]
    fn token_grants_requested_topics() {
        let secret = SecretString::from("hub-secret".to_string());
        let token = mint_publisher_token(&secret, &["admin-chat".to_string()], None).unwrap();

        let claims = decode(&token, "hub-secret");
        assert_eq!(claims.mercure.publish, vec!["admin-chat"]);
        assert!(claims.exp.is_none());
    }

    #[test]
    fn token_defaults_to_all_topics_and_honors_ttl() {
        let secret = SecretString::from("hub-secret".to_string());
        let before = Utc::now().timestamp();
        let token = mint_publisher_token(&secret, &[], Some(Duration::from_secs(3600))).unwrap();

        let claims = decode(&token, "hub-secret");
        assert_eq!(claims.mercure.publish, vec![ALL_TOPICS]);
        let exp = claims.exp.unwrap();
        assert!(exp >= before + 3600 && exp <= Utc::now().timestamp() + 3600);
    }

    #[test]
    fn token_rejects_ttl_beyond_timestamp_range() {
        let secret = SecretString::from("hub-secret".to_string());

        let err = mint_publisher_token(&secret, &[], Some(Duration::from_secs(u64::MAX))).unwrap_err();
        assert!(matches!(err, TokenError::TtlOutOfRange(_)));

        let err =
            mint_publisher_token(&secret, &[], Some(Duration::from_secs(i64::MAX as u64))).unwrap_err();
        assert!(matches!(err, TokenError::TtlOutOfRange(_)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let secret = SecretString::from("hub-secret".to_string());
        let token = mint_publisher_token(&secret, &[], None).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        let result = jsonwebtoken::decode::<PublisherClaims>(
            &token,
            &DecodingKey::from_secret(b"wrong-secret"),
            &validation,
        );
        assert!(result.is_err());
    }
}
