use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use mygram_types::Id;
use mygram_types::api::Claims;

/// Default lifetime of an access token.
pub const DEFAULT_TTL_HOURS: i64 = 72;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token could not be signed")]
    Signing,
}

/// Issues and validates stateless HS256 access tokens.
///
/// The secret is handed in once at startup; nothing here reads the
/// environment.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TTL_HOURS))
    }

    pub fn issue(&self, user_id: Id) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: Id, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    pub fn validate(&self, token: &str) -> Result<Id, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Check the signature, then the expiry against `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Id, TokenError> {
        // Expiry is checked below against the caller's clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> TokenService {
        TokenService::with_default_ttl("test-secret")
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn issue_then_validate_returns_user_id() {
        let tokens = service();
        let token = tokens.issue(42).unwrap();
        assert!(!token.is_empty());
        assert_eq!(tokens.validate(&token).unwrap(), 42);
    }

    #[test]
    fn valid_after_one_hour_expired_after_seventy_three() {
        let tokens = service();
        let t = issued_at();
        let token = tokens.issue_at(7, t).unwrap();

        assert_eq!(tokens.validate_at(&token, t + Duration::hours(1)).unwrap(), 7);
        assert!(matches!(
            tokens.validate_at(&token, t + Duration::hours(73)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let tokens = service();
        let t = issued_at();
        let token = tokens.issue_at(7, t).unwrap();

        let just_before = t + Duration::hours(DEFAULT_TTL_HOURS) - Duration::seconds(1);
        assert!(tokens.validate_at(&token, just_before).is_ok());
        assert!(matches!(
            tokens.validate_at(&token, t + Duration::hours(DEFAULT_TTL_HOURS)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = TokenService::with_default_ttl("someone-else").issue(1).unwrap();
        assert!(matches!(
            service().validate(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tokens = service();
        let mine = tokens.issue(1).unwrap();
        let theirs = tokens.issue(2).unwrap();

        // Splice user 2's payload onto user 1's signature.
        let mine: Vec<&str> = mine.split('.').collect();
        let theirs: Vec<&str> = theirs.split('.').collect();
        let forged = format!("{}.{}.{}", mine[0], theirs[1], mine[2]);

        assert!(matches!(
            tokens.validate(&forged),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            service().validate("not.a.token"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(service().validate(""), Err(TokenError::Malformed)));
    }
}
