use thiserror::Error;

use mygram_crypto::{CredentialError, TokenError};
use mygram_db::DbError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("insufficient privileges")]
    Forbidden,
    #[error("{0}")]
    Conflict(String),
    /// Unknown username and wrong password look the same to the caller.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("token has expired")]
    TokenExpired,
    #[error("{0}")]
    Validation(String),
    /// Storage or hashing failure. The text is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { entity, .. } => ServiceError::NotFound(entity),
            DbError::Constraint(msg) => ServiceError::Conflict(constraint_message(&msg).into()),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<CredentialError> for ServiceError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Mismatch => ServiceError::InvalidCredentials,
            CredentialError::Hashing => ServiceError::Internal(e.to_string()),
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidSignature | TokenError::Malformed => ServiceError::InvalidToken,
            TokenError::Expired => ServiceError::TokenExpired,
            TokenError::Signing => ServiceError::Internal(e.to_string()),
        }
    }
}

/// Caller-facing text for a storage constraint failure. SQLite's own message
/// names tables and columns, so it is never passed through.
fn constraint_message(sqlite_msg: &str) -> &'static str {
    if sqlite_msg.contains("users.username") {
        "username already exists"
    } else if sqlite_msg.contains("users.email") {
        "email already exists"
    } else {
        "request conflicts with existing data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_name_the_field_without_sql() {
        let err: ServiceError =
            DbError::Constraint("UNIQUE constraint failed: users.email".into()).into();
        assert!(matches!(&err, ServiceError::Conflict(m) if m == "email already exists"));

        let err: ServiceError =
            DbError::Constraint("FOREIGN KEY constraint failed".into()).into();
        assert_eq!(err.to_string(), "request conflicts with existing data");
    }

    #[test]
    fn not_found_keeps_the_entity_name() {
        let err: ServiceError = DbError::NotFound { entity: "photo", id: 3 }.into();
        assert_eq!(err.to_string(), "photo not found");
    }

    #[test]
    fn token_failures_map_to_auth_errors() {
        assert!(matches!(
            ServiceError::from(TokenError::Malformed),
            ServiceError::InvalidToken
        ));
        assert!(matches!(
            ServiceError::from(TokenError::InvalidSignature),
            ServiceError::InvalidToken
        ));
        assert!(matches!(
            ServiceError::from(TokenError::Expired),
            ServiceError::TokenExpired
        ));
    }
}
