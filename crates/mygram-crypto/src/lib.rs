//! MyGram credential and token primitives.
//!
//! - `password`: argon2id hashing and verification of account passwords.
//! - `token`: stateless HS256 access tokens carrying the caller's user id.
//!
//! Plaintexts, hashes and tokens are never logged.

pub mod password;
pub mod token;

pub use password::{CredentialError, CredentialService, Params};
pub use token::{TokenError, TokenService};
