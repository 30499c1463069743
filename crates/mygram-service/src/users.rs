use std::sync::Arc;

use tracing::{debug, info, warn};

use mygram_crypto::{CredentialService, TokenService};
use mygram_db::Database;
use mygram_db::models::NewUser;
use mygram_types::Id;
use mygram_types::api::{LoginRequest, RegisterRequest, UpdateUserRequest};
use mygram_types::models::{CascadeReport, User};

use crate::error::{Result, ServiceError};
use crate::{policy, validation};

/// Verified against when a login names no account, so both failure paths
/// pay for one argon2 run.
const DECOY_PASSWORD: &str = "mygram-decoy-password";

#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
    credentials: CredentialService,
    tokens: TokenService,
    decoy_hash: String,
}

impl UserService {
    pub fn new(db: Arc<Database>, credentials: CredentialService, tokens: TokenService) -> Self {
        // Hashed with the same parameters as real accounts so the costs match.
        let decoy_hash = credentials.hash(DECOY_PASSWORD).unwrap_or_else(|e| {
            warn!("Could not prepare decoy hash: {}", e);
            String::new()
        });

        Self {
            db,
            credentials,
            tokens,
            decoy_hash,
        }
    }

    /// Create an account. Username and email are probed first so the caller
    /// gets a precise conflict message; the UNIQUE constraints still catch a
    /// concurrent registration that slips between probe and insert.
    pub fn register(&self, req: &RegisterRequest) -> Result<User> {
        validation::register(req)?;

        if self.db.username_taken(&req.username)? {
            return Err(ServiceError::Conflict("username already exists".into()));
        }
        if self.db.email_taken(&req.email)? {
            return Err(ServiceError::Conflict("email already exists".into()));
        }

        let password_hash = self.credentials.hash(&req.password)?;
        let row = self.db.save_user(&NewUser {
            username: &req.username,
            email: &req.email,
            password_hash: &password_hash,
            age: req.age,
        })?;

        info!("Registered user {} ({})", row.id, row.username);
        Ok(row.into())
    }

    /// Exchange a username and password for an access token.
    pub fn login(&self, req: &LoginRequest) -> Result<String> {
        let Some(row) = self.db.get_user_by_username(&req.username)? else {
            let _ = self.credentials.verify(&req.password, &self.decoy_hash);
            debug!("Login failed: unknown username");
            return Err(ServiceError::InvalidCredentials);
        };

        self.credentials.verify(&req.password, &row.password).map_err(|e| {
            debug!("Login failed for user {}", row.id);
            ServiceError::from(e)
        })?;

        Ok(self.tokens.issue(row.id)?)
    }

    pub fn get_user(&self, id: Id) -> Result<User> {
        Ok(self.db.get_user(id)?.into())
    }

    /// Change username and email of `target`, which must be the caller.
    pub fn update_user(&self, caller: Id, target: Id, req: &UpdateUserRequest) -> Result<User> {
        policy::ensure_account_owner(caller, target)?;
        validation::update_user(req)?;

        let mut user: User = self.db.get_user(target)?.into();

        if taken_by_other(self.db.user_id_by_username(&req.username)?, target) {
            return Err(ServiceError::Conflict("username already exists".into()));
        }
        if taken_by_other(self.db.user_id_by_email(&req.email)?, target) {
            return Err(ServiceError::Conflict("email already exists".into()));
        }

        user.username = req.username.clone();
        user.email = req.email.clone();

        Ok(self.db.update_user(&user)?.into())
    }

    /// Delete the caller's own account and everything it owns.
    pub fn delete_user(&self, caller: Id) -> Result<CascadeReport> {
        Ok(self.db.delete_user(caller)?)
    }
}

fn taken_by_other(holder: Option<Id>, me: Id) -> bool {
    matches!(holder, Some(id) if id != me)
}
