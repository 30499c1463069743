//! Domain services: ownership and existence rules layered over the
//! repositories in mygram-db.
//!
//! Every operation takes the caller's id as an explicit argument. That id
//! comes from a validated token at the HTTP boundary and is the only input
//! ownership checks trust.

pub mod comments;
pub mod error;
pub mod photos;
pub mod policy;
pub mod social_medias;
pub mod users;
pub mod validation;

use std::sync::Arc;

use mygram_crypto::{CredentialService, TokenService};
use mygram_db::Database;

pub use comments::CommentService;
pub use error::{Result, ServiceError};
pub use photos::PhotoService;
pub use social_medias::SocialMediaService;
pub use users::UserService;

/// All four services over one database.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub photos: PhotoService,
    pub comments: CommentService,
    pub social_medias: SocialMediaService,
}

impl Services {
    pub fn new(db: Arc<Database>, credentials: CredentialService, tokens: TokenService) -> Self {
        Self {
            users: UserService::new(db.clone(), credentials, tokens),
            photos: PhotoService::new(db.clone()),
            comments: CommentService::new(db.clone()),
            social_medias: SocialMediaService::new(db),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use mygram_crypto::Params;
    use mygram_types::api::{AddPhotoRequest, RegisterRequest};
    use mygram_types::models::{Photo, User};

    pub const SECRET: &str = "test-secret";

    pub fn services() -> (Arc<Database>, Services) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let credentials = CredentialService::with_params(Params::new(1024, 1, 1, None).unwrap());
        let tokens = TokenService::with_default_ttl(SECRET);
        (db.clone(), Services::new(db, credentials, tokens))
    }

    pub fn registration(name: &str) -> RegisterRequest {
        RegisterRequest {
            username: name.to_string(),
            email: format!("{name}@x.com"),
            age: 20,
            password: "secret1".to_string(),
        }
    }

    pub fn register(svc: &Services, name: &str) -> User {
        svc.users.register(&registration(name)).unwrap()
    }

    pub fn add_photo(svc: &Services, owner: &User, title: &str) -> Photo {
        svc.photos
            .add_photo(
                owner.id,
                &AddPhotoRequest {
                    title: title.to_string(),
                    caption: String::new(),
                    photo_url: "https://img.example/p.jpg".to_string(),
                },
            )
            .unwrap()
    }

    pub fn count(db: &Database, sql: &str) -> i64 {
        db.with_conn(|conn| Ok(conn.query_row(sql, [], |r| r.get(0))?))
            .unwrap()
    }
}
