//! Insert payloads and the one row type that differs from the mygram-types
//! models. Photos, comments and social medias come back as the shared
//! models directly; a user row additionally carries the password hash.

use chrono::{DateTime, Utc};

use mygram_types::Id;
use mygram_types::models::User;

pub struct UserRow {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub password: String,
    pub age: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            age: row.age,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub age: u32,
}

pub struct NewPhoto<'a> {
    pub title: &'a str,
    pub caption: &'a str,
    pub photo_url: &'a str,
    pub user_id: Id,
}

pub struct NewComment<'a> {
    pub user_id: Id,
    pub photo_id: Id,
    pub message: &'a str,
}

pub struct NewSocialMedia<'a> {
    pub name: &'a str,
    pub social_media_url: &'a str,
    pub user_id: Id,
}
