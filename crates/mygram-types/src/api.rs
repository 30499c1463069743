use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::models::{Comment, Photo, SocialMedia};

// -- JWT Claims --

/// Claims carried by every access token. Shared between the token issuer
/// (mygram-crypto) and anything that wants to inspect a decoded token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Id,
    pub iat: i64,
    pub exp: i64,
}

// -- Users --

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub age: u32,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub age: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub age: u32,
    pub updated_at: DateTime<Utc>,
}

// -- Photos --

/// Body of both `POST /photos` and `PUT /photos/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddPhotoRequest {
    pub title: String,
    #[serde(default)]
    pub caption: String,
    pub photo_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoUser {
    pub email: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoOfUserResponse {
    #[serde(flatten)]
    pub photo: Photo,
    #[serde(rename = "User")]
    pub user: PhotoUser,
}

// -- Comments --

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddCommentRequest {
    pub message: String,
    pub photo_id: Id,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUser {
    pub id: Id,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPhoto {
    pub id: Id,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: Id,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentOfUserResponse {
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(rename = "User")]
    pub user: CommentUser,
    #[serde(rename = "Photo")]
    pub photo: CommentPhoto,
}

// -- Social media --

/// Body of both `POST /socialmedias` and `PUT /socialmedias/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddSocialMediaRequest {
    pub name: String,
    pub social_media_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialMediaUser {
    pub id: Id,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SocialMediaOfUserResponse {
    #[serde(flatten)]
    pub social_media: SocialMedia,
    #[serde(rename = "User")]
    pub user: SocialMediaUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SocialMediaListResponse {
    pub social_medias: Vec<SocialMediaOfUserResponse>,
}

// -- Envelopes --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Uniform failure body: `{"status": "error", "message": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
