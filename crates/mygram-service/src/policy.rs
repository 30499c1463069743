//! Write-authorization rules, one per entity type.
//!
//! Ownership is always the recorded owner column compared against the
//! authenticated caller; request bodies never carry it.

use tracing::warn;

use mygram_types::Id;
use mygram_types::models::{Comment, Photo, SocialMedia};

use crate::error::{Result, ServiceError};

/// Only the account holder may edit their own profile.
pub fn ensure_account_owner(caller: Id, user_id: Id) -> Result<()> {
    if caller != user_id {
        warn!("User {} denied access to account {}", caller, user_id);
        return Err(ServiceError::Forbidden);
    }
    Ok(())
}

pub fn ensure_photo_owner(caller: Id, photo: &Photo) -> Result<()> {
    if caller != photo.user_id {
        warn!("User {} denied write to photo {}", caller, photo.id);
        return Err(ServiceError::Forbidden);
    }
    Ok(())
}

/// Only the author; the owner of the photo underneath gets no say.
pub fn ensure_comment_author(caller: Id, comment: &Comment) -> Result<()> {
    if caller != comment.user_id {
        warn!("User {} denied write to comment {}", caller, comment.id);
        return Err(ServiceError::Forbidden);
    }
    Ok(())
}

pub fn ensure_social_media_owner(caller: Id, social_media: &SocialMedia) -> Result<()> {
    if caller != social_media.user_id {
        warn!("User {} denied write to social media {}", caller, social_media.id);
        return Err(ServiceError::Forbidden);
    }
    Ok(())
}
