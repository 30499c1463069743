use std::sync::Arc;

use mygram_db::Database;
use mygram_db::models::NewPhoto;
use mygram_types::Id;
use mygram_types::api::AddPhotoRequest;
use mygram_types::models::{Photo, PhotoWithComments};

use crate::error::{Result, ServiceError};
use crate::{policy, validation};

#[derive(Clone)]
pub struct PhotoService {
    db: Arc<Database>,
}

impl PhotoService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn add_photo(&self, caller: Id, req: &AddPhotoRequest) -> Result<Photo> {
        validation::photo(req)?;
        ensure_user_exists(&self.db, caller)?;

        Ok(self.db.save_photo(&NewPhoto {
            title: &req.title,
            caption: &req.caption,
            photo_url: &req.photo_url,
            user_id: caller,
        })?)
    }

    /// Any authenticated caller may read any photo.
    pub fn get_photo(&self, id: Id) -> Result<PhotoWithComments> {
        let photo = self.db.get_photo(id)?;
        let comments = self.db.list_comments_by_photo(id)?;
        Ok(PhotoWithComments { photo, comments })
    }

    pub fn list_photos(&self, caller: Id) -> Result<Vec<Photo>> {
        ensure_user_exists(&self.db, caller)?;
        Ok(self.db.list_photos_by_user(caller)?)
    }

    pub fn update_photo(&self, caller: Id, id: Id, req: &AddPhotoRequest) -> Result<Photo> {
        validation::photo(req)?;

        let mut photo = self.db.get_photo(id)?;
        policy::ensure_photo_owner(caller, &photo)?;

        photo.title = req.title.clone();
        photo.caption = req.caption.clone();
        photo.photo_url = req.photo_url.clone();

        Ok(self.db.update_photo(&photo)?)
    }

    /// Delete a photo together with its comments. Returns how many comments
    /// went with it.
    pub fn delete_photo(&self, caller: Id, id: Id) -> Result<usize> {
        let photo = self.db.get_photo(id)?;
        policy::ensure_photo_owner(caller, &photo)?;

        Ok(self.db.delete_photo(id)?)
    }
}

pub(crate) fn ensure_user_exists(db: &Database, id: Id) -> Result<()> {
    if !db.user_exists(id)? {
        return Err(ServiceError::NotFound("user"));
    }
    Ok(())
}
