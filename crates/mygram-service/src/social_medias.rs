use std::sync::Arc;

use mygram_db::Database;
use mygram_db::models::NewSocialMedia;
use mygram_types::Id;
use mygram_types::api::AddSocialMediaRequest;
use mygram_types::models::SocialMedia;

use crate::error::Result;
use crate::photos::ensure_user_exists;
use crate::{policy, validation};

#[derive(Clone)]
pub struct SocialMediaService {
    db: Arc<Database>,
}

impl SocialMediaService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn add_social_media(&self, caller: Id, req: &AddSocialMediaRequest) -> Result<SocialMedia> {
        validation::social_media(req)?;
        ensure_user_exists(&self.db, caller)?;

        Ok(self.db.save_social_media(&NewSocialMedia {
            name: &req.name,
            social_media_url: &req.social_media_url,
            user_id: caller,
        })?)
    }

    pub fn get_social_media(&self, id: Id) -> Result<SocialMedia> {
        Ok(self.db.get_social_media(id)?)
    }

    pub fn list_social_medias(&self, caller: Id) -> Result<Vec<SocialMedia>> {
        ensure_user_exists(&self.db, caller)?;
        Ok(self.db.list_social_medias_by_user(caller)?)
    }

    pub fn update_social_media(
        &self,
        caller: Id,
        id: Id,
        req: &AddSocialMediaRequest,
    ) -> Result<SocialMedia> {
        validation::social_media(req)?;

        let mut social_media = self.db.get_social_media(id)?;
        policy::ensure_social_media_owner(caller, &social_media)?;

        social_media.name = req.name.clone();
        social_media.social_media_url = req.social_media_url.clone();
        Ok(self.db.update_social_media(&social_media)?)
    }

    pub fn delete_social_media(&self, caller: Id, id: Id) -> Result<()> {
        let social_media = self.db.get_social_media(id)?;
        policy::ensure_social_media_owner(caller, &social_media)?;

        Ok(self.db.delete_social_media(id)?)
    }
}
