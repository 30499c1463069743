use rusqlite::{Connection, OptionalExtension, Row, params};

use mygram_types::Id;
use mygram_types::models::SocialMedia;

use crate::models::NewSocialMedia;
use crate::{Database, DbError, Result, now, require_rowid, rowid};

const SOCIAL_MEDIA_COLUMNS: &str =
    "id, name, social_media_url, user_id, created_at, updated_at";

impl Database {
    pub fn save_social_media(&self, new: &NewSocialMedia<'_>) -> Result<SocialMedia> {
        let owner = require_rowid("user", new.user_id)?;
        self.with_conn(|conn| {
            let at = now();
            conn.execute(
                "INSERT INTO social_medias (name, social_media_url, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![new.name, new.social_media_url, owner, at],
            )?;
            let id = conn.last_insert_rowid() as Id;
            query_social_media(conn, id)
        })
    }

    pub fn get_social_media(&self, id: Id) -> Result<SocialMedia> {
        self.with_conn(|conn| query_social_media(conn, id))
    }

    pub fn list_social_medias_by_user(&self, user_id: Id) -> Result<Vec<SocialMedia>> {
        let Some(user_id) = rowid(user_id) else {
            return Ok(Vec::new());
        };
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SOCIAL_MEDIA_COLUMNS} FROM social_medias WHERE user_id = ?1 ORDER BY id"
            ))?;

            let rows = stmt
                .query_map([user_id], social_media_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(rows)
        })
    }

    pub fn update_social_media(&self, social_media: &SocialMedia) -> Result<SocialMedia> {
        let key = require_rowid("social media", social_media.id)?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE social_medias SET name = ?1, social_media_url = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![
                    social_media.name,
                    social_media.social_media_url,
                    now(),
                    key
                ],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound {
                    entity: "social media",
                    id: social_media.id,
                });
            }
            query_social_media(conn, social_media.id)
        })
    }

    pub fn delete_social_media(&self, id: Id) -> Result<()> {
        let key = require_rowid("social media", id)?;
        self.with_conn(|conn| {
            if conn.execute("DELETE FROM social_medias WHERE id = ?1", [key])? == 0 {
                return Err(DbError::NotFound { entity: "social media", id });
            }
            Ok(())
        })
    }
}

fn query_social_media(conn: &Connection, id: Id) -> Result<SocialMedia> {
    conn.query_row(
        &format!("SELECT {SOCIAL_MEDIA_COLUMNS} FROM social_medias WHERE id = ?1"),
        [require_rowid("social media", id)?],
        social_media_from_row,
    )
    .optional()?
    .ok_or(DbError::NotFound { entity: "social media", id })
}

fn social_media_from_row(row: &Row<'_>) -> rusqlite::Result<SocialMedia> {
    Ok(SocialMedia {
        id: row.get(0)?,
        name: row.get(1)?,
        social_media_url: row.get(2)?,
        user_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
