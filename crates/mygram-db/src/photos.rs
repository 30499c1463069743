use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use mygram_types::Id;
use mygram_types::models::Photo;

use crate::comments::delete_comments_on_photo;
use crate::models::NewPhoto;
use crate::{Database, DbError, Result, now, require_rowid, rowid};

const PHOTO_COLUMNS: &str = "id, title, caption, photo_url, user_id, created_at, updated_at";

impl Database {
    pub fn save_photo(&self, new: &NewPhoto<'_>) -> Result<Photo> {
        let owner = require_rowid("user", new.user_id)?;
        self.with_conn(|conn| {
            let at = now();
            conn.execute(
                "INSERT INTO photos (title, caption, photo_url, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![new.title, new.caption, new.photo_url, owner, at],
            )?;
            let id = conn.last_insert_rowid() as Id;
            query_photo(conn, id)
        })
    }

    pub fn get_photo(&self, id: Id) -> Result<Photo> {
        self.with_conn(|conn| query_photo(conn, id))
    }

    pub fn photo_exists(&self, id: Id) -> Result<bool> {
        let Some(id) = rowid(id) else {
            return Ok(false);
        };
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM photos WHERE id = ?1", [id], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn list_photos_by_user(&self, user_id: Id) -> Result<Vec<Photo>> {
        let Some(user_id) = rowid(user_id) else {
            return Ok(Vec::new());
        };
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PHOTO_COLUMNS} FROM photos WHERE user_id = ?1 ORDER BY id"
            ))?;

            let rows = stmt
                .query_map([user_id], photo_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(rows)
        })
    }

    /// Write title, caption and photo_url of `photo`. Owner and timestamps
    /// in `photo` are ignored.
    pub fn update_photo(&self, photo: &Photo) -> Result<Photo> {
        let key = require_rowid("photo", photo.id)?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE photos SET title = ?1, caption = ?2, photo_url = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![photo.title, photo.caption, photo.photo_url, now(), key],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound { entity: "photo", id: photo.id });
            }
            query_photo(conn, photo.id)
        })
    }

    /// Delete a photo and the comments attached to it in one transaction.
    /// Returns the number of comments removed.
    pub fn delete_photo(&self, id: Id) -> Result<usize> {
        let key = require_rowid("photo", id)?;
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let comments = delete_comments_on_photo(&tx, key)?;
            if tx.execute("DELETE FROM photos WHERE id = ?1", [key])? == 0 {
                return Err(DbError::NotFound { entity: "photo", id });
            }
            tx.commit()?;

            info!("Deleted photo {} ({} comments)", id, comments);
            Ok(comments)
        })
    }
}

fn query_photo(conn: &Connection, id: Id) -> Result<Photo> {
    conn.query_row(
        &format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = ?1"),
        [require_rowid("photo", id)?],
        photo_from_row,
    )
    .optional()?
    .ok_or(DbError::NotFound { entity: "photo", id })
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: row.get(0)?,
        title: row.get(1)?,
        caption: row.get(2)?,
        photo_url: row.get(3)?,
        user_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
