use rusqlite::{Connection, OptionalExtension, Row, params};

use mygram_types::Id;
use mygram_types::models::Comment;

use crate::models::NewComment;
use crate::{Database, DbError, Result, now, require_rowid, rowid};

const COMMENT_COLUMNS: &str = "id, user_id, photo_id, message, created_at, updated_at";

impl Database {
    /// Insert a comment. Both foreign keys are checked by SQLite, so a
    /// missing author or photo surfaces as `DbError::Constraint`.
    pub fn save_comment(&self, new: &NewComment<'_>) -> Result<Comment> {
        let author = require_rowid("user", new.user_id)?;
        let photo = require_rowid("photo", new.photo_id)?;
        self.with_conn(|conn| {
            let at = now();
            conn.execute(
                "INSERT INTO comments (user_id, photo_id, message, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![author, photo, new.message, at],
            )?;
            let id = conn.last_insert_rowid() as Id;
            query_comment(conn, id)
        })
    }

    pub fn get_comment(&self, id: Id) -> Result<Comment> {
        self.with_conn(|conn| query_comment(conn, id))
    }

    pub fn list_comments_by_user(&self, user_id: Id) -> Result<Vec<Comment>> {
        self.with_conn(|conn| query_comments(conn, "user_id", user_id))
    }

    pub fn list_comments_by_photo(&self, photo_id: Id) -> Result<Vec<Comment>> {
        self.with_conn(|conn| query_comments(conn, "photo_id", photo_id))
    }

    /// Write the message of `comment`. Author, photo and timestamps in
    /// `comment` are ignored.
    pub fn update_comment(&self, comment: &Comment) -> Result<Comment> {
        let key = require_rowid("comment", comment.id)?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE comments SET message = ?1, updated_at = ?2 WHERE id = ?3",
                params![comment.message, now(), key],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound { entity: "comment", id: comment.id });
            }
            query_comment(conn, comment.id)
        })
    }

    pub fn delete_comment(&self, id: Id) -> Result<()> {
        let key = require_rowid("comment", id)?;
        self.with_conn(|conn| {
            if conn.execute("DELETE FROM comments WHERE id = ?1", [key])? == 0 {
                return Err(DbError::NotFound { entity: "comment", id });
            }
            Ok(())
        })
    }
}

/// Remove every comment attached to `photo_id`. Callers run this inside the
/// transaction that also removes the photo.
pub(crate) fn delete_comments_on_photo(conn: &Connection, photo_id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM comments WHERE photo_id = ?1", [photo_id])?)
}

fn query_comment(conn: &Connection, id: Id) -> Result<Comment> {
    conn.query_row(
        &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
        [require_rowid("comment", id)?],
        comment_from_row,
    )
    .optional()?
    .ok_or(DbError::NotFound { entity: "comment", id })
}

/// `column` is always one of our own column names, never caller input.
fn query_comments(conn: &Connection, column: &str, id: Id) -> Result<Vec<Comment>> {
    let Some(id) = rowid(id) else {
        return Ok(Vec::new());
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {COMMENT_COLUMNS} FROM comments WHERE {column} = ?1 ORDER BY id"
    ))?;

    let rows = stmt
        .query_map([id], comment_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        photo_id: row.get(2)?,
        message: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
