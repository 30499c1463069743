use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use mygram_types::Id;
use mygram_types::models::{CascadeReport, User};

use crate::comments::delete_comments_on_photo;
use crate::models::{NewUser, UserRow};
use crate::{Database, DbError, Result, now, require_rowid, rowid};

const USER_COLUMNS: &str = "id, username, email, password, age, created_at, updated_at";

impl Database {
    /// Insert a user. The UNIQUE constraints on username and email are the
    /// final word on uniqueness; a clash surfaces as `DbError::Constraint`.
    pub fn save_user(&self, new: &NewUser<'_>) -> Result<UserRow> {
        self.with_conn(|conn| {
            let at = now();
            conn.execute(
                "INSERT INTO users (username, email, password, age, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![new.username, new.email, new.password_hash, new.age, at],
            )?;
            let id = conn.last_insert_rowid() as Id;
            query_user(conn, id)
        })
    }

    pub fn get_user(&self, id: Id) -> Result<UserRow> {
        self.with_conn(|conn| query_user(conn, id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                    [username],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn user_exists(&self, id: Id) -> Result<bool> {
        let Some(id) = rowid(id) else {
            return Ok(false);
        };
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM users WHERE id = ?1", [id], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn username_taken(&self, username: &str) -> Result<bool> {
        Ok(self.user_id_by_username(username)?.is_some())
    }

    pub fn email_taken(&self, email: &str) -> Result<bool> {
        Ok(self.user_id_by_email(email)?.is_some())
    }

    /// Id of the account holding `username`, if any.
    pub fn user_id_by_username(&self, username: &str) -> Result<Option<Id>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row("SELECT id FROM users WHERE username = ?1", [username], |r| r.get(0))
                .optional()?;
            Ok(id)
        })
    }

    /// Id of the account holding `email`, if any.
    pub fn user_id_by_email(&self, email: &str) -> Result<Option<Id>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row("SELECT id FROM users WHERE email = ?1", [email], |r| r.get(0))
                .optional()?;
            Ok(id)
        })
    }

    /// Write the mutable profile fields (username, email) of `user`.
    /// Id, age and timestamps in `user` are ignored.
    pub fn update_user(&self, user: &User) -> Result<UserRow> {
        let key = require_rowid("user", user.id)?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET username = ?1, email = ?2, updated_at = ?3 WHERE id = ?4",
                params![user.username, user.email, now(), key],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound { entity: "user", id: user.id });
            }
            query_user(conn, user.id)
        })
    }

    /// Delete a user together with everything that references it, in one
    /// transaction. On any error the transaction is dropped uncommitted and
    /// nothing is removed.
    pub fn delete_user(&self, id: Id) -> Result<CascadeReport> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let report = cascade_delete_user(&tx, id)?;
            tx.commit()?;

            info!(
                "Deleted user {} (photos: {}, comments: {}, social medias: {})",
                id, report.photos, report.comments, report.social_medias
            );
            Ok(report)
        })
    }
}

fn cascade_delete_user(conn: &Connection, id: Id) -> Result<CascadeReport> {
    let key = require_rowid("user", id)?;
    let social_medias = conn.execute("DELETE FROM social_medias WHERE user_id = ?1", [key])?;
    let mut comments = conn.execute("DELETE FROM comments WHERE user_id = ?1", [key])?;

    let photo_ids = {
        let mut stmt = conn.prepare("SELECT id FROM photos WHERE user_id = ?1 ORDER BY id")?;
        stmt.query_map([key], |r| r.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };
    for photo_id in &photo_ids {
        comments += delete_comments_on_photo(conn, *photo_id)?;
    }
    let photos = conn.execute("DELETE FROM photos WHERE user_id = ?1", [key])?;

    if conn.execute("DELETE FROM users WHERE id = ?1", [key])? == 0 {
        return Err(DbError::NotFound { entity: "user", id });
    }

    Ok(CascadeReport {
        photos,
        comments,
        social_medias,
    })
}

fn query_user(conn: &Connection, id: Id) -> Result<UserRow> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        [require_rowid("user", id)?],
        user_from_row,
    )
    .optional()?
    .ok_or(DbError::NotFound { entity: "user", id })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        age: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewComment, NewSocialMedia};
    use crate::test_support::{count, db, photo, user};

    fn comment(db: &Database, user_id: Id, photo_id: Id) {
        db.save_comment(&NewComment {
            user_id,
            photo_id,
            message: "nice",
        })
        .unwrap();
    }

    fn social_media(db: &Database, user_id: Id) {
        db.save_social_media(&NewSocialMedia {
            name: "site",
            social_media_url: "https://social.example/me",
            user_id,
        })
        .unwrap();
    }

    #[test]
    fn save_then_get_round_trips() {
        let db = db();
        let saved = user(&db, "ana");

        assert_eq!(saved.id, 1);
        assert!(saved.created_at.timestamp() > 0);
        assert_eq!(saved.created_at, saved.updated_at);

        let loaded = db.get_user(saved.id).unwrap();
        assert_eq!(loaded.username, "ana");
        assert_eq!(loaded.email, "ana@x.com");
        assert_eq!(loaded.age, 20);
        assert_eq!(loaded.password, saved.password);
        assert_eq!(loaded.created_at, saved.created_at);
    }

    #[test]
    fn duplicate_username_or_email_is_a_constraint_violation() {
        let db = db();
        user(&db, "ana");

        let dup_name = db.save_user(&NewUser {
            username: "ana",
            email: "other@x.com",
            password_hash: "h",
            age: 30,
        });
        assert!(matches!(dup_name, Err(DbError::Constraint(_))));

        let dup_email = db.save_user(&NewUser {
            username: "bob",
            email: "ana@x.com",
            password_hash: "h",
            age: 30,
        });
        assert!(matches!(dup_email, Err(DbError::Constraint(_))));

        assert_eq!(count(&db, "SELECT COUNT(*) FROM users WHERE id >= ?1", 0), 1);
    }

    #[test]
    fn uniqueness_probes() {
        let db = db();
        let ana = user(&db, "ana");

        assert!(db.username_taken("ana").unwrap());
        assert!(!db.username_taken("bob").unwrap());
        assert!(db.email_taken("ana@x.com").unwrap());
        assert!(!db.email_taken("bob@x.com").unwrap());
        assert_eq!(db.user_id_by_username("ana").unwrap(), Some(ana.id));
    }

    #[test]
    fn update_writes_only_profile_fields() {
        let db = db();
        let saved = user(&db, "ana");

        let mut changed: User = db.get_user(saved.id).unwrap().into();
        changed.username = "ana2".into();
        changed.email = "ana2@x.com".into();
        changed.age = 99;
        changed.created_at = chrono::DateTime::default();

        let updated = db.update_user(&changed).unwrap();
        assert_eq!(updated.username, "ana2");
        assert_eq!(updated.email, "ana2@x.com");
        assert_eq!(updated.age, 20);
        assert_eq!(updated.created_at, saved.created_at);
        assert_eq!(updated.password, saved.password);
    }

    #[test]
    fn update_missing_user_is_not_found() {
        let db = db();
        let mut ghost: User = user(&db, "ana").into();
        ghost.id = 404;

        assert!(matches!(
            db.update_user(&ghost),
            Err(DbError::NotFound { entity: "user", id: 404 })
        ));
    }

    #[test]
    fn delete_missing_user_is_not_found() {
        let db = db();
        assert!(matches!(
            db.delete_user(9),
            Err(DbError::NotFound { entity: "user", id: 9 })
        ));
    }

    #[test]
    fn delete_user_cascades_to_every_dependent_row() {
        let db = db();
        let ana = user(&db, "ana");
        let bob = user(&db, "bob");

        let ana_photo = photo(&db, ana.id, "ana's");
        let bob_photo = photo(&db, bob.id, "bob's");

        // ana on her own photo, ana on bob's, bob on ana's, bob on his own
        comment(&db, ana.id, ana_photo.id);
        comment(&db, ana.id, bob_photo.id);
        comment(&db, bob.id, ana_photo.id);
        comment(&db, bob.id, bob_photo.id);
        social_media(&db, ana.id);
        social_media(&db, bob.id);

        let report = db.delete_user(ana.id).unwrap();
        assert_eq!(
            report,
            CascadeReport {
                photos: 1,
                comments: 3,
                social_medias: 1,
            }
        );

        assert!(matches!(db.get_user(ana.id), Err(DbError::NotFound { .. })));
        assert_eq!(count(&db, "SELECT COUNT(*) FROM photos WHERE user_id = ?1", ana.id), 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM comments WHERE user_id = ?1", ana.id), 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM comments WHERE photo_id = ?1", ana_photo.id), 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM social_medias WHERE user_id = ?1", ana.id), 0);

        // bob keeps his photo, his comment on it, and his link
        assert!(db.get_photo(bob_photo.id).is_ok());
        assert_eq!(count(&db, "SELECT COUNT(*) FROM comments WHERE user_id = ?1", bob.id), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM social_medias WHERE user_id = ?1", bob.id), 1);
    }

    #[test]
    fn failed_cascade_step_rolls_everything_back() {
        let db = db();
        let ana = user(&db, "ana");
        let bob = user(&db, "bob");
        let ana_photo = photo(&db, ana.id, "ana's");
        comment(&db, ana.id, ana_photo.id);
        comment(&db, bob.id, ana_photo.id);
        social_media(&db, ana.id);

        // Make the photo step blow up after the social media and comment
        // steps have already run inside the transaction.
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER fail_photo_delete BEFORE DELETE ON photos
                 BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
            )?;
            Ok(())
        })
        .unwrap();

        assert!(db.delete_user(ana.id).is_err());

        assert!(db.get_user(ana.id).is_ok());
        assert!(db.get_photo(ana_photo.id).is_ok());
        assert_eq!(count(&db, "SELECT COUNT(*) FROM comments WHERE photo_id = ?1", ana_photo.id), 2);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM social_medias WHERE user_id = ?1", ana.id), 1);
    }
}
