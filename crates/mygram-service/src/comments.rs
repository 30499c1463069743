use std::sync::Arc;

use mygram_db::Database;
use mygram_db::models::NewComment;
use mygram_types::Id;
use mygram_types::api::{AddCommentRequest, UpdateCommentRequest};
use mygram_types::models::{Comment, Photo};

use crate::error::{Result, ServiceError};
use crate::photos::ensure_user_exists;
use crate::{policy, validation};

#[derive(Clone)]
pub struct CommentService {
    db: Arc<Database>,
}

impl CommentService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn add_comment(&self, caller: Id, req: &AddCommentRequest) -> Result<Comment> {
        validation::message(&req.message)?;
        ensure_user_exists(&self.db, caller)?;
        if !self.db.photo_exists(req.photo_id)? {
            return Err(ServiceError::NotFound("photo"));
        }

        Ok(self.db.save_comment(&NewComment {
            user_id: caller,
            photo_id: req.photo_id,
            message: &req.message,
        })?)
    }

    /// The caller's comments, each paired with the photo it sits on.
    pub fn list_comments(&self, caller: Id) -> Result<Vec<(Comment, Photo)>> {
        ensure_user_exists(&self.db, caller)?;

        self.db
            .list_comments_by_user(caller)?
            .into_iter()
            .map(|comment| -> Result<(Comment, Photo)> {
                let photo = self.db.get_photo(comment.photo_id)?;
                Ok((comment, photo))
            })
            .collect()
    }

    pub fn update_comment(
        &self,
        caller: Id,
        id: Id,
        req: &UpdateCommentRequest,
    ) -> Result<Comment> {
        validation::message(&req.message)?;

        let mut comment = self.db.get_comment(id)?;
        policy::ensure_comment_author(caller, &comment)?;

        comment.message = req.message.clone();
        Ok(self.db.update_comment(&comment)?)
    }

    pub fn delete_comment(&self, caller: Id, id: Id) -> Result<()> {
        let comment = self.db.get_comment(id)?;
        policy::ensure_comment_author(caller, &comment)?;

        Ok(self.db.delete_comment(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{add_photo, count, register, services};

    fn comment_on(photo_id: Id, message: &str) -> AddCommentRequest {
        AddCommentRequest {
            message: message.to_string(),
            photo_id,
        }
    }

    #[test]
    fn comment_on_missing_photo_is_not_found() {
        let (db, svc) = services();
        let ana = register(&svc, "ana");

        assert!(matches!(
            svc.comments.add_comment(ana.id, &comment_on(5, "hi")),
            Err(ServiceError::NotFound("photo"))
        ));
        assert_eq!(count(&db, "SELECT COUNT(*) FROM comments"), 0);
    }

    #[test]
    fn comment_from_missing_user_is_not_found() {
        let (_db, svc) = services();
        let ana = register(&svc, "ana");
        let photo = add_photo(&svc, &ana, "t");

        assert!(matches!(
            svc.comments.add_comment(99, &comment_on(photo.id, "hi")),
            Err(ServiceError::NotFound("user"))
        ));
    }

    #[test]
    fn anyone_may_comment_on_any_photo() {
        let (_db, svc) = services();
        let ana = register(&svc, "ana");
        let bob = register(&svc, "bob");
        let photo = add_photo(&svc, &ana, "t");

        let comment = svc
            .comments
            .add_comment(bob.id, &comment_on(photo.id, "hi"))
            .unwrap();
        assert_eq!(comment.user_id, bob.id);
        assert_eq!(comment.photo_id, photo.id);

        let listed = svc.comments.list_comments(bob.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, comment);
        assert_eq!(listed[0].1, photo);
    }

    #[test]
    fn only_the_author_may_edit_or_delete() {
        let (db, svc) = services();
        let ana = register(&svc, "ana");
        let bob = register(&svc, "bob");
        let photo = add_photo(&svc, &ana, "t");
        let comment = svc
            .comments
            .add_comment(bob.id, &comment_on(photo.id, "hi"))
            .unwrap();

        // Not even the photo owner.
        let edit = UpdateCommentRequest {
            message: "moderated".into(),
        };
        assert!(matches!(
            svc.comments.update_comment(ana.id, comment.id, &edit),
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            svc.comments.delete_comment(ana.id, comment.id),
            Err(ServiceError::Forbidden)
        ));
        assert_eq!(db.get_comment(comment.id).unwrap().message, "hi");

        let edited = svc
            .comments
            .update_comment(
                bob.id,
                comment.id,
                &UpdateCommentRequest {
                    message: "hello".into(),
                },
            )
            .unwrap();
        assert_eq!(edited.message, "hello");

        svc.comments.delete_comment(bob.id, comment.id).unwrap();
        assert!(matches!(
            svc.comments.delete_comment(bob.id, comment.id),
            Err(ServiceError::NotFound("comment"))
        ));
    }
}
