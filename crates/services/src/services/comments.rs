//! Posting comments and fanning out the resulting notifications.

use std::sync::Arc;

use db::{
    DBService,
    models::{
        comment::{Comment, CreateComment},
        deliverable::Deliverable,
        notification::{CreateNotification, NotificationType},
        user::User,
    },
    validation::ValidationError,
};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::{mentions::extract_mentions, notification::NotificationService};

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Deliverable not found")]
    DeliverableNotFound,
    #[error("Comment not found")]
    CommentNotFound,
    #[error("Unknown user: {0}")]
    UnknownUser(Uuid),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Clone)]
pub struct CommentService {
    db: Arc<DBService>,
    notifications: NotificationService,
}

impl CommentService {
    pub fn new(db: Arc<DBService>) -> Self {
        let notifications = NotificationService::new(db.clone());
        Self { db, notifications }
    }

    pub fn list(&self, deliverable_id: Uuid) -> Result<Vec<Comment>, CommentError> {
        Deliverable::find_by_id(&self.db.deliverables, deliverable_id)
            .ok_or(CommentError::DeliverableNotFound)?;
        Ok(Comment::find_by_deliverable_id(
            &self.db.comments,
            deliverable_id,
        ))
    }

    pub fn post(
        &self,
        deliverable_id: Uuid,
        author_id: Uuid,
        data: &CreateComment,
    ) -> Result<Comment, CommentError> {
        let deliverable = Deliverable::find_by_id(&self.db.deliverables, deliverable_id)
            .ok_or(CommentError::DeliverableNotFound)?;
        let author = User::find_by_id(&self.db.users, author_id)
            .ok_or(CommentError::UnknownUser(author_id))?;

        let comment = Comment::create(&self.db.comments, deliverable_id, author_id, data)?;
        info!(
            comment_id = %comment.id,
            deliverable_id = %deliverable_id,
            user_id = %author_id,
            "Comment posted"
        );

        let mut notified = Vec::new();
        for handle in extract_mentions(&comment.content) {
            let Some(user) = User::find_by_handle(&self.db.users, &handle) else {
                debug!(handle = %handle, "Mention does not match a user");
                continue;
            };
            if user.id == author_id || notified.contains(&user.id) {
                continue;
            }
            self.notifications.notify(CreateNotification {
                user_id: user.id,
                notification_type: NotificationType::Mention,
                title: format!("{} mentioned you", author.name),
                message: format!("On \"{}\": {}", deliverable.name, comment.content),
                deliverable_id: Some(deliverable_id),
                comment_id: Some(comment.id),
                from_user_id: Some(author_id),
            });
            notified.push(user.id);
        }

        if let Some(assignee_id) = deliverable.assignee_id
            && assignee_id != author_id
            && !notified.contains(&assignee_id)
        {
            self.notifications.notify(CreateNotification {
                user_id: assignee_id,
                notification_type: NotificationType::Comment,
                title: format!("{} commented on {}", author.name, deliverable.name),
                message: comment.content.clone(),
                deliverable_id: Some(deliverable_id),
                comment_id: Some(comment.id),
                from_user_id: Some(author_id),
            });
        }

        Ok(comment)
    }

    /// Deletes the comment with its replies and returns how many went.
    pub fn delete(&self, comment_id: Uuid) -> Result<usize, CommentError> {
        match Comment::delete(&self.db.comments, comment_id) {
            0 => Err(CommentError::CommentNotFound),
            removed => Ok(removed),
        }
    }
}
