use std::sync::Arc;

use db::{
    DBService,
    models::notification::{CreateNotification, Notification},
};
use tracing::{debug, info};
use uuid::Uuid;

/// In-app notification inbox.
#[derive(Clone)]
pub struct NotificationService {
    db: Arc<DBService>,
}

impl NotificationService {
    pub fn new(db: Arc<DBService>) -> Self {
        Self { db }
    }

    pub fn notify(&self, data: CreateNotification) -> Notification {
        let notification = Notification::create(&self.db.notifications, data);
        info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = %notification.notification_type,
            "Notification created"
        );
        notification
    }

    pub fn list(&self, user_id: Uuid, unread_only: bool) -> Vec<Notification> {
        Notification::find_by_user_id(&self.db.notifications, user_id, unread_only)
    }

    pub fn unread_count(&self, user_id: Uuid) -> usize {
        Notification::unread_count(&self.db.notifications, user_id)
    }

    /// `None` when the notification does not exist or belongs to someone else.
    pub fn mark_read(&self, user_id: Uuid, id: Uuid) -> Option<Notification> {
        let existing = Notification::find_by_id(&self.db.notifications, id)?;
        if existing.user_id != user_id {
            return None;
        }
        Notification::mark_read(&self.db.notifications, id)
    }

    pub fn mark_all_read(&self, user_id: Uuid) -> usize {
        let count = Notification::mark_all_read(&self.db.notifications, user_id);
        debug!(user_id = %user_id, count, "Marked notifications read");
        count
    }
}

#[cfg(test)]
mod tests {
    use db::models::notification::NotificationType;

    use super::*;

    fn mention(user_id: Uuid) -> CreateNotification {
        CreateNotification {
            user_id,
            notification_type: NotificationType::Mention,
            title: "You were mentioned".into(),
            message: "hi".into(),
            deliverable_id: None,
            comment_id: None,
            from_user_id: None,
        }
    }

    #[test]
    fn test_mark_read_checks_owner() {
        let service = NotificationService::new(Arc::new(DBService::in_memory()));
        let owner = Uuid::new_v4();
        let notification = service.notify(mention(owner));

        assert!(service.mark_read(Uuid::new_v4(), notification.id).is_none());
        assert_eq!(service.unread_count(owner), 1);
        assert!(service.mark_read(owner, notification.id).unwrap().read);
        assert_eq!(service.unread_count(owner), 0);
    }

    #[test]
    fn test_list_unread_only() {
        let service = NotificationService::new(Arc::new(DBService::in_memory()));
        let user = Uuid::new_v4();
        service.notify(mention(user));
        service.notify(mention(user));
        assert_eq!(service.mark_all_read(user), 2);
        service.notify(mention(user));

        assert_eq!(service.list(user, true).len(), 1);
        assert_eq!(service.list(user, false).len(), 3);
    }
}
