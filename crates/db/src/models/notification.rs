use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::{impl_record, store::RecordStore};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    Mention,
    Comment,
    TaskAssigned,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub deliverable_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub from_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Notification, "notifications");

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub deliverable_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub from_user_id: Option<Uuid>,
}

impl Notification {
    pub fn find_by_id(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.find_by_id(id)
    }

    /// Newest first.
    pub fn find_by_user_id(
        store: &RecordStore<Self>,
        user_id: Uuid,
        unread_only: bool,
    ) -> Vec<Self> {
        let mut notifications =
            store.query(|n| n.user_id == user_id && (!unread_only || !n.read));
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }

    pub fn unread_count(store: &RecordStore<Self>, user_id: Uuid) -> usize {
        store.query(|n| n.user_id == user_id && !n.read).len()
    }

    pub fn create(store: &RecordStore<Self>, data: CreateNotification) -> Self {
        let now = Utc::now();
        store.insert(Notification {
            id: Uuid::nil(),
            user_id: data.user_id,
            notification_type: data.notification_type,
            title: data.title,
            message: data.message,
            read: false,
            deliverable_id: data.deliverable_id,
            comment_id: data.comment_id,
            from_user_id: data.from_user_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn mark_read(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.update(id, |n| n.read = true)
    }

    /// Marks every unread notification of `user_id` as read and returns how
    /// many changed.
    pub fn mark_all_read(store: &RecordStore<Self>, user_id: Uuid) -> usize {
        store.update_where(|n| n.user_id == user_id && !n.read, |n| n.read = true)
    }

    /// Drops notifications that point at any of the given deliverables.
    pub fn delete_for_deliverables(store: &RecordStore<Self>, deliverable_ids: &[Uuid]) -> usize {
        store.delete_where(|n| {
            n.deliverable_id
                .is_some_and(|id| deliverable_ids.contains(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notify(store: &RecordStore<Notification>, user_id: Uuid, title: &str) -> Notification {
        Notification::create(
            store,
            CreateNotification {
                user_id,
                notification_type: NotificationType::Mention,
                title: title.into(),
                message: String::new(),
                deliverable_id: None,
                comment_id: None,
                from_user_id: None,
            },
        )
    }

    #[test]
    fn test_type_serializes_snake_case() {
        let store = RecordStore::in_memory();
        let n = notify(&store, Uuid::new_v4(), "hi");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "mention");
        assert_eq!(
            serde_json::to_value(NotificationType::TaskAssigned).unwrap(),
            "task_assigned"
        );
    }

    #[test]
    fn test_unread_count_and_mark_read() {
        let store = RecordStore::in_memory();
        let user = Uuid::new_v4();
        let first = notify(&store, user, "one");
        notify(&store, user, "two");
        notify(&store, Uuid::new_v4(), "elsewhere");

        assert_eq!(Notification::unread_count(&store, user), 2);
        assert!(Notification::mark_read(&store, first.id).unwrap().read);
        assert_eq!(Notification::unread_count(&store, user), 1);
        assert_eq!(Notification::find_by_user_id(&store, user, true).len(), 1);
        assert_eq!(Notification::find_by_user_id(&store, user, false).len(), 2);
    }

    #[test]
    fn test_mark_all_read_returns_changed_count() {
        let store = RecordStore::in_memory();
        let user = Uuid::new_v4();
        let first = notify(&store, user, "one");
        notify(&store, user, "two");
        notify(&store, user, "three");
        Notification::mark_read(&store, first.id);

        assert_eq!(Notification::mark_all_read(&store, user), 2);
        assert_eq!(Notification::mark_all_read(&store, user), 0);
        assert_eq!(Notification::unread_count(&store, user), 0);
    }

    #[test]
    fn test_mark_read_missing_is_none() {
        let store: RecordStore<Notification> = RecordStore::in_memory();
        assert!(Notification::mark_read(&store, Uuid::new_v4()).is_none());
    }
}
