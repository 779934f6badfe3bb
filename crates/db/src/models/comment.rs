use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    impl_record,
    store::RecordStore,
    validation::{Validate, ValidationError, require_text},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub deliverable_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    /// Always a top-level comment; replies are never nested deeper.
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Comment, "comments");

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    #[serde(default)]
    pub content: String,
    pub parent_id: Option<Uuid>,
}

impl Validate for CreateComment {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&self.content, "Content is required", &mut errors);
        errors
    }
}

impl Comment {
    pub fn find_by_id(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.find_by_id(id)
    }

    /// Oldest first.
    pub fn find_by_deliverable_id(store: &RecordStore<Self>, deliverable_id: Uuid) -> Vec<Self> {
        let mut comments = store.query(|comment| comment.deliverable_id == deliverable_id);
        comments.sort_by_key(|comment| comment.created_at);
        comments
    }

    pub fn find_replies(store: &RecordStore<Self>, parent_id: Uuid) -> Vec<Self> {
        let mut replies = store.query(|comment| comment.parent_id == Some(parent_id));
        replies.sort_by_key(|comment| comment.created_at);
        replies
    }

    pub fn create(
        store: &RecordStore<Self>,
        deliverable_id: Uuid,
        user_id: Uuid,
        data: &CreateComment,
    ) -> Result<Self, ValidationError> {
        data.ensure_valid()?;

        let parent_id = match data.parent_id {
            None => None,
            Some(parent_id) => {
                let parent = store
                    .find_by_id(parent_id)
                    .ok_or_else(|| ValidationError(vec!["Parent comment not found".into()]))?;
                if parent.deliverable_id != deliverable_id {
                    return Err(ValidationError(vec![
                        "Parent comment belongs to a different deliverable".into(),
                    ]));
                }
                Some(parent.parent_id.unwrap_or(parent.id))
            }
        };

        let now = Utc::now();
        Ok(store.insert(Comment {
            id: Uuid::nil(),
            deliverable_id,
            user_id,
            content: data.content.trim().to_string(),
            parent_id,
            created_at: now,
            updated_at: now,
        }))
    }

    /// Deletes the comment and its replies. Returns how many were removed.
    pub fn delete(store: &RecordStore<Self>, id: Uuid) -> usize {
        store.delete_where(|comment| comment.id == id || comment.parent_id == Some(id))
    }
}
