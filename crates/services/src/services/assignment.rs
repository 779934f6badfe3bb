use std::sync::Arc;

use db::{
    DBService,
    models::{
        deliverable::{Deliverable, UpdateDeliverable},
        notification::{CreateNotification, NotificationType},
        user::User,
    },
    validation::ValidationError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::notification::NotificationService;

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Deliverable not found")]
    DeliverableNotFound,
    #[error("Unknown user: {0}")]
    UnknownUser(Uuid),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// `assigneeId: null` unassigns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AssignDeliverable {
    pub assignee_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct AssignmentService {
    db: Arc<DBService>,
    notifications: NotificationService,
}

impl AssignmentService {
    pub fn new(db: Arc<DBService>) -> Self {
        let notifications = NotificationService::new(db.clone());
        Self { db, notifications }
    }

    pub fn assign(
        &self,
        deliverable_id: Uuid,
        assignee_id: Option<Uuid>,
        actor_id: Uuid,
    ) -> Result<Deliverable, AssignmentError> {
        let current = Deliverable::find_by_id(&self.db.deliverables, deliverable_id)
            .ok_or(AssignmentError::DeliverableNotFound)?;
        let assignee = match assignee_id {
            Some(id) => Some(
                User::find_by_id(&self.db.users, id).ok_or(AssignmentError::UnknownUser(id))?,
            ),
            None => None,
        };

        let patch = UpdateDeliverable {
            assignee_id: Some(assignee_id),
            ..Default::default()
        };
        let updated = Deliverable::update(&self.db.deliverables, deliverable_id, &patch)?
            .ok_or(AssignmentError::DeliverableNotFound)?;
        info!(
            deliverable_id = %deliverable_id,
            assignee_id = ?assignee_id,
            actor_id = %actor_id,
            "Deliverable assigned"
        );

        if let Some(assignee) = assignee
            && current.assignee_id != Some(assignee.id)
            && assignee.id != actor_id
        {
            let actor_name = User::find_by_id(&self.db.users, actor_id)
                .map(|user| user.name)
                .unwrap_or_else(|| "Someone".to_string());
            self.notifications.notify(CreateNotification {
                user_id: assignee.id,
                notification_type: NotificationType::TaskAssigned,
                title: format!("{actor_name} assigned you to {}", updated.name),
                message: updated.description.clone(),
                deliverable_id: Some(deliverable_id),
                comment_id: None,
                from_user_id: Some(actor_id),
            });
        }

        Ok(updated)
    }
}
