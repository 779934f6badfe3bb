//! Deleting a planning entity that still has children.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    DBService,
    models::{
        comment::Comment, deliverable::Deliverable, entity_type::EntityType, favorite::Favorite,
        milestone::Milestone, notification::Notification, project::Project,
    },
};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeletePolicy {
    /// Remove only the target; children keep a dangling parent id.
    #[default]
    Orphan,
    /// Refuse while children exist.
    Restrict,
    /// Remove the target and its whole subtree.
    Cascade,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeleteError {
    #[error("Cannot delete {entity}: {count} dependent record(s) exist")]
    HasChildren { entity: EntityType, count: usize },
}

/// Ids collected below one root, bottom level last.
#[derive(Debug, Default)]
struct Subtree {
    projects: Vec<Uuid>,
    milestones: Vec<Uuid>,
    deliverables: Vec<Uuid>,
}

impl DBService {
    fn milestone_subtree(&self, milestone_ids: Vec<Uuid>, subtree: &mut Subtree) {
        subtree.deliverables.extend(
            self.deliverables
                .query(|d| milestone_ids.contains(&d.milestone_id))
                .into_iter()
                .map(|d| d.id),
        );
        subtree.milestones.extend(milestone_ids);
    }

    fn project_subtree(&self, project_ids: Vec<Uuid>, subtree: &mut Subtree) {
        let milestones = self
            .milestones
            .query(|m| project_ids.contains(&m.project_id))
            .into_iter()
            .map(|m| m.id)
            .collect();
        subtree.projects.extend(project_ids);
        self.milestone_subtree(milestones, subtree);
    }

    fn remove_subtree(&self, subtree: &Subtree) {
        let Subtree {
            projects,
            milestones,
            deliverables,
        } = subtree;

        if !deliverables.is_empty() {
            self.comments
                .delete_where(|c| deliverables.contains(&c.deliverable_id));
            Notification::delete_for_deliverables(&self.notifications, deliverables);
            Favorite::delete_for_entities(&self.favorites, EntityType::Deliverable, deliverables);
            self.deliverables.delete_where(|d| deliverables.contains(&d.id));
        }
        if !milestones.is_empty() {
            Favorite::delete_for_entities(&self.favorites, EntityType::Milestone, milestones);
            self.milestones.delete_where(|m| milestones.contains(&m.id));
        }
        if !projects.is_empty() {
            Favorite::delete_for_entities(&self.favorites, EntityType::Project, projects);
            self.projects.delete_where(|p| projects.contains(&p.id));
        }
    }

    fn check_restrict(
        policy: DeletePolicy,
        entity: EntityType,
        count: usize,
    ) -> Result<(), DeleteError> {
        if policy == DeletePolicy::Restrict && count > 0 {
            return Err(DeleteError::HasChildren { entity, count });
        }
        Ok(())
    }

    /// Returns `Ok(false)` when no initiative has `id`.
    pub fn delete_initiative(&self, id: Uuid, policy: DeletePolicy) -> Result<bool, DeleteError> {
        if self.initiatives.find_by_id(id).is_none() {
            return Ok(false);
        }
        let children: Vec<Uuid> = Project::find_by_initiative_id(&self.projects, id)
            .into_iter()
            .map(|p| p.id)
            .collect();
        Self::check_restrict(policy, EntityType::Initiative, children.len())?;

        if policy == DeletePolicy::Cascade {
            let mut subtree = Subtree::default();
            self.project_subtree(children, &mut subtree);
            self.remove_subtree(&subtree);
            info!(
                initiative_id = %id,
                projects = subtree.projects.len(),
                milestones = subtree.milestones.len(),
                deliverables = subtree.deliverables.len(),
                "Cascade delete"
            );
        }
        Favorite::delete_for_entities(&self.favorites, EntityType::Initiative, &[id]);
        Ok(self.initiatives.delete(id))
    }

    pub fn delete_project(&self, id: Uuid, policy: DeletePolicy) -> Result<bool, DeleteError> {
        if self.projects.find_by_id(id).is_none() {
            return Ok(false);
        }
        let children: Vec<Uuid> = Milestone::find_by_project_id(&self.milestones, id)
            .into_iter()
            .map(|m| m.id)
            .collect();
        Self::check_restrict(policy, EntityType::Project, children.len())?;

        let mut subtree = Subtree::default();
        if policy == DeletePolicy::Cascade {
            self.milestone_subtree(children, &mut subtree);
        }
        subtree.projects.push(id);
        self.remove_subtree(&subtree);
        Ok(true)
    }

    pub fn delete_milestone(&self, id: Uuid, policy: DeletePolicy) -> Result<bool, DeleteError> {
        if self.milestones.find_by_id(id).is_none() {
            return Ok(false);
        }
        let children: Vec<Uuid> = Deliverable::find_by_milestone_id(&self.deliverables, id)
            .into_iter()
            .map(|d| d.id)
            .collect();
        Self::check_restrict(policy, EntityType::Milestone, children.len())?;

        let mut subtree = Subtree::default();
        if policy == DeletePolicy::Cascade {
            subtree.deliverables = children;
        }
        subtree.milestones.push(id);
        self.remove_subtree(&subtree);
        Ok(true)
    }

    /// Comments are the children of a deliverable.
    pub fn delete_deliverable(&self, id: Uuid, policy: DeletePolicy) -> Result<bool, DeleteError> {
        if self.deliverables.find_by_id(id).is_none() {
            return Ok(false);
        }
        let comments = Comment::find_by_deliverable_id(&self.comments, id).len();
        Self::check_restrict(policy, EntityType::Deliverable, comments)?;

        if policy == DeletePolicy::Cascade {
            self.remove_subtree(&Subtree {
                deliverables: vec![id],
                ..Default::default()
            });
        } else {
            Favorite::delete_for_entities(&self.favorites, EntityType::Deliverable, &[id]);
            self.deliverables.delete(id);
        }
        Ok(true)
    }
}
