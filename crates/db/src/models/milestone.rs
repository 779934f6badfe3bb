use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    impl_record,
    store::RecordStore,
    validation::{
        Validate, ValidationError, check_enum, parse_or_default, reject_blank, require_id,
        require_text,
    },
};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, EnumIter,
    Default,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MilestoneStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    AtRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub project_id: Uuid, // Foreign key to Project
    pub name: String,
    pub description: String,
    pub status: MilestoneStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Milestone, "milestones");

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestone {
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl CreateMilestone {
    pub fn new(project_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id),
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Validate for CreateMilestone {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&self.name, "Name is required", &mut errors);
        require_id(self.project_id.as_ref(), "Project ID is required", &mut errors);
        check_enum::<MilestoneStatus>(self.status.as_deref(), "status", &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestone {
    pub project_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<NaiveDate>")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl Validate for UpdateMilestone {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        reject_blank(self.name.as_deref(), "Name", &mut errors);
        check_enum::<MilestoneStatus>(self.status.as_deref(), "status", &mut errors);
        errors
    }
}

impl Milestone {
    pub fn find_all(store: &RecordStore<Self>) -> Vec<Self> {
        store.all()
    }

    pub fn find_by_id(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.find_by_id(id)
    }

    pub fn find_by_project_id(store: &RecordStore<Self>, project_id: Uuid) -> Vec<Self> {
        store.query(|milestone| milestone.project_id == project_id)
    }

    pub fn create(
        store: &RecordStore<Self>,
        data: &CreateMilestone,
    ) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let project_id = data
            .project_id
            .ok_or_else(|| ValidationError(vec!["Project ID is required".into()]))?;
        let now = Utc::now();
        Ok(store.insert(Milestone {
            id: Uuid::nil(),
            project_id,
            name: data.name.trim().to_string(),
            description: data.description.clone().unwrap_or_default(),
            status: parse_or_default(data.status.as_deref()),
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn update(
        store: &RecordStore<Self>,
        id: Uuid,
        data: &UpdateMilestone,
    ) -> Result<Option<Self>, ValidationError> {
        data.ensure_valid()?;
        Ok(store.update(id, |milestone| {
            if let Some(project_id) = data.project_id {
                milestone.project_id = project_id;
            }
            if let Some(name) = &data.name {
                milestone.name = name.trim().to_string();
            }
            if let Some(description) = &data.description {
                milestone.description = description.clone();
            }
            if let Some(status) = data.status.as_deref() {
                milestone.status = parse_or_default(Some(status));
            }
            if let Some(due_date) = data.due_date {
                milestone.due_date = due_date;
            }
        }))
    }

    pub fn delete(store: &RecordStore<Self>, id: Uuid) -> bool {
        store.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_project_id_returns_only_matching_milestones() {
        let store = RecordStore::in_memory();
        let project = Uuid::new_v4();
        let other_project = Uuid::new_v4();
        let alpha = Milestone::create(&store, &CreateMilestone::new(project, "Alpha")).unwrap();
        Milestone::create(&store, &CreateMilestone::new(other_project, "Elsewhere")).unwrap();
        let beta = Milestone::create(&store, &CreateMilestone::new(project, "Beta")).unwrap();

        let found = Milestone::find_by_project_id(&store, project);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&alpha));
        assert!(found.contains(&beta));
    }

    #[test]
    fn test_at_risk_round_trips_through_json() {
        let store = RecordStore::in_memory();
        let milestone = Milestone::create(
            &store,
            &CreateMilestone {
                status: Some("at-risk".into()),
                ..CreateMilestone::new(Uuid::new_v4(), "Beta")
            },
        )
        .unwrap();
        assert_eq!(milestone.status, MilestoneStatus::AtRisk);
    }

    #[test]
    fn test_missing_project_id_message() {
        let store = RecordStore::in_memory();
        let err = Milestone::create(
            &store,
            &CreateMilestone {
                name: "Beta".into(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Project ID is required"));
    }

    #[test]
    fn test_due_date_can_be_cleared() {
        let store = RecordStore::in_memory();
        let milestone = Milestone::create(
            &store,
            &CreateMilestone {
                due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
                ..CreateMilestone::new(Uuid::new_v4(), "Beta")
            },
        )
        .unwrap();

        let updated = Milestone::update(
            &store,
            milestone.id,
            &UpdateMilestone {
                due_date: Some(None),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.due_date, None);
    }

    #[test]
    fn test_create_invalid_status_is_rejected() {
        let store = RecordStore::in_memory();
        let err = Milestone::create(
            &store,
            &CreateMilestone {
                status: Some("late".into()),
                ..CreateMilestone::new(Uuid::new_v4(), "Beta")
            },
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid status: late. Must be one of: not-started, in-progress, completed, at-risk"
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_invalid_status_leaves_milestone_unchanged() {
        let store = RecordStore::in_memory();
        let milestone = Milestone::create(&store, &CreateMilestone::new(Uuid::new_v4(), "Beta"))
            .unwrap();

        let err = Milestone::update(
            &store,
            milestone.id,
            &UpdateMilestone {
                status: Some("late".into()),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert!(err.to_string().contains("Invalid status: late"));
        assert_eq!(store.all(), vec![milestone]);
    }
}
