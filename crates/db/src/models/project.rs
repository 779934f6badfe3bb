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
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub initiative_id: Uuid, // Foreign key to Initiative
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub lead_id: Option<Uuid>, // Foreign key to User
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Project, "projects");

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub initiative_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub lead_id: Option<Uuid>,
    pub target_date: Option<NaiveDate>,
}

impl CreateProject {
    pub fn new(initiative_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            initiative_id: Some(initiative_id),
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Validate for CreateProject {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&self.name, "Name is required", &mut errors);
        require_id(self.initiative_id.as_ref(), "Initiative ID is required", &mut errors);
        check_enum::<ProjectStatus>(self.status.as_deref(), "status", &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub initiative_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Uuid>")]
    pub lead_id: Option<Option<Uuid>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<NaiveDate>")]
    pub target_date: Option<Option<NaiveDate>>,
}

impl Validate for UpdateProject {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        reject_blank(self.name.as_deref(), "Name", &mut errors);
        check_enum::<ProjectStatus>(self.status.as_deref(), "status", &mut errors);
        errors
    }
}

impl Project {
    pub fn find_all(store: &RecordStore<Self>) -> Vec<Self> {
        store.all()
    }

    pub fn find_by_id(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.find_by_id(id)
    }

    pub fn find_by_initiative_id(store: &RecordStore<Self>, initiative_id: Uuid) -> Vec<Self> {
        store.query(|project| project.initiative_id == initiative_id)
    }

    pub fn find_by_lead_id(store: &RecordStore<Self>, lead_id: Uuid) -> Vec<Self> {
        store.query(|project| project.lead_id == Some(lead_id))
    }

    pub fn create(store: &RecordStore<Self>, data: &CreateProject) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let initiative_id = data
            .initiative_id
            .ok_or_else(|| ValidationError(vec!["Initiative ID is required".into()]))?;
        let now = Utc::now();
        Ok(store.insert(Project {
            id: Uuid::nil(),
            initiative_id,
            name: data.name.trim().to_string(),
            description: data.description.clone().unwrap_or_default(),
            status: parse_or_default(data.status.as_deref()),
            lead_id: data.lead_id,
            target_date: data.target_date,
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn update(
        store: &RecordStore<Self>,
        id: Uuid,
        data: &UpdateProject,
    ) -> Result<Option<Self>, ValidationError> {
        data.ensure_valid()?;
        Ok(store.update(id, |project| {
            if let Some(initiative_id) = data.initiative_id {
                project.initiative_id = initiative_id;
            }
            if let Some(name) = &data.name {
                project.name = name.trim().to_string();
            }
            if let Some(description) = &data.description {
                project.description = description.clone();
            }
            if let Some(status) = data.status.as_deref() {
                project.status = parse_or_default(Some(status));
            }
            if let Some(lead_id) = data.lead_id {
                project.lead_id = lead_id;
            }
            if let Some(target_date) = data.target_date {
                project.target_date = target_date;
            }
        }))
    }

    pub fn delete(store: &RecordStore<Self>, id: Uuid) -> bool {
        store.delete(id)
    }
}
