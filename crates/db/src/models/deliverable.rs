use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    impl_record,
    store::RecordStore,
    validation::{
        Validate, ValidationError, check_enum, normalize_tags, parse_or_default, reject_blank,
        require_id, require_text,
    },
};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, EnumIter,
    Default,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DeliverableStatus {
    #[default]
    Todo,
    InProgress,
    InReview,
    Done,
    Blocked,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, EnumIter,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeliverablePriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// A task: the leaf of initiative -> project -> milestone -> deliverable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub id: Uuid,
    pub milestone_id: Uuid, // Foreign key to Milestone
    pub name: String,
    pub description: String,
    pub status: DeliverableStatus,
    pub priority: DeliverablePriority,
    pub assignee_id: Option<Uuid>, // Foreign key to User
    pub due_date: Option<NaiveDate>,
    pub jira_issue_key: Option<String>, // e.g. "ROAD-142"
    pub jira_issue_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Deliverable, "deliverables");

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliverable {
    pub milestone_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub jira_issue_key: Option<String>,
    pub jira_issue_id: Option<String>,
    pub labels: Option<Vec<String>>,
    pub custom_fields: Option<BTreeMap<String, Value>>,
}

impl CreateDeliverable {
    pub fn new(milestone_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            milestone_id: Some(milestone_id),
            name: name.into(),
            ..Default::default()
        }
    }
}

fn check_jira_pair(key: Option<&str>, id: Option<&str>, errors: &mut Vec<String>) {
    if id.is_some() && key.is_none_or(|k| k.trim().is_empty()) {
        errors.push("Jira issue key is required when a Jira issue id is set".to_string());
    }
}

impl Validate for CreateDeliverable {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&self.name, "Name is required", &mut errors);
        require_id(self.milestone_id.as_ref(), "Milestone ID is required", &mut errors);
        check_enum::<DeliverableStatus>(self.status.as_deref(), "status", &mut errors);
        check_enum::<DeliverablePriority>(self.priority.as_deref(), "priority", &mut errors);
        check_jira_pair(
            self.jira_issue_key.as_deref(),
            self.jira_issue_id.as_deref(),
            &mut errors,
        );
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliverable {
    pub milestone_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Uuid>")]
    pub assignee_id: Option<Option<Uuid>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<NaiveDate>")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<String>")]
    pub jira_issue_key: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<String>")]
    pub jira_issue_id: Option<Option<String>>,
    pub labels: Option<Vec<String>>,
    /// Merged key by key; a `null` value removes the key.
    pub custom_fields: Option<BTreeMap<String, Value>>,
}

impl Validate for UpdateDeliverable {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        reject_blank(self.name.as_deref(), "Name", &mut errors);
        check_enum::<DeliverableStatus>(self.status.as_deref(), "status", &mut errors);
        check_enum::<DeliverablePriority>(self.priority.as_deref(), "priority", &mut errors);
        // The Jira pair depends on the stored record, see `Deliverable::update`.
        errors
    }
}

impl Deliverable {
    pub fn find_all(store: &RecordStore<Self>) -> Vec<Self> {
        store.all()
    }

    pub fn find_by_id(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.find_by_id(id)
    }

    pub fn find_by_milestone_id(store: &RecordStore<Self>, milestone_id: Uuid) -> Vec<Self> {
        store.query(|deliverable| deliverable.milestone_id == milestone_id)
    }

    pub fn find_by_assignee_id(store: &RecordStore<Self>, assignee_id: Uuid) -> Vec<Self> {
        store.query(|deliverable| deliverable.assignee_id == Some(assignee_id))
    }

    pub fn find_by_jira_issue_key(store: &RecordStore<Self>, key: &str) -> Option<Self> {
        store.find_one(|deliverable| {
            deliverable
                .jira_issue_key
                .as_deref()
                .is_some_and(|k| k.eq_ignore_ascii_case(key))
        })
    }

    pub fn create(
        store: &RecordStore<Self>,
        data: &CreateDeliverable,
    ) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let milestone_id = data
            .milestone_id
            .ok_or_else(|| ValidationError(vec!["Milestone ID is required".into()]))?;
        let now = Utc::now();
        Ok(store.insert(Deliverable {
            id: Uuid::nil(),
            milestone_id,
            name: data.name.trim().to_string(),
            description: data.description.clone().unwrap_or_default(),
            status: parse_or_default(data.status.as_deref()),
            priority: parse_or_default(data.priority.as_deref()),
            assignee_id: data.assignee_id,
            due_date: data.due_date,
            jira_issue_key: data.jira_issue_key.clone(),
            jira_issue_id: data.jira_issue_id.clone(),
            labels: normalize_tags(data.labels.as_deref().unwrap_or_default()),
            custom_fields: data.custom_fields.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn update(
        store: &RecordStore<Self>,
        id: Uuid,
        data: &UpdateDeliverable,
    ) -> Result<Option<Self>, ValidationError> {
        data.ensure_valid()?;

        if let Some(existing) = store.find_by_id(id) {
            let key = data
                .jira_issue_key
                .as_ref()
                .unwrap_or(&existing.jira_issue_key);
            let issue_id = data
                .jira_issue_id
                .as_ref()
                .unwrap_or(&existing.jira_issue_id);
            let mut errors = Vec::new();
            check_jira_pair(key.as_deref(), issue_id.as_deref(), &mut errors);
            if !errors.is_empty() {
                return Err(ValidationError(errors));
            }
        }

        Ok(store.update(id, |deliverable| deliverable.apply(data)))
    }

    fn apply(&mut self, data: &UpdateDeliverable) {
        if let Some(milestone_id) = data.milestone_id {
            self.milestone_id = milestone_id;
        }
        if let Some(name) = &data.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &data.description {
            self.description = description.clone();
        }
        if let Some(status) = data.status.as_deref() {
            self.status = parse_or_default(Some(status));
        }
        if let Some(priority) = data.priority.as_deref() {
            self.priority = parse_or_default(Some(priority));
        }
        if let Some(assignee_id) = data.assignee_id {
            self.assignee_id = assignee_id;
        }
        if let Some(due_date) = data.due_date {
            self.due_date = due_date;
        }
        if let Some(key) = &data.jira_issue_key {
            self.jira_issue_key = key.clone();
        }
        if let Some(issue_id) = &data.jira_issue_id {
            self.jira_issue_id = issue_id.clone();
        }
        if let Some(labels) = &data.labels {
            self.labels = normalize_tags(labels);
        }
        if let Some(fields) = &data.custom_fields {
            for (key, value) in fields {
                if value.is_null() {
                    self.custom_fields.remove(key);
                } else {
                    self.custom_fields.insert(key.clone(), value.clone());
                }
            }
        }
    }

    pub fn delete(store: &RecordStore<Self>, id: Uuid) -> bool {
        store.delete(id)
    }
}
