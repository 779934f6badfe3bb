//! Per-team vocabularies: custom statuses, labels and priorities.
//!
//! A team without custom entries falls back to the built-in enum values.
//! Custom entries are display vocabulary only: entity `status` and
//! `priority` fields are always validated against the built-in enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    impl_record,
    models::{deliverable::DeliverablePriority, entity_type::EntityType},
    store::RecordStore,
    validation::{Validate, ValidationError, allowed_values, check_color, require_text},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatus {
    pub id: Uuid,
    pub team_id: Uuid,
    pub entity_type: EntityType,
    pub name: String,
    pub color: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(TeamStatus, "team_statuses");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TeamLabel {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(TeamLabel, "team_labels");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TeamPriority {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(TeamPriority, "team_priorities");

/// Payload shared by all three vocabularies. `position` is ignored for labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateVocabularyEntry {
    #[serde(default)]
    pub name: String,
    pub color: Option<String>,
    pub position: Option<i32>,
}

impl Validate for CreateVocabularyEntry {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&self.name, "Name is required", &mut errors);
        check_color(self.color.as_deref(), &mut errors);
        errors
    }
}

impl TeamStatus {
    pub fn find_by_team(
        store: &RecordStore<Self>,
        team_id: Uuid,
        entity_type: EntityType,
    ) -> Vec<Self> {
        let mut statuses =
            store.query(|status| status.team_id == team_id && status.entity_type == entity_type);
        statuses.sort_by_key(|status| status.position);
        statuses
    }

    /// Status names a team board shows for `entity_type`. These do not widen
    /// what an entity can store.
    pub fn effective_statuses(
        store: &RecordStore<Self>,
        team_id: Uuid,
        entity_type: EntityType,
    ) -> Vec<String> {
        let custom = Self::find_by_team(store, team_id, entity_type);
        if custom.is_empty() {
            entity_type.default_statuses()
        } else {
            custom.into_iter().map(|status| status.name).collect()
        }
    }

    pub fn create(
        store: &RecordStore<Self>,
        team_id: Uuid,
        entity_type: EntityType,
        data: &CreateVocabularyEntry,
    ) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let position = data
            .position
            .unwrap_or_else(|| Self::find_by_team(store, team_id, entity_type).len() as i32);
        let now = Utc::now();
        Ok(store.insert(TeamStatus {
            id: Uuid::nil(),
            team_id,
            entity_type,
            name: data.name.trim().to_string(),
            color: data.color.clone(),
            position,
            created_at: now,
            updated_at: now,
        }))
    }
}

impl TeamLabel {
    pub fn find_by_team_id(store: &RecordStore<Self>, team_id: Uuid) -> Vec<Self> {
        let mut labels = store.query(|label| label.team_id == team_id);
        labels.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        labels
    }

    pub fn create(
        store: &RecordStore<Self>,
        team_id: Uuid,
        data: &CreateVocabularyEntry,
    ) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let name = data.name.trim();
        if store
            .find_one(|label| label.team_id == team_id && label.name.eq_ignore_ascii_case(name))
            .is_some()
        {
            return Err(ValidationError(vec![format!(
                "Label already exists: {name}"
            )]));
        }
        let now = Utc::now();
        Ok(store.insert(TeamLabel {
            id: Uuid::nil(),
            team_id,
            name: name.to_string(),
            color: data.color.clone(),
            created_at: now,
            updated_at: now,
        }))
    }
}

impl TeamPriority {
    pub fn find_by_team_id(store: &RecordStore<Self>, team_id: Uuid) -> Vec<Self> {
        let mut priorities = store.query(|priority| priority.team_id == team_id);
        priorities.sort_by_key(|priority| priority.position);
        priorities
    }

    pub fn effective_priorities(store: &RecordStore<Self>, team_id: Uuid) -> Vec<String> {
        let custom = Self::find_by_team_id(store, team_id);
        if custom.is_empty() {
            allowed_values::<DeliverablePriority>()
        } else {
            custom.into_iter().map(|priority| priority.name).collect()
        }
    }

    pub fn create(
        store: &RecordStore<Self>,
        team_id: Uuid,
        data: &CreateVocabularyEntry,
    ) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let position = data
            .position
            .unwrap_or_else(|| Self::find_by_team_id(store, team_id).len() as i32);
        let now = Utc::now();
        Ok(store.insert(TeamPriority {
            id: Uuid::nil(),
            team_id,
            name: data.name.trim().to_string(),
            color: data.color.clone(),
            position,
            created_at: now,
            updated_at: now,
        }))
    }
}
