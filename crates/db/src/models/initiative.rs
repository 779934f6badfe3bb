use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    impl_record,
    store::RecordStore,
    validation::{
        Validate, ValidationError, check_enum, normalize_tags, parse_or_default, reject_blank,
        require_text,
    },
};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, EnumIter,
    Default,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InitiativeStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: InitiativeStatus,
    pub target_date: Option<NaiveDate>,
    pub owner: Option<String>, // Free text or a user's display name
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Initiative, "initiatives");

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateInitiative {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub owner: Option<String>,
    pub team_id: Option<Uuid>,
    pub tags: Option<Vec<String>>,
}

impl CreateInitiative {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Validate for CreateInitiative {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&self.name, "Name is required", &mut errors);
        check_enum::<InitiativeStatus>(self.status.as_deref(), "status", &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInitiative {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<NaiveDate>")]
    pub target_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<String>")]
    pub owner: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<Uuid>")]
    pub team_id: Option<Option<Uuid>>,
    pub tags: Option<Vec<String>>,
}

impl Validate for UpdateInitiative {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        reject_blank(self.name.as_deref(), "Name", &mut errors);
        check_enum::<InitiativeStatus>(self.status.as_deref(), "status", &mut errors);
        errors
    }
}

impl Initiative {
    pub fn find_all(store: &RecordStore<Self>) -> Vec<Self> {
        store.all()
    }

    pub fn find_by_id(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.find_by_id(id)
    }

    pub fn find_by_team_id(store: &RecordStore<Self>, team_id: Uuid) -> Vec<Self> {
        store.query(|initiative| initiative.team_id == Some(team_id))
    }

    pub fn create(
        store: &RecordStore<Self>,
        data: &CreateInitiative,
    ) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let now = Utc::now();
        Ok(store.insert(Initiative {
            id: Uuid::nil(),
            name: data.name.trim().to_string(),
            description: data.description.clone().unwrap_or_default(),
            status: parse_or_default(data.status.as_deref()),
            target_date: data.target_date,
            owner: data.owner.clone(),
            team_id: data.team_id,
            tags: normalize_tags(data.tags.as_deref().unwrap_or_default()),
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn update(
        store: &RecordStore<Self>,
        id: Uuid,
        data: &UpdateInitiative,
    ) -> Result<Option<Self>, ValidationError> {
        data.ensure_valid()?;
        Ok(store.update(id, |initiative| {
            if let Some(name) = &data.name {
                initiative.name = name.trim().to_string();
            }
            if let Some(description) = &data.description {
                initiative.description = description.clone();
            }
            if let Some(status) = data.status.as_deref() {
                initiative.status = parse_or_default(Some(status));
            }
            if let Some(target_date) = data.target_date {
                initiative.target_date = target_date;
            }
            if let Some(owner) = &data.owner {
                initiative.owner = owner.clone();
            }
            if let Some(team_id) = data.team_id {
                initiative.team_id = team_id;
            }
            if let Some(tags) = &data.tags {
                initiative.tags = normalize_tags(tags);
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
    fn test_create_applies_defaults() {
        let store = RecordStore::in_memory();
        let initiative = Initiative::create(
            &store,
            &CreateInitiative {
                status: Some("planning".into()),
                ..CreateInitiative::named("Q3 Launch")
            },
        )
        .unwrap();

        assert!(!initiative.id.to_string().is_empty());
        assert_eq!(initiative.name, "Q3 Launch");
        assert_eq!(initiative.status, InitiativeStatus::Planning);
        assert_eq!(initiative.description, "");
        assert!(initiative.tags.is_empty());
        assert_eq!(initiative.created_at, initiative.updated_at);

        let json = serde_json::to_value(&initiative).unwrap();
        assert_eq!(json["status"], "planning");
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_create_then_find_returns_the_input() {
        let store = RecordStore::in_memory();
        let data = CreateInitiative {
            description: Some("Ship the thing".into()),
            status: Some("on-hold".into()),
            target_date: NaiveDate::from_ymd_opt(2025, 9, 30),
            owner: Some("Dana".into()),
            tags: Some(vec!["growth".into()]),
            ..CreateInitiative::named("Platform")
        };
        let created = Initiative::create(&store, &data).unwrap();
        let found = Initiative::find_by_id(&store, created.id).unwrap();

        assert_eq!(found, created);
        assert_eq!(found.status, InitiativeStatus::OnHold);
        assert_eq!(found.target_date, data.target_date);
        assert_eq!(found.owner.as_deref(), Some("Dana"));
        assert_eq!(found.tags, vec!["growth"]);
    }

    #[test]
    fn test_create_rejects_missing_name_and_bad_status() {
        let store = RecordStore::in_memory();
        let err = Initiative::create(
            &store,
            &CreateInitiative {
                status: Some("paused".into()),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert_eq!(err.messages().len(), 2);
        assert!(err.to_string().contains("Name is required"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_rejects_invalid_status_and_keeps_record() {
        let store = RecordStore::in_memory();
        let created = Initiative::create(&store, &CreateInitiative::named("Q3 Launch")).unwrap();

        let err = Initiative::update(
            &store,
            created.id,
            &UpdateInitiative {
                status: Some("archived".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid status: archived"));
        assert_eq!(Initiative::find_by_id(&store, created.id), Some(created));
    }

    #[test]
    fn test_update_validates_name_too() {
        let store = RecordStore::in_memory();
        let created = Initiative::create(&store, &CreateInitiative::named("Q3 Launch")).unwrap();

        let err = Initiative::update(
            &store,
            created.id,
            &UpdateInitiative {
                name: Some("   ".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Name cannot be empty");
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let store = RecordStore::in_memory();
        Initiative::create(&store, &CreateInitiative::named("Q3 Launch")).unwrap();

        let result = Initiative::update(
            &store,
            Uuid::new_v4(),
            &UpdateInitiative {
                name: Some("x".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(result.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_patch_can_clear_nullable_fields() {
        let store = RecordStore::in_memory();
        let created = Initiative::create(
            &store,
            &CreateInitiative {
                owner: Some("Dana".into()),
                ..CreateInitiative::named("Q3 Launch")
            },
        )
        .unwrap();

        let patch: UpdateInitiative = serde_json::from_value(serde_json::json!({
            "owner": null,
            "status": "active"
        }))
        .unwrap();
        let updated = Initiative::update(&store, created.id, &patch).unwrap().unwrap();

        assert_eq!(updated.owner, None);
        assert_eq!(updated.status, InitiativeStatus::Active);
        assert_eq!(updated.name, "Q3 Launch");
        assert!(updated.updated_at >= created.updated_at);
    }
}
