use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    impl_record,
    store::RecordStore,
    validation::{Validate, ValidationError, check_enum, parse_or_default, require_text},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Team, "teams");

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeam {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

impl Validate for CreateTeam {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&self.name, "Name is required", &mut errors);
        errors
    }
}

impl Team {
    pub fn find_all(store: &RecordStore<Self>) -> Vec<Self> {
        store.all()
    }

    pub fn find_by_id(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.find_by_id(id)
    }

    pub fn create(store: &RecordStore<Self>, data: &CreateTeam) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let now = Utc::now();
        Ok(store.insert(Team {
            id: Uuid::nil(),
            name: data.name.trim().to_string(),
            description: data.description.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn delete(store: &RecordStore<Self>, id: Uuid) -> bool {
        store.delete(id)
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, EnumIter,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TeamRole {
    Owner,
    Admin,
    #[default]
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(TeamMember, "team_members");

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AddTeamMember {
    pub user_id: Option<Uuid>,
    pub role: Option<String>,
}

impl Validate for AddTeamMember {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.user_id.is_none() {
            errors.push("User ID is required".to_string());
        }
        check_enum::<TeamRole>(self.role.as_deref(), "role", &mut errors);
        errors
    }
}

impl TeamMember {
    pub fn find_by_team_id(store: &RecordStore<Self>, team_id: Uuid) -> Vec<Self> {
        store.query(|member| member.team_id == team_id)
    }

    pub fn find_by_user_id(store: &RecordStore<Self>, user_id: Uuid) -> Vec<Self> {
        store.query(|member| member.user_id == user_id)
    }

    /// Adds `user_id` to the team, or updates the role of an existing
    /// membership.
    pub fn add(
        store: &RecordStore<Self>,
        team_id: Uuid,
        data: &AddTeamMember,
    ) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        let user_id = data
            .user_id
            .ok_or_else(|| ValidationError(vec!["User ID is required".into()]))?;
        let role: TeamRole = parse_or_default(data.role.as_deref());

        if let Some(existing) =
            store.find_one(|member| member.team_id == team_id && member.user_id == user_id)
        {
            return Ok(store
                .update(existing.id, |member| member.role = role)
                .unwrap_or(existing));
        }

        let now = Utc::now();
        Ok(store.insert(TeamMember {
            id: Uuid::nil(),
            team_id,
            user_id,
            role,
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn remove(store: &RecordStore<Self>, team_id: Uuid, user_id: Uuid) -> bool {
        store.delete_where(|member| member.team_id == team_id && member.user_id == user_id) > 0
    }
}
