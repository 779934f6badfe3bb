use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    impl_record,
    store::RecordStore,
    validation::{Validate, ValidationError, reject_blank, require_text},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(User, "users");

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub avatar_url: Option<String>,
}

impl CreateUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            avatar_url: None,
        }
    }
}

impl Validate for CreateUser {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&self.name, "Name is required", &mut errors);
        if self.email.trim().is_empty() {
            errors.push("Email is required".to_string());
        } else if !self.email.contains('@') {
            errors.push(format!("Invalid email: {}", self.email));
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(optional, as = "Option<String>")]
    pub avatar_url: Option<Option<String>>,
}

impl Validate for UpdateUser {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        reject_blank(self.name.as_deref(), "Name", &mut errors);
        errors
    }
}

impl User {
    /// Handles this user answers to in `@mention`s, lowercased.
    pub fn handles(&self) -> Vec<String> {
        let mut handles = Vec::with_capacity(2);
        if let Some((local, _)) = self.email.split_once('@') {
            handles.push(local.to_lowercase());
        }
        let compact: String = self
            .name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if !compact.is_empty() && !handles.contains(&compact) {
            handles.push(compact);
        }
        handles
    }

    pub fn find_all(store: &RecordStore<Self>) -> Vec<Self> {
        store.all()
    }

    pub fn find_by_id(store: &RecordStore<Self>, id: Uuid) -> Option<Self> {
        store.find_by_id(id)
    }

    pub fn find_by_email(store: &RecordStore<Self>, email: &str) -> Option<Self> {
        let email = email.trim();
        store.find_one(|user| user.email.eq_ignore_ascii_case(email))
    }

    pub fn find_by_handle(store: &RecordStore<Self>, handle: &str) -> Option<Self> {
        let handle = handle.to_lowercase();
        store.find_one(|user| user.handles().contains(&handle))
    }

    pub fn create(store: &RecordStore<Self>, data: &CreateUser) -> Result<Self, ValidationError> {
        data.ensure_valid()?;
        if Self::find_by_email(store, &data.email).is_some() {
            return Err(ValidationError(vec!["Email is already in use".to_string()]));
        }
        let now = Utc::now();
        Ok(store.insert(User {
            id: Uuid::nil(),
            name: data.name.trim().to_string(),
            email: data.email.trim().to_string(),
            avatar_url: data.avatar_url.clone(),
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn update(
        store: &RecordStore<Self>,
        id: Uuid,
        data: &UpdateUser,
    ) -> Result<Option<Self>, ValidationError> {
        data.ensure_valid()?;
        Ok(store.update(id, |user| {
            if let Some(name) = &data.name {
                user.name = name.trim().to_string();
            }
            if let Some(avatar_url) = &data.avatar_url {
                user.avatar_url = avatar_url.clone();
            }
        }))
    }

    pub fn delete(store: &RecordStore<Self>, id: Uuid) -> bool {
        store.delete(id)
    }
}
