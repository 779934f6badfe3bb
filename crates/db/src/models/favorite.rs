use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{impl_record, models::entity_type::EntityType, store::RecordStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Favorite, "favorites");

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavorite {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub team_id: Option<Uuid>,
}

impl Favorite {
    /// Favorites of `user_id`, optionally limited to one team.
    pub fn find_by_user_id(
        store: &RecordStore<Self>,
        user_id: Uuid,
        team_id: Option<Uuid>,
    ) -> Vec<Self> {
        store.query(|favorite| {
            favorite.user_id == user_id && team_id.is_none_or(|team| favorite.team_id == Some(team))
        })
    }

    fn find(
        store: &RecordStore<Self>,
        user_id: Uuid,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Option<Self> {
        store.find_one(|favorite| {
            favorite.user_id == user_id
                && favorite.entity_type == entity_type
                && favorite.entity_id == entity_id
        })
    }

    pub fn is_favorite(
        store: &RecordStore<Self>,
        user_id: Uuid,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> bool {
        Self::find(store, user_id, entity_type, entity_id).is_some()
    }

    /// Idempotent: returns the existing favorite when already present.
    pub fn add(store: &RecordStore<Self>, user_id: Uuid, data: &ToggleFavorite) -> Self {
        if let Some(existing) = Self::find(store, user_id, data.entity_type, data.entity_id) {
            return existing;
        }
        let now = Utc::now();
        store.insert(Favorite {
            id: Uuid::nil(),
            user_id,
            entity_type: data.entity_type,
            entity_id: data.entity_id,
            team_id: data.team_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn remove(
        store: &RecordStore<Self>,
        user_id: Uuid,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> bool {
        store.delete_where(|favorite| {
            favorite.user_id == user_id
                && favorite.entity_type == entity_type
                && favorite.entity_id == entity_id
        }) > 0
    }

    /// Flips the favorite and returns whether it is now set.
    pub fn toggle(store: &RecordStore<Self>, user_id: Uuid, data: &ToggleFavorite) -> bool {
        if Self::remove(store, user_id, data.entity_type, data.entity_id) {
            false
        } else {
            Self::add(store, user_id, data);
            true
        }
    }

    /// Drops every user's favorite pointing at one of `entity_ids`.
    pub fn delete_for_entities(
        store: &RecordStore<Self>,
        entity_type: EntityType,
        entity_ids: &[Uuid],
    ) -> usize {
        store.delete_where(|favorite| {
            favorite.entity_type == entity_type && entity_ids.contains(&favorite.entity_id)
        })
    }
}
