use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use ts_rs::TS;

use crate::{
    models::{
        deliverable::DeliverableStatus, initiative::InitiativeStatus,
        milestone::MilestoneStatus, project::ProjectStatus,
    },
    validation::allowed_values,
};

/// The four planning levels, used where a row points at "any entity".
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityType {
    Initiative,
    Project,
    Milestone,
    Deliverable,
}

impl EntityType {
    /// Built-in status values, in workflow order.
    pub fn default_statuses(self) -> Vec<String> {
        match self {
            EntityType::Initiative => allowed_values::<InitiativeStatus>(),
            EntityType::Project => allowed_values::<ProjectStatus>(),
            EntityType::Milestone => allowed_values::<MilestoneStatus>(),
            EntityType::Deliverable => allowed_values::<DeliverableStatus>(),
        }
    }

    pub fn all() -> Vec<EntityType> {
        EntityType::iter().collect()
    }
}
