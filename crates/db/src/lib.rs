use std::path::{Path, PathBuf};

use tracing::info;

pub mod cascade;
pub mod models;
pub mod store;
pub mod validation;

use models::{
    comment::Comment,
    deliverable::Deliverable,
    favorite::Favorite,
    initiative::Initiative,
    milestone::Milestone,
    notification::Notification,
    project::Project,
    team::{Team, TeamMember},
    team_vocabulary::{TeamLabel, TeamPriority, TeamStatus},
    user::User,
};
use store::RecordStore;

/// One store per collection, all rooted in the same data directory.
pub struct DBService {
    pub data_dir: Option<PathBuf>,
    pub initiatives: RecordStore<Initiative>,
    pub projects: RecordStore<Project>,
    pub milestones: RecordStore<Milestone>,
    pub deliverables: RecordStore<Deliverable>,
    pub users: RecordStore<User>,
    pub teams: RecordStore<Team>,
    pub team_members: RecordStore<TeamMember>,
    pub comments: RecordStore<Comment>,
    pub notifications: RecordStore<Notification>,
    pub favorites: RecordStore<Favorite>,
    pub team_statuses: RecordStore<TeamStatus>,
    pub team_labels: RecordStore<TeamLabel>,
    pub team_priorities: RecordStore<TeamPriority>,
}

impl DBService {
    pub fn open(data_dir: &Path) -> Self {
        let db = Self {
            data_dir: Some(data_dir.to_path_buf()),
            initiatives: RecordStore::open(data_dir),
            projects: RecordStore::open(data_dir),
            milestones: RecordStore::open(data_dir),
            deliverables: RecordStore::open(data_dir),
            users: RecordStore::open(data_dir),
            teams: RecordStore::open(data_dir),
            team_members: RecordStore::open(data_dir),
            comments: RecordStore::open(data_dir),
            notifications: RecordStore::open(data_dir),
            favorites: RecordStore::open(data_dir),
            team_statuses: RecordStore::open(data_dir),
            team_labels: RecordStore::open(data_dir),
            team_priorities: RecordStore::open(data_dir),
        };
        info!(
            data_dir = %data_dir.display(),
            initiatives = db.initiatives.len(),
            projects = db.projects.len(),
            milestones = db.milestones.len(),
            deliverables = db.deliverables.len(),
            users = db.users.len(),
            "Opened record stores"
        );
        db
    }

    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            initiatives: RecordStore::in_memory(),
            projects: RecordStore::in_memory(),
            milestones: RecordStore::in_memory(),
            deliverables: RecordStore::in_memory(),
            users: RecordStore::in_memory(),
            teams: RecordStore::in_memory(),
            team_members: RecordStore::in_memory(),
            comments: RecordStore::in_memory(),
            notifications: RecordStore::in_memory(),
            favorites: RecordStore::in_memory(),
            team_statuses: RecordStore::in_memory(),
            team_labels: RecordStore::in_memory(),
            team_priorities: RecordStore::in_memory(),
        }
    }
}
