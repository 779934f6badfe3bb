use std::sync::Arc;

use db::DBService;
use services::services::{
    assignment::AssignmentService, comments::CommentService, notification::NotificationService,
};

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use config::Config;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    db: Arc<DBService>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DBService, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(self.db.clone())
    }

    pub fn assignments(&self) -> AssignmentService {
        AssignmentService::new(self.db.clone())
    }

    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(self.db.clone())
    }
}
