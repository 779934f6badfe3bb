pub mod comment;
pub mod deliverable;
pub mod entity_type;
pub mod favorite;
pub mod initiative;
pub mod milestone;
pub mod notification;
pub mod project;
pub mod team;
pub mod team_vocabulary;
pub mod user;
