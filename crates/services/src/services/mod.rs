pub mod assignment;
pub mod comments;
pub mod mentions;
pub mod notification;
