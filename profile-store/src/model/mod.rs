//! Directory data model

mod seed;
mod user;

pub use seed::{default_users, DEFAULT_AVATAR};
pub use user::{BadgeColor, Role, UnknownRole, User, UserId};
