//! Sample records written when no list has been persisted yet

use super::{Role, User, UserId};

/// Avatar used when a record is saved without one
pub const DEFAULT_AVATAR: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face";

/// The three sample users a fresh directory starts with
pub fn default_users() -> Vec<User> {
    vec![
        User {
            id: UserId::new(1),
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            role: Role::Admin,
            avatar: DEFAULT_AVATAR.to_string(),
        },
        User {
            id: UserId::new(2),
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            role: Role::User,
            avatar: "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150&h=150&fit=crop&crop=face"
                .to_string(),
        },
        User {
            id: UserId::new(3),
            name: "Mike Johnson".to_string(),
            email: "mike.johnson@example.com".to_string(),
            role: Role::Manager,
            avatar: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face"
                .to_string(),
        },
    ]
}
