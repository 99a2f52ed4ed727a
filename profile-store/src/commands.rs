//! List transforms behind the add, edit and delete commands
//!
//! Each function takes the current list and returns the next one without
//! touching persistence or any other state. [`ProfileDirectory`] composes
//! them with the store write.
//!
//! [`ProfileDirectory`]: crate::directory::ProfileDirectory

use std::collections::HashSet;

use crate::model::{User, UserId};
use crate::validation::UserDraft;

/// Id for a record created at `now_millis`
///
/// Uses the timestamp unless it is already taken, in which case the id
/// after the current maximum is used. When the maximum is `i64::MAX` the
/// first free id above the timestamp is taken, then the first below it.
pub fn next_id(users: &[User], now_millis: i64) -> UserId {
    let candidate = UserId::new(now_millis);
    if users.iter().all(|u| u.id != candidate) {
        return candidate;
    }

    let max = users.iter().map(|u| u.id.get()).max().unwrap_or(now_millis);
    if let Some(id) = max.max(now_millis).checked_add(1) {
        return UserId::new(id);
    }

    let taken: HashSet<i64> = users.iter().map(|u| u.id.get()).collect();
    (now_millis..=i64::MAX)
        .chain((i64::MIN..now_millis).rev())
        .find(|id| !taken.contains(id))
        .map(UserId::new)
        .unwrap_or(candidate)
}

/// Build a new record from `draft` and append it
pub fn append_user(
    users: &[User],
    id: UserId,
    draft: UserDraft,
    default_avatar: &str,
) -> (Vec<User>, User) {
    let user = User {
        id,
        name: draft.name,
        email: draft.email,
        role: draft.role,
        avatar: draft.avatar.unwrap_or_else(|| default_avatar.to_string()),
    };

    let mut next = Vec::with_capacity(users.len() + 1);
    next.extend_from_slice(users);
    next.push(user.clone());
    (next, user)
}

/// Replace the mutable fields of the record with `id`
///
/// Returns the next list and the updated record, or `None` when no record
/// has that id. A blank avatar becomes `default_avatar`, as on add.
pub fn apply_edit(
    users: &[User],
    id: UserId,
    draft: UserDraft,
    default_avatar: &str,
) -> Option<(Vec<User>, User)> {
    let position = users.iter().position(|u| u.id == id)?;

    let mut next = users.to_vec();
    let target = &mut next[position];
    target.name = draft.name;
    target.email = draft.email;
    target.role = draft.role;
    target.avatar = draft.avatar.unwrap_or_else(|| default_avatar.to_string());
    let updated = target.clone();
    Some((next, updated))
}

/// Remove the record with `id`; the bool tells whether anything was removed
pub fn remove_user(users: &[User], id: UserId) -> (Vec<User>, bool) {
    let next: Vec<User> = users.iter().filter(|u| u.id != id).cloned().collect();
    let removed = next.len() < users.len();
    (next, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_users, Role, DEFAULT_AVATAR};

    fn draft(name: &str, email: &str, role: Role) -> UserDraft {
        UserDraft {
            name: name.to_string(),
            email: email.to_string(),
            role,
            avatar: None,
        }
    }

    #[test]
    fn test_next_id_uses_timestamp() {
        assert_eq!(next_id(&default_users(), 1_700_000_000_000).get(), 1_700_000_000_000);
    }

    #[test]
    fn test_next_id_skips_taken_timestamp() {
        let users = default_users();
        assert_eq!(next_id(&users, 2).get(), 4);
    }

    #[test]
    fn test_next_id_does_not_overflow_at_max() {
        let mut users = default_users();
        users[0].id = UserId::new(5);
        users[1].id = UserId::new(i64::MAX);
        users[2].id = UserId::new(6);

        assert_eq!(next_id(&users, 5).get(), 7);
    }

    #[test]
    fn test_next_id_counts_down_when_top_is_full() {
        let mut users = default_users();
        users[0].id = UserId::new(i64::MAX);
        users[1].id = UserId::new(i64::MAX - 1);
        users.truncate(2);

        assert_eq!(next_id(&users, i64::MAX - 1).get(), i64::MAX - 2);
    }

    #[test]
    fn test_apply_edit_blank_avatar_uses_default() {
        let mut users = default_users();
        users[1].avatar = "https://a.example/old.png".to_string();

        let (_, updated) =
            apply_edit(&users, UserId::new(2), draft("Jane Smith", "jane@x.com", Role::User), DEFAULT_AVATAR).unwrap();
        assert_eq!(updated.avatar, DEFAULT_AVATAR);
    }

    #[test]
    fn test_append_adds_one_with_default_avatar() {
        let users = default_users();
        let (next, added) = append_user(
            &users,
            UserId::new(99),
            draft("Ann Lee", "ann@x.com", Role::Manager),
            DEFAULT_AVATAR,
        );

        assert_eq!(next.len(), users.len() + 1);
        assert_eq!(next.last(), Some(&added));
        assert_eq!(added.avatar, DEFAULT_AVATAR);
        assert_eq!(&next[..3], &users[..]);
    }

    #[test]
    fn test_apply_edit_keeps_id_and_length() {
        let users = default_users();
        let mut d = draft("Janet Smith", "janet@example.com", Role::Admin);
        d.avatar = Some("https://a.example/j.png".to_string());

        let (next, updated) = apply_edit(&users, UserId::new(2), d, DEFAULT_AVATAR).unwrap();
        assert_eq!(next[1], updated);
        assert_eq!(next.len(), users.len());
        assert_eq!(next[1].id, UserId::new(2));
        assert_eq!(next[1].name, "Janet Smith");
        assert_eq!(next[1].role, Role::Admin);
        assert_eq!(next[1].avatar, "https://a.example/j.png");
        assert_eq!(next[0], users[0]);
        assert_eq!(next[2], users[2]);
    }

    #[test]
    fn test_apply_edit_unknown_id() {
        let users = default_users();
        assert!(apply_edit(&users, UserId::new(42), draft("x", "x@y.z", Role::User), DEFAULT_AVATAR).is_none());
    }

    #[test]
    fn test_remove_user() {
        let users = default_users();
        let (next, removed) = remove_user(&users, UserId::new(1));
        assert!(removed);
        assert_eq!(next.len(), 2);
        assert!(next.iter().all(|u| u.id != UserId::new(1)));

        let (same, removed) = remove_user(&users, UserId::new(42));
        assert!(!removed);
        assert_eq!(same, users);
    }
}
