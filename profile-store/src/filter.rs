//! Search filtering over the canonical list

use crate::model::User;

/// Users whose name, email or role contains `term`, ignoring case
///
/// A blank term returns the whole list. Otherwise the term is matched as
/// typed, surrounding whitespace included. Order is always preserved.
///
/// ```rust
/// use profile_store::filter::filter_users;
/// use profile_store::model::default_users;
///
/// let users = default_users();
/// let admins = filter_users(&users, "ADMIN");
/// assert_eq!(admins.len(), 1);
/// assert_eq!(admins[0].name, "John Doe");
/// assert_eq!(filter_users(&users, "  ").len(), 3);
/// ```
pub fn filter_users(users: &[User], term: &str) -> Vec<User> {
    if term.trim().is_empty() {
        return users.to_vec();
    }

    let needle = term.to_lowercase();
    users
        .iter()
        .filter(|user| user.matches_lowercase(&needle))
        .cloned()
        .collect()
}
