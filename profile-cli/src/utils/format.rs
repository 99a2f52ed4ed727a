use colored::{ColoredString, Colorize};
use profile_store::model::{BadgeColor, Role, User};

/// Heading above a list of users, e.g. "3 Users Found"
pub fn count_heading(count: usize) -> String {
    format!("{} {} Found", count, pluralize("User", count))
}

/// Append an "s" unless `count` is one
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Hint shown under "No users found"
///
/// An empty directory asks for a first user; otherwise the search is at fault.
pub fn empty_hint(directory_is_empty: bool) -> &'static str {
    if directory_is_empty {
        "Get started by adding your first team member."
    } else {
        "Try adjusting your search terms to find what you're looking for."
    }
}

/// Role rendered as a colored badge
pub fn role_badge(role: Role) -> ColoredString {
    let label = format!(" {} ", role.as_str());
    match role.badge() {
        BadgeColor::Red => label.white().on_red(),
        BadgeColor::Blue => label.white().on_blue(),
        BadgeColor::Green => label.black().on_green(),
    }
}

/// Column widths for a set of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widths {
    pub id: usize,
    pub name: usize,
    pub email: usize,
}

impl Widths {
    pub fn measure(users: &[User]) -> Self {
        users.iter().fold(
            Self {
                id: 2,
                name: 4,
                email: 5,
            },
            |w, u| Self {
                id: w.id.max(u.id.to_string().chars().count()),
                name: w.name.max(u.name.chars().count()),
                email: w.email.max(u.email.chars().count()),
            },
        )
    }
}

/// Header line for [`user_row`]
pub fn header_row(widths: Widths) -> String {
    format!(
        "{:>id$}  {:<name$}  {:<email$}  {}",
        "ID",
        "NAME",
        "EMAIL",
        "ROLE",
        id = widths.id,
        name = widths.name,
        email = widths.email,
    )
}

/// One user as a table row, role badge last
pub fn user_row(user: &User, widths: Widths) -> String {
    format!(
        "{:>id$}  {:<name$}  {:<email$}  {}",
        user.id.to_string(),
        user.name,
        user.email,
        role_badge(user.role),
        id = widths.id,
        name = widths.name,
        email = widths.email,
    )
}

/// Multi-line card used by delete confirmation and after edits
pub fn user_card(user: &User) -> String {
    format!(
        "  {} {}\n  {}\n  {}\n  {}",
        user.name.bold(),
        role_badge(user.role),
        user.email,
        format!("id {}", user.id).dimmed(),
        user.avatar.dimmed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_store::model::default_users;

    #[test]
    fn test_count_heading() {
        assert_eq!(count_heading(0), "0 Users Found");
        assert_eq!(count_heading(1), "1 User Found");
        assert_eq!(count_heading(3), "3 Users Found");
    }

    #[test]
    fn test_empty_hint() {
        assert!(empty_hint(true).starts_with("Get started"));
        assert!(empty_hint(false).starts_with("Try adjusting"));
    }

    #[test]
    fn test_widths_fit_longest_values() {
        let users = default_users();
        let widths = Widths::measure(&users);
        assert_eq!(widths.name, "Mike Johnson".len());
        assert_eq!(widths.email, "mike.johnson@example.com".len());
        assert_eq!(widths.id, 2);
    }

    #[test]
    fn test_rows_align() {
        colored::control::set_override(false);
        let users = default_users();
        let widths = Widths::measure(&users);

        let header = header_row(widths);
        let row = user_row(&users[0], widths);
        assert_eq!(header.find("EMAIL"), row.find("john.doe@example.com"));
        assert!(row.trim_end().ends_with("Admin"));
    }
}
