//! Form validation
//!
//! Submitted user data arrives as raw strings, exactly as typed into the
//! add/edit form. [`validate`] checks every field at once and either yields a
//! [`UserDraft`] ready to be written into the list, or a [`ValidationErrors`]
//! map from field to violation. Nothing is mutated or persisted on failure.
//!
//! # Example
//!
//! ```rust
//! use profile_store::validation::{validate, Field, UserInput, Violation};
//!
//! let input = UserInput::new("Ann Lee", "not-an-email", "Manager");
//! let errors = validate(&input).unwrap_err();
//! assert_eq!(errors.get(Field::Email), Some(Violation::InvalidFormat));
//! assert_eq!(errors.message(Field::Email).as_deref(), Some("Email is invalid"));
//! assert!(errors.get(Field::Name).is_none());
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::model::Role;

/// Loose `local@domain.tld` shape; no whitespace in any part
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Form fields that can carry a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Role,
    Avatar,
}

impl Field {
    /// Human-readable label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Role => "Role",
            Self::Avatar => "Avatar",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Role => write!(f, "role"),
            Self::Avatar => write!(f, "avatar"),
        }
    }
}

/// What is wrong with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// Blank after trimming
    Required,
    /// Present but not in the expected shape
    InvalidFormat,
}

/// Field-to-violation map produced by a failed validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeMap<Field, Violation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation, replacing any earlier one for the same field
    pub fn insert(&mut self, field: Field, violation: Violation) {
        self.0.insert(field, violation);
    }

    /// Clear the violation for `field`, returning it if there was one
    pub fn clear(&mut self, field: Field) -> Option<Violation> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<Violation> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Inline message for `field`, e.g. "Email is invalid"
    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(|violation| match violation {
            Violation::Required => format!("{} is required", field.label()),
            Violation::InvalidFormat => format!("{} is invalid", field.label()),
        })
    }

    /// Violations in field order
    pub fn iter(&self) -> impl Iterator<Item = (Field, Violation)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .iter()
            .filter_map(|(field, _)| self.message(field))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

/// Raw add/edit form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub role: String,
    /// Optional; blank means "use the default avatar"
    #[serde(default)]
    pub avatar: String,
}

impl UserInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
            avatar: String::new(),
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Raw value of `field`
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Role => &self.role,
            Field::Avatar => &self.avatar,
        }
    }

    /// Mutable access to the raw value of `field`
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Role => &mut self.role,
            Field::Avatar => &mut self.avatar,
        }
    }
}

/// Validated, normalized form values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
    /// `None` when the avatar field was left blank
    pub avatar: Option<String>,
}

/// Check every field of `input`
///
/// Name and email are trimmed; the role is parsed case-insensitively; a
/// blank avatar becomes `None`.
pub fn validate(input: &UserInput) -> Result<UserDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.insert(Field::Name, Violation::Required);
    }

    let email = input.email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, Violation::Required);
    } else if !EMAIL_REGEX.is_match(email) {
        errors.insert(Field::Email, Violation::InvalidFormat);
    }

    let role = if input.role.trim().is_empty() {
        errors.insert(Field::Role, Violation::Required);
        None
    } else {
        match input.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                errors.insert(Field::Role, Violation::InvalidFormat);
                None
            }
        }
    };

    match role {
        Some(role) if errors.is_empty() => {
            let avatar = input.avatar.trim();
            Ok(UserDraft {
                name: name.to_string(),
                email: email.to_string(),
                role,
                avatar: (!avatar.is_empty()).then(|| avatar.to_string()),
            })
        }
        _ => Err(errors),
    }
}
