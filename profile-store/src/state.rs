//! UI-facing state: command status and the add/edit form
//!
//! The directory moves between three statuses:
//!
//! ```text
//! Idle ──command──▶ Loading ──ok──▶ Idle
//!                      │
//!                      └──load/save failure──▶ Error ──retry──▶ Loading
//! ```
//!
//! Modal visibility is tracked separately from the status: an add/edit form
//! and a delete confirmation can each be open or closed.

use serde::Serialize;

use crate::error::FailureKind;
use crate::model::{Role, User};
use crate::validation::{Field, UserInput, ValidationErrors};

/// Message shown when the stored list cannot be loaded
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load users from storage";

/// Message shown when the list cannot be saved
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to save users to storage";

/// Global error flag with a generic, user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub kind: FailureKind,
    pub message: String,
}

impl ErrorNotice {
    pub fn load_failure() -> Self {
        Self {
            kind: FailureKind::Load,
            message: LOAD_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn save_failure() -> Self {
        Self {
            kind: FailureKind::Save,
            message: SAVE_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Command status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Error(ErrorNotice),
}

impl Status {
    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading)
    }

    pub fn error(&self) -> Option<&ErrorNotice> {
        match self {
            Status::Error(notice) => Some(notice),
            _ => None,
        }
    }
}

/// State of the add/edit form
///
/// With an `editing` user the form pre-fills from that user and submits as
/// an edit; without one it starts blank (role `User`) and submits as an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    editing: Option<User>,
    input: UserInput,
    errors: ValidationErrors,
}

impl UserForm {
    /// Blank form for a new user
    pub fn for_add() -> Self {
        Self {
            editing: None,
            input: UserInput {
                role: Role::default().to_string(),
                ..UserInput::default()
            },
            errors: ValidationErrors::new(),
        }
    }

    /// Form pre-filled from `user`
    pub fn for_edit(user: &User) -> Self {
        Self {
            editing: Some(user.clone()),
            input: UserInput {
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role.to_string(),
                avatar: user.avatar.clone(),
            },
            errors: ValidationErrors::new(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The user being edited, if any
    pub fn editing(&self) -> Option<&User> {
        self.editing.as_ref()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit User"
        } else {
            "Add New User"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update User"
        } else {
            "Add User"
        }
    }

    pub fn input(&self) -> &UserInput {
        &self.input
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Change one field; any error shown for it is cleared
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.input.field_mut(field) = value.into();
        self.errors.clear(field);
    }

    pub(crate) fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }
}
