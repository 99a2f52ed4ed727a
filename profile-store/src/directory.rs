//! The profile directory: canonical list, command handlers and modal flow
//!
//! [`ProfileDirectory`] exclusively owns the canonical user list. Every
//! mutation goes through a command handler which validates input, computes
//! the next list, writes it through the [`UserRepository`] and only then
//! installs it as canonical state. A failed write leaves the canonical list
//! as it was, so memory and store never diverge.
//!
//! # Example
//!
//! ```rust
//! use profile_store::clock::ManualClock;
//! use profile_store::directory::{DirectorySettings, ProfileDirectory};
//! use profile_store::persistence::UserRepository;
//! use profile_store::storage::MemoryStore;
//! use profile_store::validation::UserInput;
//!
//! let repo = UserRepository::new(MemoryStore::new(), "userProfiles");
//! let mut directory = ProfileDirectory::new(repo, ManualClock::fixed(1_700_000_000_000), DirectorySettings::default());
//!
//! directory.load().unwrap();
//! assert_eq!(directory.users().len(), 3);
//!
//! let ann = directory.add(&UserInput::new("Ann Lee", "ann@x.com", "Manager")).unwrap();
//! assert_eq!(ann.id.get(), 1_700_000_000_000);
//! assert_eq!(directory.users().len(), 4);
//!
//! directory.set_search("ann");
//! assert_eq!(directory.visible_users(), vec![ann]);
//! ```

use crate::clock::Clock;
use crate::commands;
use crate::config::DirectoryConfig;
use crate::error::{Error, Result};
use crate::filter::filter_users;
use crate::model::{default_users, User, UserId, DEFAULT_AVATAR};
use crate::persistence::UserRepository;
use crate::state::{ErrorNotice, Status, UserForm};
use crate::storage::KeyValueStore;
use crate::validation::{validate, Field, UserDraft, UserInput};

/// Behaviour knobs for a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySettings {
    /// Avatar applied when a user is saved with a blank avatar
    pub default_avatar: String,
    /// Persist the sample users when the store holds no list
    pub seed_on_empty: bool,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            default_avatar: DEFAULT_AVATAR.to_string(),
            seed_on_empty: true,
        }
    }
}

impl From<&DirectoryConfig> for DirectorySettings {
    fn from(config: &DirectoryConfig) -> Self {
        Self {
            default_avatar: config.default_avatar.clone(),
            seed_on_empty: config.seed_on_empty,
        }
    }
}

/// State container for the user directory
pub struct ProfileDirectory<S, C> {
    repository: UserRepository<S>,
    clock: C,
    settings: DirectorySettings,
    users: Vec<User>,
    search_term: String,
    status: Status,
    form: Option<UserForm>,
    delete_target: Option<User>,
}

impl<S: KeyValueStore, C: Clock> ProfileDirectory<S, C> {
    /// Create an idle directory with an empty list; call [`load`](Self::load) next
    pub fn new(repository: UserRepository<S>, clock: C, settings: DirectorySettings) -> Self {
        Self {
            repository,
            clock,
            settings,
            users: Vec::new(),
            search_term: String::new(),
            status: Status::Idle,
            form: None,
            delete_target: None,
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Read the persisted list into canonical state
    ///
    /// When nothing is stored and seeding is enabled, the sample users are
    /// installed and written back immediately. On failure the directory
    /// enters the error state; [`retry`](Self::retry) is the way out.
    pub fn load(&mut self) -> Result<()> {
        self.status = Status::Loading;

        let loaded = match self.repository.load() {
            Ok(Some(users)) => Ok(users),
            Ok(None) if self.settings.seed_on_empty => {
                let seed = default_users();
                tracing::info!(count = seed.len(), "no stored users, writing sample set");
                // The seed is shown even if writing it fails.
                self.users = seed.clone();
                self.repository.save(&seed).map(|()| seed)
            }
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(users) => {
                tracing::info!(count = users.len(), "user list loaded");
                self.users = users;
                self.status = Status::Idle;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading users");
                self.status = Status::Error(ErrorNotice::load_failure());
                Err(e)
            }
        }
    }

    /// Leave the error state by loading again
    pub fn retry(&mut self) -> Result<()> {
        tracing::info!(status = ?self.status, "retrying load");
        self.load()
    }

    /// Forget the persisted list and load again
    ///
    /// With seeding enabled this restores the sample users.
    pub fn reset(&mut self) -> Result<()> {
        self.repository.clear()?;
        self.form = None;
        self.delete_target = None;
        self.search_term.clear();
        self.load()
    }

    // ------------------------------------------------------------------
    // List state and filtering
    // ------------------------------------------------------------------

    /// The canonical list
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Replace the canonical list wholesale, without persisting it
    pub fn set_list(&mut self, users: Vec<User>) {
        self.users = users;
    }

    pub fn find(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// The filtered view for the current search term
    pub fn visible_users(&self) -> Vec<User> {
        filter_users(&self.users, &self.search_term)
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn settings(&self) -> &DirectorySettings {
        &self.settings
    }

    pub fn repository(&self) -> &UserRepository<S> {
        &self.repository
    }

    // ------------------------------------------------------------------
    // Command handlers
    // ------------------------------------------------------------------

    /// Validate `input` and append a new user
    ///
    /// Closes the add form on success. Validation errors are also shown on
    /// the open form, if any.
    pub fn add(&mut self, input: &UserInput) -> Result<User> {
        self.ensure_available()?;
        let draft = self.validate_into_form(input)?;

        self.status = Status::Loading;
        let id = commands::next_id(&self.users, self.clock.now_millis());
        let (next, user) = commands::append_user(&self.users, id, draft, &self.settings.default_avatar);
        self.commit(next)?;

        tracing::info!(id = %user.id, role = %user.role, "user added");
        self.form = None;
        Ok(user)
    }

    /// Validate `input` and replace the fields of the user with `id`
    ///
    /// Closes the form and clears the editing target on success.
    pub fn edit(&mut self, id: UserId, input: &UserInput) -> Result<User> {
        self.ensure_available()?;
        let draft = self.validate_into_form(input)?;
        self.apply_edit(id, draft)
    }

    /// Remove the user with `id`
    ///
    /// Returns whether a user was removed. An unknown id leaves the list
    /// untouched and writes nothing. Either way the confirmation closes.
    pub fn delete(&mut self, id: UserId) -> Result<bool> {
        self.ensure_available()?;

        self.status = Status::Loading;
        let (next, removed) = commands::remove_user(&self.users, id);
        if removed {
            self.commit(next)?;
            tracing::info!(id = %id, "user deleted");
        } else {
            self.status = Status::Idle;
            tracing::debug!(id = %id, "delete of unknown user ignored");
        }

        self.delete_target = None;
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Add/edit form
    // ------------------------------------------------------------------

    /// Open a blank add form
    pub fn open_add(&mut self) {
        self.form = Some(UserForm::for_add());
    }

    /// Open the form pre-filled with the user `id`
    pub fn open_edit(&mut self, id: UserId) -> Result<()> {
        let user = self
            .find(id)
            .ok_or_else(|| Error::NotFound(format!("user {id}")))?;
        self.form = Some(UserForm::for_edit(user));
        Ok(())
    }

    pub fn form(&self) -> Option<&UserForm> {
        self.form.as_ref()
    }

    /// Type into a field of the open form
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        let form = self
            .form
            .as_mut()
            .ok_or_else(|| Error::InvalidState("no user form is open".to_string()))?;
        form.set_field(field, value);
        Ok(())
    }

    /// Submit the open form as an add or an edit
    pub fn submit(&mut self) -> Result<User> {
        let form = self
            .form
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no user form is open".to_string()))?;
        let input = form.input().clone();

        match form.editing().map(|u| u.id) {
            Some(id) => self.edit(id, &input),
            None => self.add(&input),
        }
    }

    /// Close the form; refused (returns `false`) while a command is running
    pub fn close_form(&mut self) -> bool {
        if self.status.is_loading() {
            return false;
        }
        self.form = None;
        true
    }

    // ------------------------------------------------------------------
    // Delete confirmation
    // ------------------------------------------------------------------

    /// Ask for confirmation before deleting the user `id`
    pub fn open_delete(&mut self, id: UserId) -> Result<()> {
        let user = self
            .find(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {id}")))?;
        self.delete_target = Some(user);
        Ok(())
    }

    /// The user awaiting delete confirmation
    pub fn delete_target(&self) -> Option<&User> {
        self.delete_target.as_ref()
    }

    /// Delete the user awaiting confirmation
    pub fn confirm_delete(&mut self) -> Result<bool> {
        let id = self
            .delete_target
            .as_ref()
            .map(|u| u.id)
            .ok_or_else(|| Error::InvalidState("no delete is awaiting confirmation".to_string()))?;
        self.delete(id)
    }

    /// Dismiss the confirmation without deleting; refused while a command is running
    pub fn cancel_delete(&mut self) -> bool {
        if self.status.is_loading() {
            return false;
        }
        self.delete_target = None;
        true
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_available(&self) -> Result<()> {
        match self.status.error() {
            Some(notice) => Err(Error::Unavailable(notice.message.clone())),
            None => Ok(()),
        }
    }

    fn validate_into_form(&mut self, input: &UserInput) -> Result<UserDraft> {
        match validate(input) {
            Ok(draft) => Ok(draft),
            Err(errors) => {
                tracing::debug!(%errors, "user input rejected");
                if let Some(form) = self.form.as_mut() {
                    form.set_errors(errors.clone());
                }
                Err(Error::Validation(errors))
            }
        }
    }

    fn apply_edit(&mut self, id: UserId, draft: UserDraft) -> Result<User> {
        self.status = Status::Loading;
        let Some((next, updated)) = commands::apply_edit(&self.users, id, draft, &self.settings.default_avatar) else {
            self.status = Status::Idle;
            return Err(Error::NotFound(format!("user {id}")));
        };
        self.commit(next)?;

        tracing::info!(id = %id, "user updated");
        self.form = None;
        Ok(updated)
    }

    /// Persist `next` and install it; on failure the canonical list is kept
    fn commit(&mut self, next: Vec<User>) -> Result<()> {
        match self.repository.save(&next) {
            Ok(()) => {
                self.users = next;
                self.status = Status::Idle;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error saving users");
                self.status = Status::Error(ErrorNotice::save_failure());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::FailureKind;
    use crate::model::Role;
    use crate::persistence::DEFAULT_STORAGE_KEY;
    use crate::storage::MemoryStore;
    use crate::validation::Violation;
    use std::collections::HashSet;

    const NOW: i64 = 1_700_000_000_000;

    fn directory_with(store: MemoryStore) -> ProfileDirectory<MemoryStore, ManualClock> {
        ProfileDirectory::new(
            UserRepository::new(store, DEFAULT_STORAGE_KEY),
            ManualClock::stepping(NOW, 1),
            DirectorySettings::default(),
        )
    }

    fn loaded() -> ProfileDirectory<MemoryStore, ManualClock> {
        let mut directory = directory_with(MemoryStore::new());
        directory.load().unwrap();
        directory
    }

    fn writes(directory: &ProfileDirectory<MemoryStore, ManualClock>) -> usize {
        directory.repository().store().writes()
    }

    fn stored(directory: &ProfileDirectory<MemoryStore, ManualClock>) -> Vec<User> {
        directory.repository().load().unwrap().unwrap()
    }

    #[test]
    fn test_empty_store_loads_and_persists_seed() {
        let directory = loaded();
        assert_eq!(directory.users(), default_users().as_slice());
        assert_eq!(stored(&directory), default_users());
        assert_eq!(directory.status(), &Status::Idle);
    }

    #[test]
    fn test_seeding_can_be_disabled() {
        let mut directory = ProfileDirectory::new(
            UserRepository::new(MemoryStore::new(), DEFAULT_STORAGE_KEY),
            ManualClock::fixed(NOW),
            DirectorySettings {
                seed_on_empty: false,
                ..DirectorySettings::default()
            },
        );
        directory.load().unwrap();
        assert!(directory.users().is_empty());
        assert_eq!(writes(&directory), 0);
    }

    #[test]
    fn test_add_scenario() {
        let mut directory = loaded();
        let user = directory
            .add(&UserInput::new("Ann Lee", "ann@x.com", "Manager"))
            .unwrap();

        assert_eq!(directory.users().len(), 4);
        let last = directory.users().last().unwrap();
        assert_eq!(last, &user);
        assert_eq!(last.id.get(), NOW);
        assert_eq!(last.name, "Ann Lee");
        assert_eq!(last.email, "ann@x.com");
        assert_eq!(last.role, Role::Manager);
        assert_eq!(last.avatar, DEFAULT_AVATAR);
        assert_eq!(stored(&directory), directory.users());
    }

    #[test]
    fn test_added_ids_stay_unique() {
        let mut directory = ProfileDirectory::new(
            UserRepository::new(MemoryStore::new(), DEFAULT_STORAGE_KEY),
            ManualClock::fixed(NOW),
            DirectorySettings::default(),
        );
        directory.load().unwrap();

        for i in 0..5 {
            directory
                .add(&UserInput::new(format!("User {i}"), format!("u{i}@x.com"), "User"))
                .unwrap();
        }

        let ids: HashSet<_> = directory.users().iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), directory.users().len());
    }

    #[test]
    fn test_invalid_email_is_rejected_without_side_effects() {
        let mut directory = loaded();
        let writes_before = writes(&directory);
        directory.open_add();
        directory.set_field(Field::Name, "Ann Lee").unwrap();
        directory.set_field(Field::Email, "not-an-email").unwrap();

        let err = directory.submit().unwrap_err();
        match err {
            Error::Validation(errors) => {
                assert_eq!(errors.get(Field::Email), Some(Violation::InvalidFormat));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        assert_eq!(directory.users().len(), 3);
        assert_eq!(writes(&directory), writes_before);
        assert_eq!(directory.status(), &Status::Idle);

        let form = directory.form().expect("form stays open");
        assert_eq!(
            form.errors().message(Field::Email).as_deref(),
            Some("Email is invalid")
        );

        directory.set_field(Field::Email, "ann@x.com").unwrap();
        assert!(directory.form().unwrap().errors().is_empty());
        directory.submit().unwrap();
        assert!(directory.form().is_none());
        assert_eq!(directory.users().len(), 4);
    }

    #[test]
    fn test_edit_through_form_keeps_id_and_length() {
        let mut directory = loaded();
        directory.open_edit(UserId::new(2)).unwrap();
        assert!(directory.form().unwrap().is_editing());

        directory.set_field(Field::Role, "Admin").unwrap();
        let updated = directory.submit().unwrap();

        assert_eq!(updated.id, UserId::new(2));
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.name, "Jane Smith");
        assert_eq!(directory.users().len(), 3);
        assert_eq!(directory.users()[1], updated);
        assert_eq!(directory.users()[0], default_users()[0]);
        assert!(directory.form().is_none());
        assert_eq!(stored(&directory), directory.users());
    }

    #[test]
    fn test_edit_returns_record_as_stored_and_goes_idle() {
        let mut directory = loaded();
        let updated = directory
            .edit(UserId::new(3), &UserInput::new("Mike J", "mike@x.com", "User"))
            .unwrap();

        assert_eq!(directory.find(UserId::new(3)), Some(&updated));
        assert_eq!(directory.status(), &Status::Idle);
        directory.open_delete(UserId::new(3)).unwrap();
        assert!(directory.cancel_delete());
    }

    #[test]
    fn test_edit_unknown_id_is_not_found() {
        let mut directory = loaded();
        let writes_before = writes(&directory);
        let err = directory
            .edit(UserId::new(99), &UserInput::new("X", "x@y.z", "User"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(writes(&directory), writes_before);
        assert_eq!(directory.status(), &Status::Idle);
    }

    #[test]
    fn test_delete_through_confirmation() {
        let mut directory = loaded();
        directory.open_delete(UserId::new(1)).unwrap();
        assert_eq!(directory.delete_target().map(|u| u.name.as_str()), Some("John Doe"));

        assert!(directory.confirm_delete().unwrap());
        assert_eq!(directory.users().len(), 2);
        assert!(directory.find(UserId::new(1)).is_none());
        assert!(directory.delete_target().is_none());
        assert_eq!(stored(&directory), directory.users());
    }

    #[test]
    fn test_cancel_delete_does_not_mutate() {
        let mut directory = loaded();
        directory.open_delete(UserId::new(3)).unwrap();
        assert!(directory.cancel_delete());
        assert!(directory.delete_target().is_none());
        assert_eq!(directory.users().len(), 3);
        assert!(matches!(directory.confirm_delete(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut directory = loaded();
        let writes_before = writes(&directory);
        assert!(!directory.delete(UserId::new(12345)).unwrap());
        assert_eq!(directory.users(), default_users().as_slice());
        assert_eq!(writes(&directory), writes_before);
        assert_eq!(directory.status(), &Status::Idle);
    }

    #[test]
    fn test_save_failure_keeps_list_and_sets_error() {
        let seed_bytes = serde_json::to_string(&default_users()).unwrap().len() + DEFAULT_STORAGE_KEY.len();
        let mut directory = directory_with(MemoryStore::with_quota(seed_bytes));
        directory.load().unwrap();
        directory.open_add();

        let err = directory
            .add(&UserInput::new("Ann Lee", "ann@x.com", "Manager"))
            .unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Save));

        assert_eq!(directory.users(), default_users().as_slice());
        assert_eq!(stored(&directory), default_users());
        let notice = directory.status().error().unwrap();
        assert_eq!(notice.kind, FailureKind::Save);
        assert!(directory.form().is_some());

        // Commands are refused until a retry succeeds.
        assert!(matches!(directory.delete(UserId::new(1)), Err(Error::Unavailable(_))));
        directory.retry().unwrap();
        assert_eq!(directory.status(), &Status::Idle);
        assert!(directory.delete(UserId::new(1)).unwrap());
    }

    #[test]
    fn test_malformed_store_enters_error_until_retry() {
        let mut store = MemoryStore::new();
        store.set_item(DEFAULT_STORAGE_KEY, "{oops").unwrap();
        let mut directory = directory_with(store);

        let err = directory.load().unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Load));
        assert_eq!(
            directory.status().error().map(|n| n.message.as_str()),
            Some("Failed to load users from storage")
        );
        assert!(matches!(
            directory.add(&UserInput::new("Ann", "ann@x.com", "User")),
            Err(Error::Unavailable(_))
        ));
        assert!(directory.retry().is_err());
    }

    #[test]
    fn test_close_is_refused_while_loading() {
        let mut directory = loaded();
        directory.open_add();
        directory.open_delete(UserId::new(1)).unwrap();

        directory.status = Status::Loading;
        assert!(!directory.close_form());
        assert!(!directory.cancel_delete());
        assert!(directory.form().is_some());
        assert!(directory.delete_target().is_some());

        directory.status = Status::Idle;
        assert!(directory.close_form());
        assert!(directory.cancel_delete());
    }

    #[test]
    fn test_search_filters_visible_users() {
        let mut directory = loaded();
        directory.set_search("MANAGER");
        let visible = directory.visible_users();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Mike Johnson");

        directory.set_search("");
        assert_eq!(directory.visible_users(), default_users());
    }

    #[test]
    fn test_set_list_replaces_without_persisting() {
        let mut directory = loaded();
        let writes_before = writes(&directory);
        directory.set_list(Vec::new());
        assert!(directory.users().is_empty());
        assert_eq!(writes(&directory), writes_before);
    }

    #[test]
    fn test_open_edit_unknown_user() {
        let mut directory = loaded();
        assert!(matches!(directory.open_edit(UserId::new(77)), Err(Error::NotFound(_))));
        assert!(directory.form().is_none());
    }

    #[test]
    fn test_reset_restores_sample_users() {
        let mut directory = loaded();
        directory.delete(UserId::new(1)).unwrap();
        directory.set_search("jane");
        assert_eq!(directory.users().len(), 2);

        directory.reset().unwrap();
        assert_eq!(directory.users(), default_users().as_slice());
        assert_eq!(directory.search_term(), "");
        assert_eq!(directory.status(), &Status::Idle);
    }
}
