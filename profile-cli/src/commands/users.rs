use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};

use profile_store::builder::DynDirectory;
use profile_store::model::{Role, User, UserId};
use profile_store::validation::Field;
use profile_store::Error;

use super::{confirm, ensure_terminal};
use crate::utils::{self, format};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show users whose name, email or role contains TERM
    #[arg(short, long, value_name = "TERM")]
    pub search: Option<String>,

    /// Print the matching users as JSON
    #[arg(long)]
    pub json: bool,
}

/// Form fields; omitted fields keep the form's current value
#[derive(Args, Debug, Default)]
pub struct UserFields {
    /// Full name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// Role: User, Manager or Admin
    #[arg(short, long)]
    pub role: Option<String>,

    /// Profile picture URL; empty uses the default avatar
    #[arg(short, long, value_name = "URL")]
    pub avatar: Option<String>,
}

impl UserFields {
    fn provided(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        [
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::Role, &self.role),
            (Field::Avatar, &self.avatar),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
    }

    fn is_empty(&self) -> bool {
        self.provided().next().is_none()
    }
}

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(flatten)]
    pub fields: UserFields,

    /// Prompt for every field, re-asking for invalid ones
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Id of the user to edit
    #[arg(value_name = "ID")]
    pub id: i64,

    #[command(flatten)]
    pub user: UserArgs,
}

pub fn list(directory: &mut DynDirectory, args: &ListArgs) -> Result<()> {
    if let Some(term) = &args.search {
        directory.set_search(term.clone());
    }
    let visible = directory.visible_users();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        utils::section("No users found");
        println!("{}", format::empty_hint(directory.users().is_empty()));
        return Ok(());
    }

    utils::section(&format::count_heading(visible.len()));
    if !directory.search_term().trim().is_empty() {
        utils::info(&format!("Matching \"{}\"", directory.search_term()));
    }
    let widths = format::Widths::measure(&visible);
    println!("{}", format::header_row(widths).dimmed());
    for user in &visible {
        println!("{}", format::user_row(user, widths));
    }

    Ok(())
}

pub fn add(directory: &mut DynDirectory, args: &UserArgs) -> Result<()> {
    directory.open_add();
    let user = fill_and_submit(directory, args)?;

    utils::success(&format!("Added {} (id {})", user.name, user.id));
    Ok(())
}

pub fn edit(directory: &mut DynDirectory, args: &EditArgs) -> Result<()> {
    if args.user.fields.is_empty() && !args.user.interactive {
        anyhow::bail!("Nothing to change. Pass --name, --email, --role or --avatar, or use --interactive");
    }

    let id = UserId::new(args.id);
    directory
        .open_edit(id)
        .with_context(|| format!("Cannot edit user {id}"))?;
    let user = fill_and_submit(directory, &args.user)?;

    utils::success(&format!("Updated {}", user.name));
    println!("{}", format::user_card(&user));
    Ok(())
}

pub fn delete(directory: &mut DynDirectory, id: i64, yes: bool) -> Result<()> {
    let id = UserId::new(id);
    if directory.find(id).is_none() {
        directory.delete(id)?;
        utils::warning(&format!("No user with id {id}, nothing deleted"));
        return Ok(());
    }

    directory.open_delete(id)?;
    let target = directory
        .delete_target()
        .cloned()
        .context("No delete is awaiting confirmation")?;

    utils::section("Delete User");
    println!("{}", format::user_card(&target));
    println!("\n  {}\n", "This action cannot be undone.".red());

    if !yes && !confirm(&format!("Delete {}?", target.name))? {
        directory.cancel_delete();
        utils::info("Cancelled");
        return Ok(());
    }

    directory.confirm_delete()?;
    utils::success(&format!("Deleted {} (id {})", target.name, target.id));
    Ok(())
}

pub fn reset(directory: &mut DynDirectory, yes: bool) -> Result<()> {
    if !yes && !confirm("Forget the stored user list?")? {
        utils::info("Cancelled");
        return Ok(());
    }

    directory.reset()?;
    let count = directory.users().len();
    utils::success(&format!(
        "Store reset, {} {} loaded",
        count,
        format::pluralize("user", count)
    ));
    Ok(())
}

/// Type the given fields into the open form and submit it
fn fill_and_submit(directory: &mut DynDirectory, args: &UserArgs) -> Result<User> {
    for (field, value) in args.fields.provided() {
        directory.set_field(field, value)?;
    }

    if args.interactive {
        ensure_terminal("--interactive needs a terminal")?;
        for field in [Field::Name, Field::Email, Field::Role, Field::Avatar] {
            prompt_field(directory, field)?;
        }
    }

    loop {
        match directory.submit() {
            Ok(user) => return Ok(user),
            Err(Error::Validation(errors)) => {
                for (field, _) in errors.iter() {
                    if let Some(message) = errors.message(field) {
                        utils::error(&message);
                    }
                }
                if !args.interactive {
                    directory.close_form();
                    anyhow::bail!("Nothing was saved");
                }
                for (field, _) in errors.iter() {
                    prompt_field(directory, field)?;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt_field(directory: &mut DynDirectory, field: Field) -> Result<()> {
    let current = directory
        .form()
        .context("No user form is open")?
        .input()
        .field(field)
        .to_string();
    let theme = ColorfulTheme::default();

    let value = match field {
        Field::Role => {
            let labels: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
            let selected = current
                .parse::<Role>()
                .ok()
                .and_then(|role| Role::ALL.iter().position(|r| *r == role))
                .unwrap_or(0);
            let index = Select::with_theme(&theme)
                .with_prompt(field.label())
                .items(&labels)
                .default(selected)
                .interact()?;
            Role::ALL[index].as_str().to_string()
        }
        _ => Input::<String>::with_theme(&theme)
            .with_prompt(field.label())
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?,
    };

    directory.set_field(field, value)?;
    Ok(())
}
