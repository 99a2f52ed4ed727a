use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::IsTerminal;

use profile_store::builder::{DirectoryBuilder, DynDirectory};
use profile_store::config::{Config, StorageBackend};
use profile_store::observability::init_tracing;

use crate::utils;
use crate::{Cli, Commands};

pub mod setup;
pub mod users;

/// Build the directory described by the global flags and run a user command
pub fn run(cli: &Cli) -> Result<()> {
    if let Commands::Setup { command } = &cli.command {
        return setup::execute(command);
    }

    let config = load_config(cli)?;
    if let Err(e) = init_tracing(&config) {
        eprintln!("{e}");
    }

    let mut directory = DirectoryBuilder::new().with_config(config).build();
    load(&mut directory)?;

    match &cli.command {
        Commands::List(args) => users::list(&mut directory, args),
        Commands::Add(args) => users::add(&mut directory, args),
        Commands::Edit(args) => users::edit(&mut directory, args),
        Commands::Delete { id, yes } => users::delete(&mut directory, *id, *yes),
        Commands::Reset { yes } => users::reset(&mut directory, *yes),
        Commands::Setup { command } => setup::execute(command),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    if cli.memory {
        config.storage.backend = StorageBackend::Memory;
    }
    if let Some(path) = &cli.store {
        config.storage.backend = StorageBackend::File;
        config.storage.path = Some(path.clone());
    }
    config.service.log_level = log_level(cli.verbose).to_string();

    Ok(config)
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Load the stored list, offering a retry on a terminal
fn load(directory: &mut DynDirectory) -> Result<()> {
    let mut attempt = directory.load();
    while let Err(e) = attempt {
        let notice = directory
            .status()
            .error()
            .map(|n| n.message.clone())
            .unwrap_or_else(|| e.to_string());
        utils::error(&notice);

        if !std::io::stdin().is_terminal() || !confirm("Retry loading?")? {
            return Err(e.into());
        }
        attempt = directory.retry();
    }
    Ok(())
}

/// Ask a yes/no question; refuses to guess without a terminal
pub fn confirm(prompt: &str) -> Result<bool> {
    ensure_terminal("Confirmation needed but stdin is not a terminal. Pass --yes to skip it.")?;
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(answer)
}

pub fn ensure_terminal(message: &str) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("{}", message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(9), "trace");
    }

    #[test]
    fn test_store_flag_selects_file_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[storage]\nbackend = \"memory\"\n").unwrap();
        let store_path = dir.path().join("team.json");

        let cli = Cli::try_parse_from([
            "profiles",
            "--config",
            config_path.to_str().unwrap(),
            "--store",
            store_path.to_str().unwrap(),
            "list",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, Some(store_path));
        assert_eq!(config.service.log_level, "warn");
    }

    #[test]
    fn test_memory_flag_selects_memory_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let cli = Cli::try_parse_from([
            "profiles",
            "--memory",
            "--config",
            config_path.to_str().unwrap(),
            "list",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }
}
