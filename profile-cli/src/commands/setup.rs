use anyhow::{Context, Result};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use profile_store::config::Config;

use crate::utils;
use crate::Cli;

const BIN_NAME: &str = "profiles";

#[derive(Subcommand)]
pub enum SetupCommands {
    /// Generate and install shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if not specified)
        #[arg(short, long, value_name = "SHELL")]
        shell: Option<Shell>,

        /// Output to stdout instead of installing
        #[arg(long)]
        stdout: bool,
    },

    /// Print the configuration file search order and the active store path
    Paths,
}

pub fn execute(command: &SetupCommands) -> Result<()> {
    match command {
        SetupCommands::Completions { shell, stdout } => completions(*shell, *stdout),
        SetupCommands::Paths => paths(),
    }
}

fn completions(shell: Option<Shell>, stdout: bool) -> Result<()> {
    let shell = match shell {
        Some(s) => s,
        None => detect_shell()?,
    };

    if stdout {
        generate(shell, &mut Cli::command(), BIN_NAME, &mut io::stdout());
        return Ok(());
    }

    install_completions(shell)
}

/// Detect the user's current shell from $SHELL
fn detect_shell() -> Result<Shell> {
    let shell_path = env::var("SHELL")
        .context("Failed to detect shell. $SHELL not set. Use --shell to specify explicitly.")?;
    shell_from_path(&shell_path)
}

fn shell_from_path(shell_path: &str) -> Result<Shell> {
    let shell_name = Path::new(shell_path)
        .file_name()
        .and_then(|s| s.to_str())
        .context("Invalid shell path")?;

    match shell_name {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "pwsh" | "powershell" => Ok(Shell::PowerShell),
        other => anyhow::bail!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish, powershell.\nUse --shell to specify explicitly.",
            other
        ),
    }
}

fn completion_target(shell: Shell, home_dir: &Path) -> Result<(PathBuf, String)> {
    Ok(match shell {
        Shell::Bash => (
            home_dir.join(".local/share/bash-completion/completions"),
            BIN_NAME.to_string(),
        ),
        Shell::Zsh => (home_dir.join(".zfunc"), format!("_{BIN_NAME}")),
        Shell::Fish => (
            home_dir.join(".config/fish/completions"),
            format!("{BIN_NAME}.fish"),
        ),
        Shell::PowerShell => (
            home_dir.join("Documents/PowerShell/Completions"),
            format!("{BIN_NAME}.ps1"),
        ),
        _ => anyhow::bail!("Unsupported shell: {:?}", shell),
    })
}

fn install_completions(shell: Shell) -> Result<()> {
    let home_dir = dirs::home_dir().context("Failed to find home directory")?;
    let (completion_dir, filename) = completion_target(shell, &home_dir)?;

    fs::create_dir_all(&completion_dir)
        .with_context(|| format!("Failed to create directory: {}", completion_dir.display()))?;

    let completion_path = completion_dir.join(filename);
    let mut file = fs::File::create(&completion_path)
        .with_context(|| format!("Failed to create file: {}", completion_path.display()))?;
    generate(shell, &mut Cli::command(), BIN_NAME, &mut file);

    utils::success(&format!(
        "Completions installed for {}",
        format!("{:?}", shell).cyan()
    ));
    println!("  {}", completion_path.to_string_lossy().dimmed());
    println!();

    match shell {
        Shell::Zsh => {
            println!("  {}:", "Required setup".yellow().bold());
            println!("    Add to ~/.zshrc:");
            println!("      {}", "fpath=(~/.zfunc $fpath)".cyan());
            println!("      {}", "autoload -Uz compinit && compinit".cyan());
        }
        Shell::PowerShell => {
            println!("  {}:", "Required setup".yellow().bold());
            println!("    Add to your PowerShell profile ($PROFILE):");
            println!("      {}", format!(". {}", completion_path.display()).cyan());
        }
        _ => {
            println!("  {}:", "Immediate use".green());
            println!("    source {}", completion_path.display());
        }
    }
    println!();

    Ok(())
}

fn paths() -> Result<()> {
    utils::section("Configuration files (highest priority first)");
    for path in Config::find_config_paths() {
        let marker = if path.exists() { "found".green() } else { "missing".dimmed() };
        println!("  {} [{}]", path.display(), marker);
    }
    utils::info(&format!(
        "Recommended location: {}",
        Config::recommended_path().display()
    ));

    let config = Config::load()?;
    utils::section("Store");
    println!("  backend: {:?}", config.storage.backend);
    println!("  path:    {}", config.storage.resolved_path().display());
    println!("  key:     {}", config.storage.key);
    Ok(())
}
