//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use yuno_core::config::{Settings, CONFIG_FILE};
use yuno_core::YunoResult;
use yuno_db::DbPool;

pub mod init;
pub mod item;
pub mod project;
pub mod shell;
pub mod task;

/// Yuno - projects, tasks and checklists
#[derive(Parser)]
#[command(name = "yuno")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides the settings file)
    #[arg(long, global = true, env = "YUNO_DB")]
    pub db: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true, env = "YUNO_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Also append logs to this file
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and a default settings file
    Init(init::InitArgs),

    /// Manage projects
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Manage checklist items of tasks
    #[command(subcommand)]
    Item(item::ItemCommands),

    /// Interactive shell with auto-dismissed status messages
    Shell,
}

/// Commands that can run both one-shot and inside the shell.
#[derive(Subcommand)]
pub enum Action {
    /// Manage projects
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Manage checklist items of tasks
    #[command(subcommand)]
    Item(item::ItemCommands),
}

impl Action {
    /// Run the action. Listings are printed directly; the returned string is
    /// the confirmation message for the user.
    pub fn run(self, pool: &DbPool) -> YunoResult<String> {
        match self {
            Action::Project(cmd) => project::execute(cmd, pool),
            Action::Task(cmd) => task::execute(cmd, pool),
            Action::Item(cmd) => item::execute(cmd, pool),
        }
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(&self.config)?;
        let db_path = self.db.clone().unwrap_or_else(|| settings.db_path.clone());

        let action = match self.command {
            Commands::Init(args) => return init::execute(args, &self.config, &settings, &db_path),
            Commands::Shell => return shell::execute(&settings, &db_path).await,
            Commands::Project(cmd) => Action::Project(cmd),
            Commands::Task(cmd) => Action::Task(cmd),
            Commands::Item(cmd) => Action::Item(cmd),
        };

        let pool = yuno_db::init_pool(&db_path)?;
        let message = action.run(&pool)?;
        if !message.is_empty() {
            println!("{} {}", "✓".green().bold(), message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nested_command() {
        let cli = Cli::try_parse_from(["yuno", "--db", "/tmp/x.db", "task", "move", "4", "1"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Commands::Task(_)));
    }
}
