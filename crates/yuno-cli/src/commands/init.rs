//! Database and settings initialization.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use yuno_core::config::Settings;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing settings file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs, config_path: &Path, settings: &Settings, db_path: &Path) -> Result<()> {
    yuno_db::init_pool(db_path)?;
    println!(
        "{} Database ready: {}",
        "✓".green().bold(),
        db_path.display().to_string().cyan()
    );

    if config_path.exists() && !args.force {
        println!(
            "  {} {} (use --force to overwrite)",
            "Keeping".dimmed(),
            config_path.display()
        );
    } else {
        std::fs::write(config_path, settings.to_toml()?)?;
        println!("{} Settings written: {}", "✓".green().bold(), config_path.display());
    }

    println!();
    println!("{}", "Next steps:".bold());
    println!("  yuno project new <title>     # Create your first project");
    println!("  yuno shell                   # Work interactively");

    Ok(())
}
