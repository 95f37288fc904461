//! Project management commands.

use clap::{Args, Subcommand};
use yuno_core::project;
use yuno_core::YunoResult;
use yuno_db::DbPool;

use crate::output;

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project
    New(NewProjectArgs),

    /// List all projects
    List(ListArgs),

    /// Change a project's title and description
    Edit(EditProjectArgs),

    /// Move a project to another position
    Move(MoveArgs),

    /// Delete a project and its tasks
    Rm(IdArgs),
}

#[derive(Args)]
pub struct NewProjectArgs {
    /// Project title
    pub title: String,

    /// Project description
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct EditProjectArgs {
    /// Project ID
    pub id: i64,

    /// New title
    pub title: String,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Project ID
    pub id: i64,

    /// Target position (1 = first)
    pub position: i64,
}

#[derive(Args)]
pub struct IdArgs {
    /// Project ID
    pub id: i64,
}

pub fn execute(cmd: ProjectCommands, pool: &DbPool) -> YunoResult<String> {
    match cmd {
        ProjectCommands::New(args) => {
            let project = project::create_project(pool, &args.title, args.description.as_deref())?;
            Ok(format!("Created project #{}: {}", project.id, project.title))
        }

        ProjectCommands::List(args) => {
            let projects = project::list_projects(pool)?;
            if args.json {
                output::print_json(&projects)?;
            } else {
                output::print_projects_table(&projects);
            }
            Ok(String::new())
        }

        ProjectCommands::Edit(args) => {
            let project = project::update_project_content(
                pool,
                args.id,
                &args.title,
                args.description.as_deref(),
            )?;
            Ok(format!("Updated project #{}", project.id))
        }

        ProjectCommands::Move(args) => {
            project::move_project(pool, args.id, args.position)?;
            Ok(format!("Moved project #{} to position {}", args.id, args.position))
        }

        ProjectCommands::Rm(args) => {
            project::delete_project(pool, args.id)?;
            Ok(format!("Deleted project #{}", args.id))
        }
    }
}
