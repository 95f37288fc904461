//! Task management commands.

use clap::{Args, Subcommand};
use yuno_core::{task, task_item};
use yuno_core::YunoResult;
use yuno_db::DbPool;

use crate::output;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a new task in a project
    New(NewTaskArgs),

    /// List a project's tasks
    List(ListTasksArgs),

    /// Show a task with its checklist
    Show(TaskIdArgs),

    /// Change a task's title and description
    Edit(EditTaskArgs),

    /// Move a task to another position within its project
    Move(MoveTaskArgs),

    /// Delete a task
    Rm(TaskIdArgs),
}

#[derive(Args)]
pub struct NewTaskArgs {
    /// Project ID
    pub project_id: i64,

    /// Task title
    pub title: String,

    /// Task description
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ListTasksArgs {
    /// Project ID
    pub project_id: i64,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TaskIdArgs {
    /// Task ID
    pub id: i64,
}

#[derive(Args)]
pub struct EditTaskArgs {
    /// Task ID
    pub id: i64,

    /// New title
    pub title: String,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct MoveTaskArgs {
    /// Task ID
    pub id: i64,

    /// Target position (1 = first)
    pub position: i64,
}

pub fn execute(cmd: TaskCommands, pool: &DbPool) -> YunoResult<String> {
    match cmd {
        TaskCommands::New(args) => {
            let task = task::create_task(
                pool,
                args.project_id,
                &args.title,
                args.description.as_deref(),
            )?;
            Ok(format!("Created task #{}: {}", task.id, task.title))
        }

        TaskCommands::List(args) => {
            let tasks = task::list_tasks(pool, args.project_id)?;
            if args.json {
                output::print_json(&tasks)?;
            } else {
                output::print_tasks_table(&tasks);
            }
            Ok(String::new())
        }

        TaskCommands::Show(args) => {
            let task = task::get_task(pool, args.id)?;
            let items = task_item::list_task_items(pool, task.id)?;
            output::print_task(&task, &items);
            Ok(String::new())
        }

        TaskCommands::Edit(args) => {
            let task = task::update_task_content(
                pool,
                args.id,
                &args.title,
                args.description.as_deref(),
            )?;
            Ok(format!("Updated task #{}", task.id))
        }

        TaskCommands::Move(args) => {
            task::move_task(pool, args.id, args.position)?;
            Ok(format!("Moved task #{} to position {}", args.id, args.position))
        }

        TaskCommands::Rm(args) => {
            task::delete_task(pool, args.id)?;
            Ok(format!("Deleted task #{}", args.id))
        }
    }
}
