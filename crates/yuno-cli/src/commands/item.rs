//! Checklist item commands.

use clap::{Args, Subcommand};
use yuno_core::task_item::{self, model::TaskItemStatus};
use yuno_core::YunoResult;
use yuno_db::DbPool;

use crate::output;

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add a new item to a task
    New(NewItemArgs),

    /// Attach an existing item to another task
    Link(LinkItemArgs),

    /// List a task's items
    List(ListItemsArgs),

    /// Change an item's text
    Edit(EditItemArgs),

    /// Mark an item as completed
    Done(ItemIdArgs),

    /// Mark an item as canceled
    Cancel(ItemIdArgs),

    /// Mark a finished item as pending again
    Reopen(ItemIdArgs),

    /// Move a pending item within a task
    Move(MoveItemArgs),

    /// Delete an item from all tasks
    Rm(ItemIdArgs),
}

#[derive(Args)]
pub struct NewItemArgs {
    /// Task ID
    pub task_id: i64,

    /// Item text
    pub content: String,
}

#[derive(Args)]
pub struct LinkItemArgs {
    /// Task ID to attach the item to
    pub task_id: i64,

    /// Item ID
    pub item_id: i64,
}

#[derive(Args)]
pub struct ListItemsArgs {
    /// Task ID
    pub task_id: i64,

    /// Print JSON instead of a list
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct EditItemArgs {
    /// Item ID
    pub id: i64,

    /// New text
    pub content: String,
}

#[derive(Args)]
pub struct ItemIdArgs {
    /// Item ID
    pub id: i64,
}

#[derive(Args)]
pub struct MoveItemArgs {
    /// Task ID
    pub task_id: i64,

    /// Item ID
    pub item_id: i64,

    /// Target position (1 = first)
    pub position: i64,
}

pub fn execute(cmd: ItemCommands, pool: &DbPool) -> YunoResult<String> {
    match cmd {
        ItemCommands::New(args) => {
            let item = task_item::create_task_item(pool, args.task_id, &args.content)?;
            Ok(format!("Added item #{} to task #{}", item.id, args.task_id))
        }

        ItemCommands::Link(args) => {
            let position = task_item::link_task_item(pool, args.task_id, args.item_id)?;
            Ok(match position {
                Some(position) => format!(
                    "Linked item #{} to task #{} at position {}",
                    args.item_id, args.task_id, position
                ),
                None => format!("Linked item #{} to task #{}", args.item_id, args.task_id),
            })
        }

        ItemCommands::List(args) => {
            let items = task_item::list_task_items(pool, args.task_id)?;
            if args.json {
                output::print_json(&items)?;
            } else {
                output::print_items(&items);
            }
            Ok(String::new())
        }

        ItemCommands::Edit(args) => {
            let item = task_item::get_task_item(pool, args.id)?;
            task_item::update_task_item(pool, args.id, &args.content, item.status)?;
            Ok(format!("Updated item #{}", args.id))
        }

        ItemCommands::Done(args) => set_status(pool, args.id, TaskItemStatus::Completed),
        ItemCommands::Cancel(args) => set_status(pool, args.id, TaskItemStatus::Canceled),
        ItemCommands::Reopen(args) => set_status(pool, args.id, TaskItemStatus::Pending),

        ItemCommands::Move(args) => {
            task_item::move_task_item(pool, args.task_id, args.item_id, args.position)?;
            Ok(format!("Moved item #{} to position {}", args.item_id, args.position))
        }

        ItemCommands::Rm(args) => {
            task_item::delete_task_item(pool, args.id)?;
            Ok(format!("Deleted item #{}", args.id))
        }
    }
}

fn set_status(pool: &DbPool, id: i64, status: TaskItemStatus) -> YunoResult<String> {
    let item = task_item::set_status(pool, id, status)?;
    Ok(format!("Item #{} is now {}", item.id, item.status))
}
