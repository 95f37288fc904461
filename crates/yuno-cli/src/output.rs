//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use serde::Serialize;
use terminal_size::Width;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use yuno_core::feedback::FeedbackSnapshot;
use yuno_core::project::model::Project;
use yuno_core::task::model::Task;
use yuno_core::task_item::model::{LinkedTaskItem, TaskItemStatus};
use yuno_core::YunoResult;

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> YunoResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print projects as a table.
pub fn print_projects_table(projects: &[Project]) {
    if projects.is_empty() {
        println!("{}", "No projects found. Create one with 'yuno project new <title>'.".dimmed());
        return;
    }

    let title_width = title_column_width();
    println!("{:<4} {:<6} {}", "#", "ID", "Title");
    println!("{}", "─".repeat(12 + title_width));

    for project in projects {
        println!(
            "{:<4} {:<6} {}",
            project.sequence,
            project.id.to_string().dimmed(),
            fit_width(&project.title, title_width).cyan()
        );
    }

    println!();
    println!("{} project(s) total", projects.len());
}

/// Print tasks as a table.
pub fn print_tasks_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return;
    }

    let title_width = title_column_width();
    println!("{:<4} {:<6} {}", "#", "ID", "Title");
    println!("{}", "─".repeat(12 + title_width));

    for task in tasks {
        println!(
            "{:<4} {:<6} {}",
            task.sequence,
            task.id.to_string().dimmed(),
            fit_width(&task.title, title_width)
        );
    }

    println!();
    println!("{} task(s) total", tasks.len());
}

/// Print a single task with its checklist.
pub fn print_task(task: &Task, items: &[LinkedTaskItem]) {
    println!(
        "{} {}",
        task.title.cyan().bold(),
        format!("(#{}, project #{})", task.id, task.project_id).dimmed()
    );

    if let Some(desc) = &task.description {
        println!();
        println!("{}", desc);
    }

    println!();
    print_items(items);
}

/// Print a task's checklist.
pub fn print_items(items: &[LinkedTaskItem]) {
    if items.is_empty() {
        println!("{}", "No items.".dimmed());
        return;
    }

    let pending = items.iter().filter(|i| i.status.is_pending()).count();
    println!("{} {}/{} open", "Checklist".bold(), pending, items.len());

    for item in items {
        let position = item
            .sequence
            .map(|s| format!("{:>2}.", s))
            .unwrap_or_else(|| "   ".to_string());
        let content = match item.status {
            TaskItemStatus::Pending => item.content.normal(),
            TaskItemStatus::Completed => item.content.dimmed(),
            TaskItemStatus::Canceled => item.content.dimmed().strikethrough(),
        };
        println!(
            "  {} {} {} {}",
            position,
            status_marker(item.status),
            content,
            format!("#{}", item.id).dimmed()
        );
    }
}

/// Print the current shell messages, if any.
pub fn print_feedback(snapshot: &FeedbackSnapshot) {
    if let Some(error) = &snapshot.error {
        println!("{} {}", "✗".red().bold(), error.red());
    }
    if let Some(success) = &snapshot.success {
        println!("{} {}", "✓".green().bold(), success.green());
    }
}

fn status_marker(status: TaskItemStatus) -> ColoredString {
    match status {
        TaskItemStatus::Pending => "[ ]".normal(),
        TaskItemStatus::Completed => "[x]".green(),
        TaskItemStatus::Canceled => "[-]".dimmed(),
    }
}

const FALLBACK_COLUMNS: usize = 80;

fn title_column_width() -> usize {
    let columns = terminal_size::terminal_size()
        .map(|(Width(w), _)| usize::from(w))
        .unwrap_or(FALLBACK_COLUMNS);
    // "#" and "ID" columns plus separators take 12.
    columns.saturating_sub(12).clamp(10, 60)
}

/// Shorten `s` to at most `max` terminal columns, marking the cut with `…`.
fn fit_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let Some(budget) = max.checked_sub(1) else {
        return String::new();
    };

    let mut used = 0;
    let mut out: String = s
        .chars()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= budget
        })
        .collect();
    out.push('…');
    out
}
