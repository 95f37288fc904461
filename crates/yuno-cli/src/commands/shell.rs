//! Interactive shell.
//!
//! Reads commands line by line and runs them against one open database.
//! The outcome of every command is written to the shell's error or success
//! message, shown above the prompt until it is auto-dismissed a minute later.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use yuno_core::config::Settings;
use yuno_core::feedback::Feedback;
use yuno_db::DbPool;

use super::Action;
use crate::output;

const PROMPT: &str = "yuno> ";

/// One line of shell input.
#[derive(Parser)]
#[command(name = "yuno", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    action: Action,
}

/// What the loop does after a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub async fn execute(settings: &Settings, db_path: &Path) -> Result<()> {
    let pool = yuno_db::init_pool(db_path)?;
    let feedback = Feedback::new(settings.dismiss_options())?;

    println!(
        "{} {} {}",
        "Yuno".cyan().bold(),
        "shell".bold(),
        format!("({})", db_path.display()).dimmed()
    );
    println!("  {}", "Type 'help' for commands, 'exit' to quit.".dimmed());
    println!();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        output::print_feedback(&feedback.snapshot());
        print!("{}", PROMPT.cyan());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        if handle_line(&line, &pool, &feedback) == Flow::Exit {
            break;
        }
    }

    debug!(pending = feedback.pending_dismissals(), "Shell closed");
    Ok(())
}

fn handle_line(line: &str, pool: &DbPool, feedback: &Feedback) -> Flow {
    let line = line.trim();
    match line {
        "" => return Flow::Continue,
        "exit" | "quit" => return Flow::Exit,
        "clear" => {
            feedback.error_slot().clear();
            feedback.success_slot().clear();
            return Flow::Continue;
        }
        _ => {}
    }

    let words = match split_words(line) {
        Ok(words) => words,
        Err(e) => {
            feedback.error(e);
            return Flow::Continue;
        }
    };

    let parsed = match ShellLine::try_parse_from(&words) {
        Ok(parsed) => parsed,
        Err(e) => {
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    let _ = e.print();
                }
                _ => {
                    let first = e.to_string();
                    let first = first.lines().next().unwrap_or_default();
                    feedback.error(first.trim_start_matches("error: ").to_string());
                }
            }
            return Flow::Continue;
        }
    };

    let _ = feedback.report(parsed.action.run(pool), |message| {
        if message.is_empty() {
            "Done".to_string()
        } else {
            message.clone()
        }
    });
    Flow::Continue
}

/// Split a line into words, honouring single and double quotes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("Unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
