//! Terminal rendering helpers for the chat presentation layer

use crate::notify::Notice;
use crate::session::message::{Message, Role};
use crate::session::summary::SessionSummary;
use chrono::{Local, TimeZone, Utc};
use colored::Colorize;
use prettytable::{cell, row, Table};

/// Format a message timestamp for display in local time
pub fn format_timestamp(epoch_millis: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_millis).single() {
        Some(ts) => ts.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Render one message to a printable string
pub fn render_message(message: &Message) -> String {
    let stamp = format_timestamp(message.timestamp).dimmed();
    match message.role {
        Role::User => format!("{} {} {}", stamp, "you >".green().bold(), message.content),
        Role::Assistant => {
            let mut out = format!("{} {}\n{}", stamp, "assistant:".cyan().bold(), message.content);
            if let Some(actions) = &message.actions {
                for action in actions {
                    if let Some(quote) = action.swap_quote() {
                        out.push_str(&format!(
                            "\n{}",
                            format!("  [swap] {}", crate::swap::describe_quote(&quote)).yellow()
                        ));
                    }
                }
            }
            out
        }
    }
}

/// Render a notice as a toast-style line
pub fn render_notice(notice: &Notice) -> String {
    format!("{} {}", notice.title().yellow().bold(), notice)
}

/// Line shown while a query is in flight
pub fn loading_line() -> String {
    "assistant is thinking...".dimmed().to_string()
}

/// Welcome banner shown when the message list is empty
pub fn welcome_banner() -> String {
    format!(
        "{}\n{}",
        "Welcome to DeepSense by DPSN".bold(),
        "Start a conversation to begin your chat session.".dimmed()
    )
}

/// Build a table of archived session summaries, newest first
pub fn summary_table(summaries: &[SessionSummary]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["ID", "TITLE", "LAST ACTIVE", "MESSAGES"]);
    for summary in summaries {
        table.add_row(row![
            &summary.id[..summary.id.len().min(8)],
            summary.title,
            format_timestamp(summary.timestamp),
            summary.message_count
        ]);
    }
    table
}
