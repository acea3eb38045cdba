//! Special commands parser for the interactive chat session
//!
//! Slash-prefixed commands manage the session from inside the chat loop
//! instead of being sent to the assistant:
//! - `/new` starts a fresh session
//! - `/sessions` lists archived sessions
//! - `/switch <id>` resumes an archived session
//! - `/wallet` shows the wallet connection state
//! - `/help` and `/quit` do what they say
//!
//! Commands are case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during an interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Archive the current session and start a new one
    NewSession,

    /// List archived sessions
    ListSessions,

    /// Switch to an archived session by id (or unambiguous id prefix)
    SwitchSession(String),

    /// Show the wallet connection state
    WalletStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send the input to the assistant
    None,
}

/// Parse user input as a special command
///
/// Input that does not begin with `/` is [`SpecialCommand::None`].
///
/// # Examples
///
/// ```
/// use deepsense::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/new").unwrap();
/// assert_eq!(cmd, SpecialCommand::NewSession);
///
/// let cmd = parse_special_command("what is SOL?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or("").to_lowercase();
    let arg = parts.next();

    match command.as_str() {
        "/new" => Ok(SpecialCommand::NewSession),
        "/sessions" => Ok(SpecialCommand::ListSessions),
        "/switch" => match arg {
            Some(id) => Ok(SpecialCommand::SwitchSession(id.to_string())),
            None => Err(CommandError::MissingArgument {
                command: "/switch".to_string(),
                usage: "/switch <session-id>".to_string(),
            }),
        },
        "/wallet" => Ok(SpecialCommand::WalletStatus),
        "/help" => Ok(SpecialCommand::Help),
        "/quit" | "/exit" => Ok(SpecialCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Print help for the special commands
pub fn print_help() {
    println!("Available commands:");
    println!("  /new              Start a new chat session");
    println!("  /sessions         List archived sessions");
    println!("  /switch <id>      Resume an archived session");
    println!("  /wallet           Show wallet connection state");
    println!("  /help             Show this help");
    println!("  /quit             Exit (also /exit or Ctrl-D)");
    println!();
    println!("Anything else is sent to the assistant.");
}
