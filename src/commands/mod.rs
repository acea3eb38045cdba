//! Command handlers for the DeepSense CLI
//!
//! Each subcommand gets a handler module; the interactive chat loop lives
//! here alongside session-listing. Handlers wire configuration into the
//! core components and own all terminal I/O.

use crate::config::Config;
use crate::error::Result;
use crate::query::QueryClient;
use crate::render;
use crate::session::summary::SessionSummary;
use crate::session::{ChatController, SessionStore};
use crate::wallet;

pub mod special_commands;

use special_commands::{parse_special_command, print_help, SpecialCommand};

/// Resolve user input to a known session id
///
/// Accepts a full id or a prefix; a prefix must match exactly one archived
/// session.
fn resolve_session_id(summaries: &[SessionSummary], input: &str) -> Option<String> {
    if summaries.iter().any(|s| s.id == input) {
        return Some(input.to_string());
    }

    let mut matches = summaries.iter().filter(|s| s.id.starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.id.clone()),
        _ => None,
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Builds the session store, query client, and controller, then runs a
    //! readline loop that routes slash commands to the controller and sends
    //! everything else to the assistant.

    use super::*;
    use crate::swap::{SwapWidget, SwapWidgetConfig, TerminalSwapPanel};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start an interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat session");

        let store_path = config.storage.resolve_path()?;
        let store = SessionStore::open(&store_path)?;
        let query = QueryClient::new(&config.query)?;
        let wallet = wallet::from_config(config.wallet.address.as_deref());

        let mut controller = ChatController::new(store, query, wallet, config.limits)?;

        // The swap surface is a capability resolved at startup; the terminal
        // panel stands in for the embedded widget.
        let swap_panel: Box<dyn SwapWidget> = Box::new(TerminalSwapPanel);

        println!("{}", render::welcome_banner());
        if let Some(address) = controller.wallet().address() {
            println!(
                "{}",
                format!("Wallet connected: {}", wallet::short_address(&address)).dimmed()
            );
        }
        println!();

        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::NewSession) => {
                            controller.start_new_session()?;
                            println!("Started a new chat session.\n");
                            continue;
                        }
                        Ok(SpecialCommand::ListSessions) => {
                            print_session_list(controller.summaries());
                            continue;
                        }
                        Ok(SpecialCommand::SwitchSession(input)) => {
                            match resolve_session_id(controller.summaries(), &input) {
                                Some(id) => {
                                    controller.select_session(&id)?;
                                    println!(
                                        "Resumed session {} ({} messages)\n",
                                        &id[..id.len().min(8)],
                                        controller.messages().len()
                                    );
                                    for message in controller.messages() {
                                        println!("{}", render::render_message(message));
                                    }
                                }
                                None => {
                                    println!(
                                        "{}",
                                        format!("No archived session matches '{}'", input)
                                            .yellow()
                                    );
                                }
                            }
                            continue;
                        }
                        Ok(SpecialCommand::WalletStatus) => {
                            match controller.wallet().address() {
                                Some(address) => println!(
                                    "Wallet connected: {}",
                                    wallet::short_address(&address)
                                ),
                                None => println!("No wallet connected."),
                            }
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {
                            // Regular assistant prompt
                        }
                        Err(e) => {
                            println!("{}", e.to_string().yellow());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;

                    println!("{}", render::loading_line());
                    controller.send_message(trimmed).await?;

                    for notice in controller.take_notices() {
                        println!("{}", render::render_notice(&notice));
                    }

                    if let Some(message) = controller.messages().last() {
                        println!("{}\n", render::render_message(message));

                        if let Some(actions) = &message.actions {
                            for action in actions {
                                if let Some(quote) = action.swap_quote() {
                                    let widget_config =
                                        SwapWidgetConfig::from_quote(&quote, &config.swap);
                                    swap_panel.init(&widget_config)?;
                                }
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        // Teardown: archive-or-remove, same as the new-session path. If the
        // process dies before this runs the stored state is still consistent.
        controller.flush()?;
        println!("Session saved. Goodbye.");
        Ok(())
    }

    fn print_session_list(summaries: &[SessionSummary]) {
        if summaries.is_empty() {
            println!("No archived sessions yet.\n");
            return;
        }
        render::summary_table(summaries).printstd();
        println!();
    }
}

// Sessions command handler
pub mod sessions {
    //! Archived-session listing handler.

    use super::*;

    /// List archived chat sessions, newest first
    pub fn run_sessions(config: Config) -> Result<()> {
        let store = SessionStore::open(config.storage.resolve_path()?)?;
        let summaries = store.load_session_summaries();

        if summaries.is_empty() {
            println!("No archived sessions yet.");
            return Ok(());
        }

        render::summary_table(&summaries).printstd();
        Ok(())
    }
}
