//! Shell handlers module
//!
//! - Command parsing and dispatch for each shell line
//! - Form input (field edits and form files)
//! - The read/dispatch loop itself

pub mod commands;
pub mod forms;

// Re-export commonly used handler functions
pub use commands::{handle_command, parse_line, Command, Flow, ResourceAction};

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::state::AppContext;
use crate::utils::errors::{ErrorSeverity, PgAdminError, Result};

/// Read commands line by line until `quit` or end of input
pub async fn run_shell<I>(ctx: &mut AppContext, input: I, out: &mut dyn Write) -> Result<()>
where
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        write!(out, "{}", prompt(ctx))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let outcome = match parse_line(line) {
            Ok(command) => {
                debug!(command = command_name(&command), "Handling command");
                handle_command(ctx, command, out).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                if e.severity() >= ErrorSeverity::Error {
                    warn!(error = %e, "Command failed");
                }
                writeln!(out, "{}", describe_error(&e))?;
            }
        }
    }
    Ok(())
}

fn prompt(ctx: &AppContext) -> String {
    match ctx.session.user() {
        Some(user) => format!("pg-admin ({})> ", user.email),
        None => "pg-admin> ".to_string(),
    }
}

/// Command name for logs; never includes arguments such as passwords
fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Login { .. } => "login",
        Command::Logout => "logout",
        Command::Profile => "profile",
        Command::Lockout => "lockout",
        Command::Wait => "wait",
        Command::Status => "status",
        Command::Guests { .. } => "guests",
        Command::Rent { .. } => "rent",
        Command::Reviews { .. } => "reviews",
        Command::Help => "help",
        Command::Quit => "quit",
    }
}

/// Text printed for a command that failed
pub fn describe_error(error: &PgAdminError) -> String {
    match error {
        PgAdminError::Validation(errors) => {
            let mut text = error.user_message();
            for (field, message) in errors.iter() {
                text.push_str(&format!("\n  {}: {}", field, message));
            }
            text
        }
        PgAdminError::InvalidInput(message) => message.clone(),
        PgAdminError::NotAuthenticated => "Please log in first.".to_string(),
        other => other.user_message(),
    }
}
