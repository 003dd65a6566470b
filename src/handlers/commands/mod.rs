//! Command handlers module
//!
//! This module contains handlers for every shell command: session commands
//! (login, logout, profile, lockout), and the list/detail/form commands shared
//! by guests, rent records and reviews.

pub mod guests;
pub mod help;
pub mod rent;
pub mod resources;
pub mod reviews;
pub mod session;

use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, Subcommand};

use crate::state::AppContext;
use crate::utils::errors::{PgAdminError, Result};

/// One line typed into the shell
#[derive(Parser, Debug)]
#[command(
    name = "pg-admin",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

/// All available shell commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sign in
    Login {
        #[arg(default_value = "")]
        email: String,
        #[arg(default_value = "")]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Profile,
    /// Show failed attempts and any active lock
    Lockout,
    /// Follow the lockout countdown until login is possible again
    Wait,
    /// Show service configuration
    Status,
    /// Manage guests
    Guests {
        #[command(subcommand)]
        action: Option<ResourceAction>,
    },
    /// Manage rent records
    Rent {
        #[command(subcommand)]
        action: Option<ResourceAction>,
    },
    /// Manage reviews
    Reviews {
        #[command(subcommand)]
        action: Option<ResourceAction>,
    },
    /// Show help information
    Help,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Actions shared by every resource page
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ResourceAction {
    /// Show the current page
    List,
    /// Reload from the server
    Refresh,
    /// Filter by name and other searchable fields; no term clears the filter
    Search { term: Vec<String> },
    /// Go to a page
    Page { number: usize },
    /// Next page
    Next,
    /// Previous page
    Prev,
    /// Show one record
    View { id: String },
    /// Leave the detail view
    Back,
    /// Start a new record
    Add,
    /// Edit a record
    Edit { id: String },
    /// Set one form field, e.g. `set amountPaid 8500`
    Set { field: String, value: Vec<String> },
    /// Fill the form from a JSON or TOML file
    Fill { file: PathBuf },
    /// Show the form
    Form,
    /// Validate and save the form
    Submit,
    /// Discard the form
    Cancel,
    /// Delete a record
    Delete { id: String },
    /// Totals over the loaded records
    Summary,
}

impl ResourceAction {
    /// Whether the action works on the loaded collection
    pub fn needs_items(&self) -> bool {
        matches!(
            self,
            ResourceAction::List
                | ResourceAction::Search { .. }
                | ResourceAction::Page { .. }
                | ResourceAction::Next
                | ResourceAction::Prev
                | ResourceAction::Edit { .. }
                | ResourceAction::Summary
        )
    }
}

/// What the shell loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse a shell line into a command
pub fn parse_line(line: &str) -> Result<Command> {
    let words = split_words(line)?;
    ShellLine::try_parse_from(words)
        .map(|parsed| parsed.command)
        .map_err(|e| PgAdminError::InvalidInput(e.render().to_string()))
}

/// Split on whitespace, keeping double-quoted sections together
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut started = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    words.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }

    if quoted {
        return Err(PgAdminError::InvalidInput("Unterminated quote".to_string()));
    }
    if started {
        words.push(current);
    }
    Ok(words)
}

/// Main command dispatcher
pub async fn handle_command(ctx: &mut AppContext, command: Command, out: &mut dyn Write) -> Result<Flow> {
    match command {
        Command::Login { email, password } => session::handle_login(ctx, &email, &password, out).await?,
        Command::Logout => session::handle_logout(ctx, out)?,
        Command::Profile => session::handle_profile(ctx, out)?,
        Command::Lockout => session::handle_lockout(ctx, out).await?,
        Command::Wait => session::handle_wait(ctx, out).await?,
        Command::Status => help::handle_status(ctx, out)?,
        Command::Help => help::handle_help(out)?,
        Command::Quit => return Ok(Flow::Quit),
        Command::Guests { action } => {
            ctx.session.require_user()?;
            resources::handle_resource(&mut ctx.guests, action.unwrap_or(ResourceAction::List), out).await?
        }
        Command::Rent { action } => {
            ctx.session.require_user()?;
            resources::handle_resource(&mut ctx.rent, action.unwrap_or(ResourceAction::List), out).await?
        }
        Command::Reviews { action } => {
            ctx.session.require_user()?;
            resources::handle_resource(&mut ctx.reviews, action.unwrap_or(ResourceAction::List), out).await?
        }
    }
    Ok(Flow::Continue)
}
