//! Help and status command handlers

use std::io::Write;
use crate::models::wire::WIRE_SCHEMA_VERSION;
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Handle `help`
pub fn handle_help(out: &mut dyn Write) -> Result<()> {
    let help_text = "PG Admin\n\n\
        login <email> <password>  - Sign in\n\
        logout                    - Sign out\n\
        profile                   - Show your account\n\
        lockout / wait            - Show or follow the login lockout\n\
        status                    - Show service configuration\n\n\
        guests|rent|reviews [action]\n\
        \x20 list, refresh, search [term], page <n>, next, prev\n\
        \x20 view <id>, back, add, edit <id>, delete <id>, summary\n\
        \x20 set <field> <value>, fill <file>, form, submit, cancel\n\n\
        quit                      - Leave the shell";

    writeln!(out, "{}", help_text)?;
    Ok(())
}

/// Handle `status`
pub fn handle_status(ctx: &AppContext, out: &mut dyn Write) -> Result<()> {
    let status = ctx.services.status(&ctx.settings);

    writeln!(out, "API:            {} (schema v{})", status.api_base_url, WIRE_SCHEMA_VERSION)?;
    writeln!(out, "Lockout state:  {}", status.state_path)?;
    writeln!(
        out,
        "Notifications:  {}",
        if status.notification_enabled { "enabled" } else { "disabled" }
    )?;
    match ctx.session.user() {
        Some(user) => writeln!(out, "Signed in as:   {}", user.email)?,
        None => writeln!(out, "Signed in as:   -")?,
    }
    for issue in status.get_issues() {
        writeln!(out, "! {}", issue)?;
    }
    Ok(())
}
