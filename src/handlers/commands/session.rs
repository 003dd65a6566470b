//! Session command handlers

use std::io::Write;
use futures::StreamExt;

use crate::state::AppContext;
use crate::utils::errors::{LoginError, Result};

/// Handle `login`
pub async fn handle_login(ctx: &mut AppContext, email: &str, password: &str, out: &mut dyn Write) -> Result<()> {
    if let Some(user) = ctx.session.user() {
        writeln!(out, "Already signed in as {}. Log out first.", user.email)?;
        return Ok(());
    }

    match ctx.session.login(email, password).await {
        Ok(success) => {
            writeln!(out, "Welcome back, {}!", success.user.name)?;
            if let Some(warning) = success.warning {
                writeln!(out, "Warning: {}", warning)?;
            }
        }
        Err(e) => {
            writeln!(out, "{}", e)?;
            report_lock_progress(ctx, &e, out).await?;
        }
    }
    Ok(())
}

async fn report_lock_progress(ctx: &AppContext, error: &LoginError, out: &mut dyn Write) -> Result<()> {
    if error.is_lockout() {
        return Ok(());
    }

    match error.locked_for() {
        Some(seconds) => writeln!(out, "Login is locked for {} seconds.", seconds)?,
        None => {
            let controller = ctx.session.login_controller();
            let left = controller.state().await.attempts_left(&controller.policy());
            writeln!(out, "{} attempt(s) left before login is locked.", left)?;
        }
    }
    Ok(())
}

/// Handle `logout`
pub fn handle_logout(ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    match ctx.logout() {
        Some(user) => writeln!(out, "Goodbye, {}.", user.name)?,
        None => writeln!(out, "Not signed in.")?,
    }
    Ok(())
}

/// Handle `profile`
pub fn handle_profile(ctx: &AppContext, out: &mut dyn Write) -> Result<()> {
    let profile = ctx.session.profile()?;

    writeln!(out, "Full name:      {}", profile.name)?;
    writeln!(out, "Email address:  {}", profile.email)?;
    writeln!(out, "User ID:        {}", profile.id)?;
    Ok(())
}

/// Handle `lockout`
pub async fn handle_lockout(ctx: &AppContext, out: &mut dyn Write) -> Result<()> {
    let controller = ctx.session.login_controller();
    let state = controller.state().await;
    let policy = controller.policy();

    writeln!(out, "Failed attempts:  {}/{}", state.attempt_count, policy.max_attempts)?;
    writeln!(
        out,
        "Next lock:        {} seconds",
        policy.base_lockout_seconds.saturating_mul(u64::from(state.backoff_multiplier))
    )?;
    match controller.remaining_seconds() {
        0 => writeln!(out, "Login is open.")?,
        seconds => writeln!(out, "Locked, {} seconds remaining.", seconds)?,
    }
    Ok(())
}

/// Handle `wait`: print the countdown once per second until the lock clears
pub async fn handle_wait(ctx: &AppContext, out: &mut dyn Write) -> Result<()> {
    let controller = ctx.session.login_controller();
    if !controller.is_locked() {
        writeln!(out, "Login is not locked.")?;
        return Ok(());
    }

    let mut countdown = Box::pin(controller.countdown());
    while let Some(remaining) = countdown.next().await {
        if remaining == 0 {
            writeln!(out, "Login unlocked. You can try again.")?;
        } else {
            writeln!(out, "Please wait {}s", remaining)?;
        }
        out.flush()?;
    }
    Ok(())
}
