//! `auth` subcommands

use super::Context;
use anyhow::Result;
use clap::Subcommand;
use foodzippy_client::RestoreOutcome;
use serde::Serialize;
use tracing::info;

/// Sign-in management
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in and save the session
    Login {
        /// Administrator email
        #[arg(short, long, env = "FOODZIPPY_ADMIN_EMAIL")]
        email: String,

        /// Administrator password
        #[arg(short, long, env = "FOODZIPPY_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Check the saved session against the backend
    Status,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionReport<'a> {
    signed_in: bool,
    verified: bool,
    email: Option<&'a str>,
    session_file: String,
}

/// Run an `auth` subcommand
///
/// # Errors
///
/// Returns the sign-in error, or an error if the session file cannot be
/// written or removed.
pub async fn handle(ctx: &Context, action: AuthCommands) -> Result<()> {
    match action {
        AuthCommands::Login { email, password } => {
            let identity = ctx.auth().login(&email, &password).await?;
            info!(session_file = %ctx.session_file().display(), "Session saved");
            ctx.out()
                .done(&format!("Signed in as {}", identity.email));
        }
        AuthCommands::Logout => {
            ctx.auth().logout().await?;
            ctx.out().done("Signed out");
        }
        AuthCommands::Status => {
            let outcome = ctx.auth().restore().await?;
            let email = match &outcome {
                RestoreOutcome::Verified(id) | RestoreOutcome::Unverified(id) => {
                    Some(id.email.as_str())
                }
                RestoreOutcome::SignedOut | RestoreOutcome::Expired => None,
            };
            let report = SessionReport {
                signed_in: outcome.is_authenticated(),
                verified: matches!(outcome, RestoreOutcome::Verified(_)),
                email,
                session_file: ctx.session_file().display().to_string(),
            };
            ctx.out().emit(&report, || match &outcome {
                RestoreOutcome::Verified(id) => println!("Signed in as {}", id.email),
                RestoreOutcome::Unverified(id) => {
                    println!("Signed in as {} (backend unreachable, not verified)", id.email);
                }
                RestoreOutcome::Expired => println!("Session expired, sign in again"),
                RestoreOutcome::SignedOut => println!("Not signed in"),
            })?;
        }
    }
    Ok(())
}
