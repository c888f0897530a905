//! Subcommand handlers, one module per console area

pub mod auth;
pub mod content;
pub mod forms;
pub mod inbox;
pub mod payments;
pub mod staff;
pub mod vendors;

use crate::output::Output;
use anyhow::Result;
use foodzippy_client::{ApiClient, AuthContext, RestoreOutcome};
use foodzippy_core::{AdminIdentity, Config};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything a handler needs for one run
pub struct Context {
    auth: AuthContext,
    config: Config,
    session_file: PathBuf,
    out: Output,
}

impl Context {
    /// Bundle the run's session, configuration and printer
    pub const fn new(auth: AuthContext, config: Config, session_file: PathBuf, out: Output) -> Self {
        Self {
            auth,
            config,
            session_file,
            out,
        }
    }

    /// Authenticated API client
    pub const fn client(&self) -> &ApiClient {
        self.auth.client()
    }

    /// Session owner
    pub const fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Resolved configuration
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Session file in use
    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// Result printer
    pub const fn out(&self) -> Output {
        self.out
    }

    /// Restore the saved session and require a signed-in administrator
    ///
    /// # Errors
    ///
    /// Returns an error when nothing is saved, the token was rejected, or
    /// the session file cannot be read.
    pub async fn signed_in(&self) -> Result<AdminIdentity> {
        match self.auth.restore().await? {
            RestoreOutcome::Verified(identity) => {
                debug!(email = %identity.email, "Session verified");
            }
            RestoreOutcome::Unverified(identity) => {
                warn!(email = %identity.email, "Backend unreachable, continuing with the saved session");
            }
            RestoreOutcome::Expired => warn!("Saved session expired"),
            RestoreOutcome::SignedOut => {}
        }
        Ok(self.auth.require()?)
    }
}

/// Parse `YYYY-MM` into year and month
///
/// # Errors
///
/// Returns a message suitable for clap when the value is malformed.
pub fn parse_month(value: &str) -> std::result::Result<(i32, u32), String> {
    let malformed = || format!("expected YYYY-MM, got '{value}'");
    let (year, month) = value.trim().split_once('-').ok_or_else(malformed)?;
    let year: i32 = year.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&month) {
        return Err(format!("month must be between 1 and 12, got {month}"));
    }
    Ok((year, month))
}
