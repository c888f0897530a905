//! Foodzippy admin console
//!
//! Command line front end for the Foodzippy vendor onboarding backend:
//! vendor review, edit requests, staff accounts, attendance, the vendor form
//! builder, agent payments, notifications and the partner, careers,
//! franchise and newsletter areas.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::Context;
use commands::auth::AuthCommands;
use commands::content::{
    CareerCommands, EmailCommands, FranchiseCommands, PartnerCommands, SubscriberCommands,
};
use commands::forms::{FormCommands, VendorTypeCommands};
use commands::inbox::NotificationCommands;
use commands::payments::PaymentCommands;
use commands::staff::{AttendanceCommands, UserCommands};
use commands::vendors::{EditRequestCommands, VendorCommands};
use foodzippy_client::{ApiClient, AuthContext, ClientError, FileSessionStore};
use foodzippy_core::Config;
use output::Output;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

/// Command line interface for the Foodzippy admin console
#[derive(Parser)]
#[command(
    name = "foodzippy-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for the Foodzippy vendor onboarding platform",
    long_about = "Review vendors and edit requests, manage agents and employees, build the vendor registration form, settle agent payments and run the partner, careers, franchise and newsletter areas of the Foodzippy backend."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format (json, pretty); overrides the config
    #[arg(long)]
    log_format: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Session file; overrides the config
    #[arg(long, value_name = "FILE", env = "FOODZIPPY_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out and check the session
    Auth {
        /// Auth subcommand
        #[command(subcommand)]
        action: AuthCommands,
    },

    /// Review and manage vendors
    Vendors {
        /// Vendor subcommand
        #[command(subcommand)]
        action: VendorCommands,
    },

    /// Vendor edit requests
    EditRequests {
        /// Edit request subcommand
        #[command(subcommand)]
        action: EditRequestCommands,
    },

    /// Agent and employee accounts
    Users {
        /// User subcommand
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Attendance reports
    Attendance {
        /// Attendance subcommand
        #[command(subcommand)]
        action: AttendanceCommands,
    },

    /// Vendor registration form builder
    Forms {
        /// Form subcommand
        #[command(subcommand)]
        action: FormCommands,
    },

    /// Vendor types
    VendorTypes {
        /// Vendor type subcommand
        #[command(subcommand)]
        action: VendorTypeCommands,
    },

    /// Field agent payments
    Payments {
        /// Payment subcommand
        #[command(subcommand)]
        action: PaymentCommands,
    },

    /// Vendor update notifications
    Notifications {
        /// Notification subcommand
        #[command(subcommand)]
        action: NotificationCommands,
    },

    /// Delivery partner applications
    Partners {
        /// Partner subcommand
        #[command(subcommand)]
        action: PartnerCommands,
    },

    /// Job applications
    Careers {
        /// Careers subcommand
        #[command(subcommand)]
        action: CareerCommands,
    },

    /// Franchise inquiries
    Franchise {
        /// Franchise subcommand
        #[command(subcommand)]
        action: FranchiseCommands,
    },

    /// Email templates and newsletter drafts
    Emails {
        /// Email subcommand
        #[command(subcommand)]
        action: EmailCommands,
    },

    /// Newsletter subscribers
    Subscribers {
        /// Subscriber subcommand
        #[command(subcommand)]
        action: SubscriberCommands,
    },

    /// Poll the unread counters until Ctrl+C
    Watch {
        /// Seconds between polls; defaults to the config
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Inspect the configuration
    Config {
        /// Configuration subcommand
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration commands
#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration
    Show,
}

impl Commands {
    /// Commands that work without a saved session
    const fn needs_session(&self) -> bool {
        !matches!(self, Self::Auth { .. } | Self::Config { .. })
    }
}

/// Main entry point for the admin console
#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

/// Load configuration, set up logging and the session, then dispatch
///
/// # Errors
///
/// Returns the first error raised by configuration, sign-in or the command.
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    foodzippy_core::init_logging(level, format == "json")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "Foodzippy admin console starting"
    );

    let out = Output::new(cli.json);
    if let Commands::Config {
        action: ConfigCommands::Show,
    } = &cli.command
    {
        return show_config(&config, out);
    }

    let session_file = cli
        .session_file
        .unwrap_or_else(|| config.session.resolved_path());
    debug!(session_file = %session_file.display(), "Using session file");

    let client = ApiClient::from_config(&config.api)?;
    let store = Arc::new(FileSessionStore::new(session_file.clone()));
    let auth = AuthContext::new(client, store, config.retry.clone());
    let ctx = Context::new(auth, config, session_file, out);

    if cli.command.needs_session() {
        let identity = ctx.signed_in().await?;
        debug!(email = %identity.email, role = ?identity.role, "Signed in");
    }

    dispatch(&ctx, cli.command).await
}

async fn dispatch(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(ctx, action).await,
        Commands::Vendors { action } => commands::vendors::handle(ctx, action).await,
        Commands::EditRequests { action } => {
            commands::vendors::handle_edit_requests(ctx, action).await
        }
        Commands::Users { action } => commands::staff::handle_users(ctx, action).await,
        Commands::Attendance { action } => commands::staff::handle_attendance(ctx, action).await,
        Commands::Forms { action } => commands::forms::handle_forms(ctx, action).await,
        Commands::VendorTypes { action } => {
            commands::forms::handle_vendor_types(ctx, action).await
        }
        Commands::Payments { action } => commands::payments::handle(ctx, action).await,
        Commands::Notifications { action } => commands::inbox::handle(ctx, action).await,
        Commands::Partners { action } => commands::content::handle_partners(ctx, action).await,
        Commands::Careers { action } => commands::content::handle_careers(ctx, action).await,
        Commands::Franchise { action } => commands::content::handle_franchise(ctx, action).await,
        Commands::Emails { action } => commands::content::handle_emails(ctx, action).await,
        Commands::Subscribers { action } => {
            commands::content::handle_subscribers(ctx, action).await
        }
        Commands::Watch { interval } => commands::inbox::watch(ctx, interval).await,
        Commands::Config { action } => match action {
            ConfigCommands::Show => show_config(ctx.config(), ctx.out()),
        },
    }
}

/// Print the resolved configuration as TOML, or JSON with `--json`
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
fn show_config(config: &Config, out: Output) -> Result<()> {
    if out.is_json() {
        return out.emit(config, || {});
    }
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// One line for the terminal, preferring the library's own wording
fn describe(err: &anyhow::Error) -> String {
    if let Some(client) = err.downcast_ref::<ClientError>() {
        return client.user_message();
    }
    if let Some(core) = err.downcast_ref::<foodzippy_core::Error>() {
        return core.user_message();
    }
    format!("{err:#}")
}
