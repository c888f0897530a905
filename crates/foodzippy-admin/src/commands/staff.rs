//! `users` and `attendance` subcommands

use super::{Context, parse_month};
use crate::output::{Table, date, or_dash, timestamp, yes_no};
use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::{Args, Subcommand};
use foodzippy_client::AttendanceSource;
use foodzippy_core::Role;
use foodzippy_core::staff::{
    AttendanceQuery, AttendanceRecord, NewAgent, NewStaffUser, StaffUpdate, StaffUser,
    format_minutes,
};
use std::path::PathBuf;

/// Agent and employee accounts
#[derive(Subcommand)]
pub enum UserCommands {
    /// List accounts
    List {
        /// Only this role (agent, employee)
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// Show one account
    Show {
        /// Account id
        id: String,
    },

    /// Create an account
    Create {
        /// Full name
        #[arg(long)]
        name: String,

        /// Login name
        #[arg(long)]
        username: String,

        /// Initial password
        #[arg(long)]
        password: String,

        /// Role (agent, employee)
        #[arg(long, default_value = "agent")]
        role: Role,

        /// Phone number
        #[arg(long)]
        mobile: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
    },

    /// Change account details
    Update {
        /// Account id
        id: String,

        #[command(flatten)]
        changes: AccountChanges,

        /// Profile picture to upload
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },

    /// Allow the account to sign in
    Activate {
        /// Account id
        id: String,
    },

    /// Block the account from signing in
    Deactivate {
        /// Account id
        id: String,
    },

    /// Delete an account
    Delete {
        /// Account id
        id: String,
    },

    /// Accounts on the legacy agent endpoints
    Agents {
        /// Agent subcommand
        #[command(subcommand)]
        action: AgentCommands,
    },
}

/// Legacy agent accounts
#[derive(Subcommand)]
pub enum AgentCommands {
    /// List agents
    List,

    /// Show one agent
    Show {
        /// Agent id
        id: String,
    },

    /// Create an agent
    Create {
        /// Full name
        #[arg(long)]
        name: String,

        /// Login name
        #[arg(long)]
        username: String,

        /// Initial password
        #[arg(long)]
        password: String,
    },

    /// Change agent details
    Update {
        /// Agent id
        id: String,

        #[command(flatten)]
        changes: AccountChanges,
    },

    /// Delete an agent
    Delete {
        /// Agent id
        id: String,
    },
}

/// Editable account fields; unset flags stay unchanged
#[derive(Args)]
pub struct AccountChanges {
    /// Full name
    #[arg(long)]
    name: Option<String>,

    /// Login name
    #[arg(long)]
    username: Option<String>,

    /// New password
    #[arg(long)]
    password: Option<String>,

    /// Phone number
    #[arg(long)]
    mobile: Option<String>,

    /// Email address
    #[arg(long)]
    email: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    dob: Option<String>,
}

impl From<AccountChanges> for StaffUpdate {
    fn from(changes: AccountChanges) -> Self {
        Self {
            name: changes.name,
            username: changes.username,
            password: changes.password.filter(|p| !p.is_empty()),
            is_active: None,
            mobile_number: changes.mobile,
            email: changes.email,
            dob: changes.dob,
        }
    }
}

/// Attendance reports
#[derive(Subcommand)]
pub enum AttendanceCommands {
    /// Everyone's attendance for a month
    Overview {
        /// Month as YYYY-MM; defaults to the current month
        #[arg(short, long, value_parser = parse_month)]
        month: Option<(i32, u32)>,

        /// Only this role (agent, employee)
        #[arg(short, long)]
        role: Option<Role>,

        /// Only this status label, e.g. present or half-day
        #[arg(short, long)]
        status: Option<String>,

        /// Read the legacy agent-only report
        #[arg(long)]
        legacy: bool,

        /// Only this agent on the legacy report
        #[arg(long, requires = "legacy")]
        agent: Option<String>,
    },

    /// One person's attendance for a month
    Person {
        /// Account id
        id: String,

        /// Month as YYYY-MM; defaults to the current month
        #[arg(short, long, value_parser = parse_month)]
        month: Option<(i32, u32)>,

        /// Read the legacy agent-only report
        #[arg(long)]
        legacy: bool,
    },
}

/// Run a `users` subcommand
///
/// # Errors
///
/// Returns a validation error for incomplete input, or the request error.
pub async fn handle_users(ctx: &Context, action: UserCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        UserCommands::List { role } => {
            let users = client.list_users(role).await?;
            ctx.out().emit(&users, || print_users(&users))?;
        }
        UserCommands::Show { id } => {
            let user = client.get_user(&id).await?;
            ctx.out().emit(&user, || print_user(&user))?;
        }
        UserCommands::Create {
            name,
            username,
            password,
            role,
            mobile,
            email,
            dob,
        } => {
            let mut user = NewStaffUser::new(name, username, password, role);
            user.mobile_number = mobile;
            user.email = email;
            user.dob = dob;
            let created = client.create_user(&user).await?;
            ctx.out().emit(&created, || {
                println!("Created {} {} ({})", role, created.name, created.id);
            })?;
        }
        UserCommands::Update { id, changes, image } => {
            let update = StaffUpdate::from(changes);
            let user = client.update_user(&id, &update, image.as_deref()).await?;
            ctx.out()
                .emit(&user, || println!("Updated {}", user.name))?;
        }
        UserCommands::Activate { id } => {
            let user = client.set_user_active(&id, true).await?;
            ctx.out()
                .emit(&user, || println!("{} can sign in", user.name))?;
        }
        UserCommands::Deactivate { id } => {
            let user = client.set_user_active(&id, false).await?;
            ctx.out()
                .emit(&user, || println!("{} is blocked", user.name))?;
        }
        UserCommands::Delete { id } => {
            client.delete_user(&id).await?;
            ctx.out().done(&format!("Deleted account {id}"));
        }
        UserCommands::Agents { action } => handle_agents(ctx, action).await?,
    }
    Ok(())
}

async fn handle_agents(ctx: &Context, action: AgentCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        AgentCommands::List => {
            let agents = client.list_agents().await?;
            ctx.out().emit(&agents, || print_users(&agents))?;
        }
        AgentCommands::Show { id } => {
            let agent = client.get_agent(&id).await?;
            ctx.out().emit(&agent, || print_user(&agent))?;
        }
        AgentCommands::Create {
            name,
            username,
            password,
        } => {
            let agent = NewAgent {
                name: name.trim().to_string(),
                username: username.trim().to_string(),
                password,
            };
            let created = client.create_agent(&agent).await?;
            ctx.out()
                .emit(&created, || println!("Created agent {} ({})", created.name, created.id))?;
        }
        AgentCommands::Update { id, changes } => {
            let agent = client.update_agent(&id, &StaffUpdate::from(changes)).await?;
            ctx.out()
                .emit(&agent, || println!("Updated {}", agent.name))?;
        }
        AgentCommands::Delete { id } => {
            client.delete_agent(&id).await?;
            ctx.out().done(&format!("Deleted agent {id}"));
        }
    }
    Ok(())
}

fn current_month() -> (i32, u32) {
    let now = Utc::now();
    (now.year(), now.month())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_minutes(minutes: f64) -> u64 {
    minutes.round().max(0.0) as u64
}

const fn source(legacy: bool) -> AttendanceSource {
    if legacy {
        AttendanceSource::LegacyAgents
    } else {
        AttendanceSource::Users
    }
}

/// Run an `attendance` subcommand
///
/// # Errors
///
/// Returns the request error.
pub async fn handle_attendance(ctx: &Context, action: AttendanceCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        AttendanceCommands::Overview {
            month,
            role,
            status,
            legacy,
            agent,
        } => {
            let (year, month) = month.unwrap_or_else(current_month);
            let query = AttendanceQuery {
                agent_id: agent,
                role,
                status,
                ..AttendanceQuery::month(year, month)
            };
            let report = client.attendance_overview(source(legacy), &query).await?;
            ctx.out().emit(&report, || {
                if let Some(stats) = &report.statistics {
                    println!(
                        "{year}-{month:02}: {} records, {} people, {} present, {} half days, average {}\n",
                        stats.total_records,
                        stats.unique_users,
                        stats.present_count,
                        stats.half_day_count,
                        format_minutes(whole_minutes(stats.average_duration))
                    );
                }
                print_attendance(&report.attendance, true);
            })?;
        }
        AttendanceCommands::Person { id, month, legacy } => {
            let (year, month) = month.unwrap_or_else(current_month);
            let query = AttendanceQuery::month(year, month);
            let report = client.attendance_for(source(legacy), &id, &query).await?;
            ctx.out().emit(&report, || {
                if let Some(stats) = &report.statistics {
                    println!(
                        "{year}-{month:02}: {} days, {} present, {} half days, {:.1} hours\n",
                        stats.total_days, stats.present_days, stats.half_days, stats.total_hours
                    );
                }
                print_attendance(&report.attendance, false);
            })?;
        }
    }
    Ok(())
}

fn print_users(users: &[StaffUser]) {
    let mut table = Table::new(&["ID", "NAME", "USERNAME", "ROLE", "ACTIVE", "PHONE"]);
    for user in users {
        table.row([
            user.id.clone(),
            user.name.clone(),
            user.username.clone(),
            user.role.map_or_else(|| "agent".to_string(), |r| r.to_string()),
            yes_no(user.is_active).to_string(),
            or_dash(user.mobile_number.as_deref()),
        ]);
    }
    table.print_or("No accounts found");
}

fn print_user(user: &StaffUser) {
    let mut table = Table::new(&["FIELD", "VALUE"]);
    table
        .row(["ID", user.id.as_str()])
        .row(["Name", user.name.as_str()])
        .row(["Username", user.username.as_str()])
        .row([
            "Role".to_string(),
            user.role.map_or_else(|| "agent".to_string(), |r| r.to_string()),
        ])
        .row(["Active", yes_no(user.is_active)])
        .row(["Email".to_string(), or_dash(user.email.as_deref())])
        .row(["Phone".to_string(), or_dash(user.mobile_number.as_deref())])
        .row(["Birth date".to_string(), or_dash(user.dob.as_deref())])
        .row(["Agent type".to_string(), or_dash(user.agent_type.as_deref())])
        .row(["Created".to_string(), date(user.created_at)]);
    println!("{}", table.render());
}

fn print_attendance(records: &[AttendanceRecord], with_name: bool) {
    let mut table = Table::new(&["DATE", "NAME", "IN", "OUT", "WORKED", "STATUS", "WHERE"]);
    for record in records {
        let name = if with_name {
            record
                .user_id
                .as_ref()
                .map_or_else(|| record.user_name.clone(), |u| u.name.clone())
        } else {
            String::new()
        };
        let place = record
            .location
            .as_ref()
            .and_then(|l| l.check_in_location.as_ref())
            .map_or_else(|| "-".to_string(), |p| p.describe());
        table.row([
            date(record.date),
            name,
            timestamp(record.check_in),
            timestamp(record.check_out),
            record.duration_label(),
            record.status.clone(),
            place,
        ]);
    }
    table.print_or("No attendance recorded");
}
