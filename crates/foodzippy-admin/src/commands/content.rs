//! `partners`, `careers`, `franchise`, `emails` and `subscribers` subcommands

use super::Context;
use crate::output::{Table, date, timestamp};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use foodzippy_client::partner_approval::{approve_partner, prepare_approval, submit_approval};
use foodzippy_core::content::{
    CareerStatus, CareerTally, DraftContent, DraftSend, FranchiseStatus, FranchiseTally,
    PartnerApproval, PartnerQuery, PartnerStatus, ReviewUpdate, SubscriberQuery,
    SubscriberStatus, TemplateDraft,
};
use foodzippy_core::types::StatusCounts;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name used for `{{appName}}` in partner emails
const APP_NAME: &str = "Foodzippy";

/// Delivery partner applications
#[derive(Subcommand)]
pub enum PartnerCommands {
    /// List applications
    List {
        /// Status (pending, approved, rejected)
        #[arg(short, long)]
        status: Option<PartnerStatus>,

        /// Free-text search
        #[arg(long)]
        search: Option<String>,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Totals per status
    Stats,

    /// Approve an application and email the login credentials
    Approve {
        /// Application id
        id: String,

        /// Login id to issue
        #[arg(long)]
        login_id: String,

        /// Password to issue
        #[arg(long)]
        password: String,

        /// Print the email before sending it
        #[arg(long)]
        preview: bool,
    },

    /// Reject an application
    Reject {
        /// Application id
        id: String,

        /// Reason given to the applicant
        #[arg(short, long, default_value = "")]
        reason: String,
    },

    /// Delete an application
    Delete {
        /// Application id
        id: String,
    },
}

/// Filters shared by the careers and franchise listings
#[derive(Args)]
pub struct LeadFilter {
    /// Only this status
    #[arg(short, long)]
    status: Option<String>,

    /// Case-insensitive search on name, email, phone and more
    #[arg(long)]
    search: Option<String>,
}

/// Job applications
#[derive(Subcommand)]
pub enum CareerCommands {
    /// List applications with a tally per stage
    List {
        #[command(flatten)]
        filter: LeadFilter,
    },

    /// Move an application to another stage
    Update {
        /// Application id
        id: String,

        /// New status (pending, reviewing, shortlisted, rejected, hired)
        #[arg(short, long)]
        status: CareerStatus,

        /// Replace the notes; kept when omitted
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an application
    Delete {
        /// Application id
        id: String,
    },
}

/// Franchise inquiries
#[derive(Subcommand)]
pub enum FranchiseCommands {
    /// List inquiries with a tally per stage
    List {
        #[command(flatten)]
        filter: LeadFilter,
    },

    /// Move an inquiry to another stage
    Update {
        /// Inquiry id
        id: String,

        /// New status (pending, contacted, in-progress, approved, rejected)
        #[arg(short, long)]
        status: FranchiseStatus,

        /// Replace the notes; kept when omitted
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an inquiry
    Delete {
        /// Inquiry id
        id: String,
    },
}

/// Email templates and newsletter drafts
#[derive(Subcommand)]
pub enum EmailCommands {
    /// Transactional templates
    Templates {
        /// Template subcommand
        #[command(subcommand)]
        action: TemplateCommands,
    },

    /// Newsletter drafts
    Drafts {
        /// Draft subcommand
        #[command(subcommand)]
        action: DraftCommands,
    },
}

/// Message text given inline or read from a file
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct BodySource {
    /// Body text
    #[arg(long)]
    body: Option<String>,

    /// File holding the body
    #[arg(long, value_name = "FILE")]
    body_file: Option<PathBuf>,
}

impl BodySource {
    async fn read(self) -> Result<String> {
        match (self.body, self.body_file) {
            (Some(body), _) => Ok(body),
            (None, Some(path)) => read_body(&path).await,
            (None, None) => Ok(String::new()),
        }
    }
}

async fn read_body(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Email templates
#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List templates
    List,

    /// Show one template by name
    Show {
        /// Template name
        name: String,
    },

    /// Create a template
    Create {
        /// Lookup name
        #[arg(long)]
        name: String,

        /// Subject
        #[arg(long)]
        subject: String,

        #[command(flatten)]
        body: BodySource,

        /// Placeholder the body uses; repeat for several
        #[arg(long = "variable")]
        variables: Vec<String>,
    },

    /// Replace a template
    Update {
        /// Template id
        id: String,

        /// Lookup name
        #[arg(long)]
        name: String,

        /// Subject
        #[arg(long)]
        subject: String,

        #[command(flatten)]
        body: BodySource,

        /// Placeholder the body uses; repeat for several
        #[arg(long = "variable")]
        variables: Vec<String>,
    },

    /// Delete a template
    Delete {
        /// Template id
        id: String,
    },

    /// Install the default templates
    Seed,
}

/// Newsletter drafts
#[derive(Subcommand)]
pub enum DraftCommands {
    /// List drafts
    List,

    /// Create a draft
    Create {
        /// Subject
        #[arg(long)]
        subject: String,

        #[command(flatten)]
        body: BodySource,
    },

    /// Replace a draft
    Update {
        /// Draft id
        id: String,

        /// Subject
        #[arg(long)]
        subject: String,

        #[command(flatten)]
        body: BodySource,
    },

    /// Delete a draft
    Delete {
        /// Draft id
        id: String,
    },

    /// Send a draft to every active subscriber, or to the given ones
    Send {
        /// Draft id
        id: String,

        /// Subscriber id; repeat for several
        #[arg(long = "to", value_name = "SUBSCRIBER_ID")]
        recipients: Vec<String>,
    },
}

/// Newsletter subscribers
#[derive(Subcommand)]
pub enum SubscriberCommands {
    /// List subscribers
    List {
        /// Status (active, inactive)
        #[arg(short, long)]
        status: Option<SubscriberStatus>,

        /// Maximum number of subscribers
        #[arg(short, long, default_value = "200")]
        limit: u32,
    },

    /// Totals per status
    Stats,

    /// Resume mail to a subscriber
    Activate {
        /// Subscriber id
        id: String,
    },

    /// Stop mail to a subscriber
    Deactivate {
        /// Subscriber id
        id: String,
    },

    /// Delete a subscriber
    Delete {
        /// Subscriber id
        id: String,
    },

    /// Download every subscriber as CSV
    Export {
        /// Write here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Run a `partners` subcommand
///
/// # Errors
///
/// Returns a validation error for missing credentials, or the request
/// error once the retries are used up.
pub async fn handle_partners(ctx: &Context, action: PartnerCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        PartnerCommands::List {
            status,
            search,
            page,
            limit,
        } => {
            let query = PartnerQuery {
                page: Some(page),
                limit: Some(limit),
                status,
                search,
            };
            let partners = client.list_delivery_partners(&query).await?;
            ctx.out().emit(&partners, || {
                let mut table = Table::new(&["ID", "NAME", "PHONE", "EMAIL", "STATUS", "APPLIED"]);
                for partner in &partners.data {
                    table.row([
                        partner.id.clone(),
                        partner.full_name.clone(),
                        partner.phone.clone(),
                        partner.email.clone(),
                        partner.status.to_string(),
                        date(partner.created_at),
                    ]);
                }
                table.print_or("No applications found");
            })?;
        }
        PartnerCommands::Stats => {
            let stats = client.delivery_partner_stats().await?;
            ctx.out().emit(&stats, || print_status_counts(stats))?;
        }
        PartnerCommands::Approve {
            id,
            login_id,
            password,
            preview,
        } => {
            let retry = ctx.auth().retry();
            let result = if preview {
                PartnerApproval::new(&login_id, &password, None).check()?;
                let approval = prepare_approval(client, &login_id, &password).await;
                let name = partner_name(ctx, &id).await;
                if !ctx.out().is_json() {
                    println!(
                        "Subject: {}\n\n{}\n",
                        approval.email_subject,
                        approval.preview(&name, APP_NAME)
                    );
                }
                submit_approval(client, retry, &id, &approval).await?
            } else {
                approve_partner(client, retry, &id, &login_id, &password).await?
            };
            ctx.out().emit(&result, || println!("{}", result.summary()))?;
        }
        PartnerCommands::Reject { id, reason } => {
            client.reject_delivery_partner(&id, reason.trim()).await?;
            ctx.out().done("Application rejected");
        }
        PartnerCommands::Delete { id } => {
            client.delete_delivery_partner(&id).await?;
            ctx.out().done(&format!("Deleted application {id}"));
        }
    }
    Ok(())
}

async fn partner_name(ctx: &Context, id: &str) -> String {
    let query = PartnerQuery {
        limit: Some(100),
        ..PartnerQuery::default()
    };
    match ctx.client().list_delivery_partners(&query).await {
        Ok(page) => page
            .data
            .into_iter()
            .find(|p| p.id == id)
            .map_or_else(|| "Partner".to_string(), |p| p.full_name),
        Err(err) => {
            warn!(error = %err, "Could not look up the applicant's name");
            "Partner".to_string()
        }
    }
}

/// Run a `careers` subcommand
///
/// # Errors
///
/// Returns an error for an unknown status filter, or the request error.
pub async fn handle_careers(ctx: &Context, action: CareerCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        CareerCommands::List { filter } => {
            let status: Option<CareerStatus> = filter.status.as_deref().map(str::parse).transpose()?;
            let all = client.list_career_applications().await?;
            let tally = CareerTally::from_applications(&all);
            let shown: Vec<_> = all
                .into_iter()
                .filter(|a| status.is_none_or(|s| a.status == s))
                .filter(|a| filter.search.as_deref().is_none_or(|q| a.matches(q)))
                .collect();
            let report = serde_json::json!({ "applications": shown, "tally": tally });
            ctx.out().emit(&report, || {
                let mut table = Table::new(&["ID", "NAME", "POSITION", "CITY", "STATUS", "APPLIED"]);
                for app in &shown {
                    table.row([
                        app.id.clone(),
                        app.full_name.clone(),
                        app.position.clone(),
                        app.city.clone(),
                        app.status.to_string(),
                        date(app.created_at),
                    ]);
                }
                table.print_or("No applications found");
                println!(
                    "\n{} total: {} pending, {} reviewing, {} shortlisted, {} hired, {} rejected",
                    tally.total,
                    tally.pending,
                    tally.reviewing,
                    tally.shortlisted,
                    tally.hired,
                    tally.rejected
                );
            })?;
        }
        CareerCommands::Update { id, status, notes } => {
            let notes = match notes {
                Some(notes) => notes,
                None => client
                    .list_career_applications()
                    .await?
                    .into_iter()
                    .find(|a| a.id == id)
                    .map(|a| a.notes)
                    .unwrap_or_default(),
            };
            let updated = client
                .update_career_application(&id, &ReviewUpdate { status, notes })
                .await?;
            ctx.out().emit(&updated, || {
                println!("{} is now {}", updated.full_name, updated.status);
            })?;
        }
        CareerCommands::Delete { id } => {
            client.delete_career_application(&id).await?;
            ctx.out().done(&format!("Deleted application {id}"));
        }
    }
    Ok(())
}

/// Run a `franchise` subcommand
///
/// # Errors
///
/// Returns an error for an unknown status filter, or the request error.
pub async fn handle_franchise(ctx: &Context, action: FranchiseCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        FranchiseCommands::List { filter } => {
            let status: Option<FranchiseStatus> =
                filter.status.as_deref().map(str::parse).transpose()?;
            let all = client.list_franchise_inquiries().await?;
            let tally = FranchiseTally::from_inquiries(&all);
            let shown: Vec<_> = all
                .into_iter()
                .filter(|i| status.is_none_or(|s| i.status == s))
                .filter(|i| filter.search.as_deref().is_none_or(|q| i.matches(q)))
                .collect();
            let report = serde_json::json!({ "inquiries": shown, "tally": tally });
            ctx.out().emit(&report, || {
                let mut table = Table::new(&["ID", "NAME", "PHONE", "EMAIL", "STATUS", "RECEIVED"]);
                for inquiry in &shown {
                    table.row([
                        inquiry.id.clone(),
                        inquiry.name.clone(),
                        inquiry.phone.clone(),
                        inquiry.email.clone(),
                        inquiry.status.to_string(),
                        date(inquiry.created_at),
                    ]);
                }
                table.print_or("No inquiries found");
                println!(
                    "\n{} total: {} pending, {} contacted, {} in progress, {} approved, {} rejected",
                    tally.total,
                    tally.pending,
                    tally.contacted,
                    tally.in_progress,
                    tally.approved,
                    tally.rejected
                );
            })?;
        }
        FranchiseCommands::Update { id, status, notes } => {
            let notes = match notes {
                Some(notes) => notes,
                None => client
                    .list_franchise_inquiries()
                    .await?
                    .into_iter()
                    .find(|i| i.id == id)
                    .map(|i| i.notes)
                    .unwrap_or_default(),
            };
            let updated = client
                .update_franchise_inquiry(&id, &ReviewUpdate { status, notes })
                .await?;
            ctx.out().emit(&updated, || {
                println!("{} is now {}", updated.name, updated.status);
            })?;
        }
        FranchiseCommands::Delete { id } => {
            client.delete_franchise_inquiry(&id).await?;
            ctx.out().done(&format!("Deleted inquiry {id}"));
        }
    }
    Ok(())
}

/// Run an `emails` subcommand
///
/// # Errors
///
/// Returns a validation error for blank fields, an error if a body file
/// cannot be read, or the request error.
pub async fn handle_emails(ctx: &Context, action: EmailCommands) -> Result<()> {
    match action {
        EmailCommands::Templates { action } => handle_templates(ctx, action).await,
        EmailCommands::Drafts { action } => handle_drafts(ctx, action).await,
    }
}

async fn handle_templates(ctx: &Context, action: TemplateCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        TemplateCommands::List => {
            let templates = client.list_email_templates().await?;
            ctx.out().emit(&templates, || {
                let mut table = Table::new(&["ID", "NAME", "SUBJECT", "VARIABLES", "UPDATED"]);
                for template in &templates {
                    table.row([
                        template.id.clone(),
                        template.name.clone(),
                        template.subject.clone(),
                        template.variables.join(", "),
                        date(template.updated_at),
                    ]);
                }
                table.print_or("No templates, run `emails templates seed`");
            })?;
        }
        TemplateCommands::Show { name } => {
            let template = client
                .find_email_template(&name)
                .await?
                .with_context(|| format!("No template named '{name}'"))?;
            ctx.out().emit(&template, || {
                println!("Subject: {}\n\n{}", template.subject, template.body);
            })?;
        }
        TemplateCommands::Create {
            name,
            subject,
            body,
            variables,
        } => {
            let draft = TemplateDraft {
                name,
                subject,
                body: body.read().await?,
                variables,
            };
            let created = client.create_email_template(&draft).await?;
            ctx.out()
                .emit(&created, || println!("Created template {}", created.name))?;
        }
        TemplateCommands::Update {
            id,
            name,
            subject,
            body,
            variables,
        } => {
            let draft = TemplateDraft {
                name,
                subject,
                body: body.read().await?,
                variables,
            };
            let updated = client.update_email_template(&id, &draft).await?;
            ctx.out()
                .emit(&updated, || println!("Saved template {}", updated.name))?;
        }
        TemplateCommands::Delete { id } => {
            client.delete_email_template(&id).await?;
            ctx.out().done(&format!("Deleted template {id}"));
        }
        TemplateCommands::Seed => {
            let ack = client.seed_email_templates().await?;
            ctx.out().done(
                ack.message
                    .as_deref()
                    .unwrap_or("Default templates installed"),
            );
        }
    }
    Ok(())
}

async fn handle_drafts(ctx: &Context, action: DraftCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        DraftCommands::List => {
            let drafts = client.list_email_drafts().await?;
            ctx.out().emit(&drafts, || {
                let mut table = Table::new(&["ID", "SUBJECT", "RECIPIENTS", "LAST SENT", "UPDATED"]);
                for draft in &drafts {
                    table.row([
                        draft.id.clone(),
                        draft.subject.clone(),
                        draft.recipient_count.to_string(),
                        timestamp(draft.last_sent_at),
                        date(draft.updated_at),
                    ]);
                }
                table.print_or("No drafts");
            })?;
        }
        DraftCommands::Create { subject, body } => {
            let content = DraftContent {
                subject,
                body: body.read().await?,
            };
            let draft = client.create_email_draft(&content).await?;
            ctx.out()
                .emit(&draft, || println!("Created draft {}", draft.id))?;
        }
        DraftCommands::Update { id, subject, body } => {
            let content = DraftContent {
                subject,
                body: body.read().await?,
            };
            let draft = client.update_email_draft(&id, &content).await?;
            ctx.out()
                .emit(&draft, || println!("Saved draft {}", draft.id))?;
        }
        DraftCommands::Delete { id } => {
            client.delete_email_draft(&id).await?;
            ctx.out().done(&format!("Deleted draft {id}"));
        }
        DraftCommands::Send { id, recipients } => {
            let send = DraftSend {
                subscriber_ids: (!recipients.is_empty()).then_some(recipients),
            };
            let ack = client.send_email_draft(&id, &send).await?;
            ctx.out()
                .done(ack.message.as_deref().unwrap_or("Newsletter sent"));
        }
    }
    Ok(())
}

/// Run a `subscribers` subcommand
///
/// # Errors
///
/// Returns the request error, or an error if the export cannot be written.
pub async fn handle_subscribers(ctx: &Context, action: SubscriberCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        SubscriberCommands::List { status, limit } => {
            let query = SubscriberQuery {
                limit: Some(limit),
                status,
            };
            let subscribers = client.list_subscribers(&query).await?;
            ctx.out().emit(&subscribers, || {
                let mut table = Table::new(&["ID", "EMAIL", "STATUS", "SOURCE", "JOINED"]);
                for subscriber in &subscribers {
                    table.row([
                        subscriber.id.clone(),
                        subscriber.email.clone(),
                        subscriber.status.to_string(),
                        subscriber.source.clone(),
                        date(subscriber.created_at),
                    ]);
                }
                table.print_or("No subscribers");
            })?;
        }
        SubscriberCommands::Stats => {
            let stats = client.subscriber_stats().await?;
            ctx.out().emit(&stats, || {
                println!(
                    "{} subscribers: {} active, {} inactive",
                    stats.total, stats.active, stats.inactive
                );
            })?;
        }
        SubscriberCommands::Activate { id } => {
            client
                .set_subscriber_status(&id, SubscriberStatus::Active)
                .await?;
            ctx.out().done(&format!("Subscriber {id} is active"));
        }
        SubscriberCommands::Deactivate { id } => {
            client
                .set_subscriber_status(&id, SubscriberStatus::Inactive)
                .await?;
            ctx.out().done(&format!("Subscriber {id} is inactive"));
        }
        SubscriberCommands::Delete { id } => {
            client.delete_subscriber(&id).await?;
            ctx.out().done(&format!("Deleted subscriber {id}"));
        }
        SubscriberCommands::Export { output } => {
            let csv = client.export_subscribers().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, csv.as_bytes())
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    ctx.out()
                        .done(&format!("Exported subscribers to {}", path.display()));
                }
                None => print!("{csv}"),
            }
        }
    }
    Ok(())
}

fn print_status_counts(counts: StatusCounts) {
    println!(
        "{} total: {} pending, {} approved, {} rejected",
        counts.total, counts.pending, counts.approved, counts.rejected
    );
}
