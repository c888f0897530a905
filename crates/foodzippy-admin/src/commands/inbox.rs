//! `notifications` and `watch` subcommands

use super::Context;
use crate::output::Table;
use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use foodzippy_client::{BadgePoller, Inbox};
use foodzippy_core::notification::{BadgeCounts, badge_label, relative_time};
use foodzippy_core::Notification;
use serde_json::json;
use std::time::Duration;
use tokio::signal;
use tracing::info;

/// Vendor update notifications
#[derive(Subcommand)]
pub enum NotificationCommands {
    /// Latest notifications
    List {
        /// Only unread ones
        #[arg(short, long)]
        unread: bool,
    },

    /// Unread count
    Count,

    /// Mark a notification read and show where it leads
    Open {
        /// Notification id
        id: String,
    },

    /// Mark every notification read
    ReadAll,

    /// Delete a notification
    Delete {
        /// Notification id
        id: String,
    },

    /// Delete every read notification
    ClearRead,
}

/// Run a `notifications` subcommand
///
/// # Errors
///
/// Returns the request error.
pub async fn handle(ctx: &Context, action: NotificationCommands) -> Result<()> {
    let mut inbox = Inbox::new(
        ctx.client().clone(),
        ctx.config().polling.notification_page_size,
    );
    match action {
        NotificationCommands::List { unread } => {
            inbox.refresh().await?;
            let shown: Vec<&Notification> = inbox
                .notifications()
                .iter()
                .filter(|n| !unread || !n.is_read)
                .collect();
            ctx.out().emit(&shown, || {
                print_notifications(&shown);
                println!("\n{} unread", inbox.unread());
            })?;
        }
        NotificationCommands::Count => {
            let count = inbox.refresh_count().await?;
            ctx.out()
                .emit(&json!({ "count": count }), || println!("{count} unread"))?;
        }
        NotificationCommands::Open { id } => {
            inbox.refresh().await?;
            let target = inbox.open(&id).await?;
            let report = json!({
                "unread": inbox.unread(),
                "vendorId": target.as_ref().map(|t| t.vendor_id()),
                "path": target.as_ref().map(foodzippy_core::NavigationTarget::path),
            });
            ctx.out().emit(&report, || match &target {
                Some(target) => println!(
                    "Opens {}; run `vendors show {}`",
                    target.path(),
                    target.vendor_id()
                ),
                None => println!("Notification has no vendor attached"),
            })?;
        }
        NotificationCommands::ReadAll => {
            let modified = inbox.mark_all_read().await?;
            ctx.out()
                .done(&format!("Marked {modified} notifications as read"));
        }
        NotificationCommands::Delete { id } => {
            inbox.delete(&id).await?;
            ctx.out().done(&format!("Deleted notification {id}"));
        }
        NotificationCommands::ClearRead => {
            let deleted = inbox.clear_read().await?;
            ctx.out()
                .done(&format!("Deleted {deleted} read notifications"));
        }
    }
    Ok(())
}

fn print_notifications(notifications: &[&Notification]) {
    let now = Utc::now();
    let mut table = Table::new(&["ID", "", "WHEN", "VENDOR", "BY", "TITLE"]);
    for notification in notifications {
        table.row([
            notification.id.clone(),
            if notification.is_read { " " } else { "*" }.to_string(),
            notification
                .created_at
                .map_or_else(|| "-".to_string(), |at| relative_time(at, now)),
            notification.vendor_details.restaurant_name.clone(),
            notification.updated_by.user_name.clone(),
            notification.title.clone(),
        ]);
    }
    table.print_or("No notifications");
}

/// Poll the unread counters until interrupted
///
/// # Errors
///
/// Returns an error if a JSON line cannot be written.
pub async fn watch(ctx: &Context, interval: Option<u64>) -> Result<()> {
    let period = interval.map_or_else(|| ctx.config().polling.interval(), Duration::from_secs);
    let poller = BadgePoller::spawn_every(ctx.client().clone(), period);
    let mut updates = poller.subscribe();
    info!(interval_secs = period.as_secs(), "Watching unread counters, press Ctrl+C to stop");

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let counts = *updates.borrow_and_update();
                print_counts(ctx, counts)?;
            }
        }
    }
    Ok(())
}

fn print_counts(ctx: &Context, counts: BadgeCounts) -> Result<()> {
    if ctx.out().is_json() {
        println!("{}", serde_json::to_string(&counts)?);
        return Ok(());
    }
    let badge = |count| badge_label(count).unwrap_or_else(|| "0".to_string());
    println!(
        "{}  notifications {}  edit requests {}  vendor requests {}",
        Utc::now().format("%H:%M:%S"),
        badge(counts.notifications),
        badge(counts.edit_requests),
        badge(counts.vendor_requests)
    );
    Ok(())
}
