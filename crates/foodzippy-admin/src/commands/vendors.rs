//! `vendors` and `edit-requests` subcommands

use super::Context;
use crate::output::{Table, date, or_dash};
use anyhow::Result;
use clap::Subcommand;
use foodzippy_client::vendor_review::{record_payment_status, review_vendor};
use foodzippy_core::payment::PaymentStatusSelection;
use foodzippy_core::utils::format_rupees;
use foodzippy_core::vendor::{
    AgentVendorQuery, ListingChange, ListingType, ReviewAction, VendorPage, VendorQuery,
};
use foodzippy_core::{PaymentCategory, Vendor, VendorStatus, VisitStatus};
use serde_json::json;
use tracing::info;

/// Vendor registrations
#[derive(Subcommand)]
pub enum VendorCommands {
    /// List vendors
    List {
        /// Review status (pending, publish, reject)
        #[arg(short, long)]
        status: Option<VendorStatus>,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// Free-text search on name and phone
        #[arg(long)]
        search: Option<String>,

        /// Only vendors registered by this agent
        #[arg(long, value_name = "AGENT_ID")]
        agent: Option<String>,

        /// Creation window for --agent, e.g. today or week
        #[arg(long, requires = "agent")]
        date_filter: Option<String>,

        /// Follow-up window for --agent
        #[arg(long, requires = "agent")]
        follow_up_filter: Option<String>,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Show one vendor
    Show {
        /// Vendor id
        id: String,
    },

    /// Publish a pending vendor
    Approve {
        /// Vendor id
        id: String,
    },

    /// Reject a pending vendor
    Reject {
        /// Vendor id
        id: String,
    },

    /// Record a visit outcome and its payment
    PaymentStatus {
        /// Vendor id
        id: String,

        /// Payment category (A to D); defaults to the vendor's
        #[arg(short, long)]
        category: Option<PaymentCategory>,

        /// Visit status, e.g. visited-onboarded
        #[arg(short, long)]
        visit_status: Option<VisitStatus>,

        /// Follow-up date (YYYY-MM-DD)
        #[arg(long)]
        follow_up_date: Option<String>,

        /// Second follow-up date (YYYY-MM-DD)
        #[arg(long)]
        second_follow_up_date: Option<String>,

        /// Remarks
        #[arg(long)]
        remarks: Option<String>,
    },

    /// Listing tiers and charges
    Listing {
        /// Listing subcommand
        #[command(subcommand)]
        action: ListingCommands,
    },

    /// Monthly registrations and status totals
    Analytics,

    /// Unseen registrations
    Unread,

    /// Mark every registration as seen
    MarkSeen,
}

/// Listing tier management
#[derive(Subcommand)]
pub enum ListingCommands {
    /// Vendors on each tier
    Counts,

    /// Vendors on one tier
    List {
        /// Tier (launching, vip, normal)
        tier: ListingType,

        /// Maximum number of vendors
        #[arg(short, long, default_value = "50")]
        limit: u32,
    },

    /// Move a vendor to a tier
    Set {
        /// Vendor id
        id: String,

        /// Tier (launching, vip, normal)
        #[arg(short, long)]
        tier: ListingType,

        /// Listing charge in rupees; launching is always free
        #[arg(long, default_value = "0")]
        charge: f64,
    },
}

/// Vendor edit requests
#[derive(Subcommand)]
pub enum EditRequestCommands {
    /// Vendors with an open edit request
    List,

    /// Allow the requested edit
    Approve {
        /// Vendor id
        vendor_id: String,

        /// Optional note for the agent
        #[arg(short, long)]
        remark: Option<String>,
    },

    /// Refuse the requested edit
    Reject {
        /// Vendor id
        vendor_id: String,

        /// Reason shown to the agent
        #[arg(short, long)]
        remark: String,
    },

    /// Unseen edit requests
    Unread,

    /// Mark every edit request as seen
    MarkSeen,
}

/// Run a `vendors` subcommand
///
/// # Errors
///
/// Returns the request error, or a validation error for a review the
/// vendor does not allow.
pub async fn handle(ctx: &Context, action: VendorCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        VendorCommands::List {
            status,
            city,
            search,
            agent,
            date_filter,
            follow_up_filter,
            page,
            limit,
        } => {
            let result = if let Some(agent_id) = agent {
                let query = AgentVendorQuery {
                    status,
                    date_filter,
                    follow_up_filter,
                    include_stats: true,
                    limit: Some(limit),
                };
                client.list_agent_vendors(&agent_id, &query).await?
            } else {
                let query = VendorQuery {
                    page: Some(page),
                    limit: Some(limit),
                    status,
                    city,
                    search,
                };
                client.list_vendors(&query).await?
            };
            ctx.out().emit(&result, || print_vendor_page(&result))?;
        }
        VendorCommands::Show { id } => {
            let vendor = client.get_vendor(&id).await?;
            ctx.out().emit(&vendor, || print_vendor(&vendor))?;
        }
        VendorCommands::Approve { id } => {
            review(ctx, &id, ReviewAction::Approve).await?;
        }
        VendorCommands::Reject { id } => {
            review(ctx, &id, ReviewAction::Reject).await?;
        }
        VendorCommands::PaymentStatus {
            id,
            category,
            visit_status,
            follow_up_date,
            second_follow_up_date,
            remarks,
        } => {
            let mut vendor = client.get_vendor(&id).await?;
            let mut selection = PaymentStatusSelection::from_vendor(&vendor);
            selection.category = category.or(selection.category);
            selection.visit_status = visit_status.or(selection.visit_status);
            selection.follow_up_date = follow_up_date;
            selection.second_follow_up_date = second_follow_up_date;
            selection.remarks = remarks;

            let config = client.payment_config().await?;
            if let Some(estimate) = selection.estimate(&config) {
                info!(vendor_id = %id, %estimate, "Expected payment");
            }

            let outcome = record_payment_status(client, &mut vendor, selection).await?;
            ctx.out().emit(&outcome, || println!("{}", outcome.summary()))?;
        }
        VendorCommands::Listing { action } => listing(ctx, action).await?,
        VendorCommands::Analytics => {
            let analytics = client.vendor_analytics().await?;
            ctx.out().emit(&analytics, || {
                let summary = analytics.summary;
                println!(
                    "Total {}  pending {}  approved {}  rejected {}\n",
                    summary.total, summary.pending, summary.approved, summary.rejected
                );
                let mut table = Table::new(&["MONTH", "REQUESTS"]);
                for month in &analytics.monthly_requests {
                    table.row([
                        format!("{}-{:02}", month.year, month.month),
                        month.count.to_string(),
                    ]);
                }
                table.print_or("No registrations yet");
            })?;
        }
        VendorCommands::Unread => {
            let count = client.unread_vendor_requests().await?;
            ctx.out()
                .emit(&json!({ "count": count }), || println!("{count} unseen registrations"))?;
        }
        VendorCommands::MarkSeen => {
            let modified = client.mark_vendor_requests_seen().await?;
            ctx.out()
                .done(&format!("Marked {modified} registrations as seen"));
        }
    }
    Ok(())
}

async fn review(ctx: &Context, id: &str, action: ReviewAction) -> Result<()> {
    let mut vendor = ctx.client().get_vendor(id).await?;
    review_vendor(ctx.client(), &mut vendor, action).await?;
    ctx.out().emit(&vendor, || {
        println!(
            "{} is now {}",
            vendor.restaurant_name, vendor.restaurant_status
        );
    })
}

async fn listing(ctx: &Context, action: ListingCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        ListingCommands::Counts => {
            let counts = client.listing_counts().await?;
            let report: serde_json::Map<String, serde_json::Value> = counts
                .iter()
                .map(|(tier, total)| (tier.to_string(), json!(total)))
                .collect();
            ctx.out().emit(&report, || {
                let mut table = Table::new(&["TIER", "VENDORS"]);
                for (tier, total) in &counts {
                    table.row([tier.to_string(), total.to_string()]);
                }
                println!("{}", table.render());
            })?;
        }
        ListingCommands::List { tier, limit } => {
            let page = client.vendors_by_listing(tier, limit).await?;
            ctx.out().emit(&page, || {
                let mut table = Table::new(&["ID", "NAME", "CITY", "CHARGE"]);
                for vendor in &page.vendors {
                    table.row([
                        vendor.id.clone(),
                        vendor.restaurant_name.clone(),
                        or_dash(vendor.city.as_deref()),
                        format_rupees(vendor.listing_charge.unwrap_or_default()),
                    ]);
                }
                table.print_or(&format!("No vendors on the {tier} tier"));
            })?;
        }
        ListingCommands::Set { id, tier, charge } => {
            let change = ListingChange::new(tier, charge);
            client.update_listing(&id, change).await?;
            ctx.out().done(&format!(
                "Vendor {id} listed as {} at {}",
                change.listing_type,
                format_rupees(change.listing_charge)
            ));
        }
    }
    Ok(())
}

/// Run an `edit-requests` subcommand
///
/// # Errors
///
/// Returns the request error, or a validation error for a rejection
/// without remark.
pub async fn handle_edit_requests(ctx: &Context, action: EditRequestCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        EditRequestCommands::List => {
            let requests = client.pending_edit_requests().await?;
            ctx.out().emit(&requests, || {
                let mut table = Table::new(&["VENDOR", "NAME", "CITY", "AGENT", "REQUESTED"]);
                for request in &requests {
                    table.row([
                        request.vendor_id.clone(),
                        request.restaurant_name.clone(),
                        or_dash(request.city.as_deref()),
                        or_dash(request.created_by_name.as_deref()),
                        date(request.edit_request_date),
                    ]);
                }
                table.print_or("No pending edit requests");
            })?;
        }
        EditRequestCommands::Approve { vendor_id, remark } => {
            client
                .review_edit_request(&vendor_id, ReviewAction::Approve, remark.as_deref())
                .await?;
            ctx.out().done("Edit request approved");
        }
        EditRequestCommands::Reject { vendor_id, remark } => {
            client
                .review_edit_request(&vendor_id, ReviewAction::Reject, Some(&remark))
                .await?;
            ctx.out().done("Edit request rejected");
        }
        EditRequestCommands::Unread => {
            let count = client.unread_edit_requests().await?;
            ctx.out()
                .emit(&json!({ "count": count }), || println!("{count} unseen edit requests"))?;
        }
        EditRequestCommands::MarkSeen => {
            let modified = client.mark_edit_requests_seen().await?;
            ctx.out()
                .done(&format!("Marked {modified} edit requests as seen"));
        }
    }
    Ok(())
}

fn print_vendor_page(page: &VendorPage) {
    let mut table = Table::new(&["ID", "NAME", "STATUS", "TYPE", "CITY", "AGENT", "CREATED"]);
    for vendor in &page.vendors {
        table.row([
            vendor.id.clone(),
            vendor.restaurant_name.clone(),
            vendor.restaurant_status.to_string(),
            vendor.vendor_type_label(),
            or_dash(vendor.city.as_deref()),
            or_dash(vendor.created_by_name.as_deref()),
            date(vendor.created_at),
        ]);
    }
    table.print_or("No vendors found");
    let pagination = &page.pagination;
    println!(
        "\nPage {} of {}, {} vendors",
        pagination.page,
        pagination.pages.max(1),
        pagination.total
    );
}

fn print_vendor(vendor: &Vendor) {
    let mut table = Table::new(&["FIELD", "VALUE"]);
    table
        .row(["ID", vendor.id.as_str()])
        .row(["Name", vendor.restaurant_name.as_str()])
        .row(["Status".to_string(), vendor.restaurant_status.to_string()])
        .row(["Type".to_string(), vendor.vendor_type_label()])
        .row(["City".to_string(), or_dash(vendor.city.as_deref())])
        .row(["Phone".to_string(), or_dash(vendor.mobile_number.as_deref())])
        .row(["Agent".to_string(), or_dash(vendor.created_by_name.as_deref())])
        .row([
            "Category".to_string(),
            vendor
                .payment_category
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
        ])
        .row([
            "Visit status".to_string(),
            vendor.effective_visit_status().label(),
        ])
        .row(["Follow-up".to_string(), date(vendor.follow_up_date)])
        .row([
            "Paid / due".to_string(),
            format!(
                "{} / {}",
                format_rupees(vendor.total_payment_paid.unwrap_or_default()),
                format_rupees(vendor.total_payment_due.unwrap_or_default())
            ),
        ])
        .row([
            "Listing".to_string(),
            vendor
                .listing_type
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
        ])
        .row(["Created".to_string(), date(vendor.created_at)]);
    println!("{}", table.render());

    let actions = vendor.review_actions();
    if !actions.is_empty() {
        println!("\nAwaiting review: run `vendors approve {0}` or `vendors reject {0}`", vendor.id);
    }
}
