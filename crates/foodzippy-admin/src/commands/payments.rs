//! `payments` subcommands

use super::{Context, parse_month};
use crate::output::{Table, date, or_dash};
use anyhow::{Result, bail};
use clap::Subcommand;
use foodzippy_client::PaymentLedger;
use foodzippy_core::payment::{
    CategoryRates, MarkPaidRequest, Payment, PaymentQuery, PaymentUpdate, SettlementStatus,
    estimate_payment,
};
use foodzippy_core::utils::format_rupees;
use foodzippy_core::{PaymentCategory, PaymentConfig, VisitStatus};
use serde_json::json;

/// Field agent payments
#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Show the rate table
    Config,

    /// Change the rates of one category; unset rates keep their value
    SetRates {
        /// Category (A to D)
        category: PaymentCategory,

        /// Paid for a first visit
        #[arg(long)]
        visit: Option<f64>,

        /// Paid for a follow-up visit
        #[arg(long)]
        followup: Option<f64>,

        /// Paid for an onboarding
        #[arg(long)]
        onboarding: Option<f64>,
    },

    /// What a visit outcome pays under the current rates
    Estimate {
        /// Category (A to D)
        category: PaymentCategory,

        /// Visit status, e.g. visited-onboarded
        visit_status: VisitStatus,
    },

    /// List payment records
    List {
        /// Settlement state (pending, paid)
        #[arg(short, long)]
        status: Option<SettlementStatus>,

        /// Only this agent
        #[arg(long, value_name = "AGENT_ID")]
        agent: Option<String>,

        /// Only this category
        #[arg(short, long)]
        category: Option<PaymentCategory>,

        /// Only this month, as YYYY-MM
        #[arg(short, long, value_parser = parse_month)]
        month: Option<(i32, u32)>,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(short, long, default_value = "50")]
        limit: u32,
    },

    /// Totals per agent
    ByAgent {
        /// Settlement state (pending, paid)
        #[arg(short, long)]
        status: Option<SettlementStatus>,

        /// Only this month, as YYYY-MM
        #[arg(short, long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },

    /// One agent's payments and statistics
    Agent {
        /// Agent id
        agent_id: String,
    },

    /// Settle payments
    MarkPaid {
        /// Settle every pending payment of this agent
        #[arg(long, value_name = "AGENT_ID", conflicts_with = "ids")]
        agent: Option<String>,

        /// Payment ids to settle
        #[arg(required_unless_present = "agent")]
        ids: Vec<String>,
    },

    /// Correct a payment record
    Update {
        /// Payment id
        id: String,

        /// New amount
        #[arg(long)]
        amount: Option<f64>,

        /// New category
        #[arg(long)]
        category: Option<PaymentCategory>,

        /// New settlement state
        #[arg(long)]
        status: Option<SettlementStatus>,
    },

    /// Delete a payment record
    Delete {
        /// Payment id
        id: String,
    },
}

/// Run a `payments` subcommand
///
/// # Errors
///
/// Returns a validation error for incomplete input, or the request error.
pub async fn handle(ctx: &Context, action: PaymentCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        PaymentCommands::Config => {
            let config = client.payment_config().await?;
            ctx.out().emit(&config, || print_rates(&config))?;
        }
        PaymentCommands::SetRates {
            category,
            visit,
            followup,
            onboarding,
        } => {
            if visit.is_none() && followup.is_none() && onboarding.is_none() {
                bail!("Give at least one of --visit, --followup or --onboarding");
            }
            let mut config = client.payment_config().await?;
            let current = config.rates_for(category).unwrap_or_default();
            let rates = CategoryRates {
                visit: visit.unwrap_or(current.visit),
                followup: followup.unwrap_or(current.followup),
                onboarding: onboarding.unwrap_or(current.onboarding),
            };
            if [rates.visit, rates.followup, rates.onboarding]
                .iter()
                .any(|rate| !rate.is_finite() || *rate < 0.0)
            {
                bail!("Rates must be zero or more");
            }
            config.set_rates(category, rates);
            let saved = client.update_payment_config(&config.to_update()).await?;
            ctx.out().emit(&saved, || print_rates(&saved))?;
        }
        PaymentCommands::Estimate {
            category,
            visit_status,
        } => {
            let config = client.payment_config().await?;
            let estimate = estimate_payment(&config, category, visit_status);
            let report = estimate.as_ref().map(|e| {
                json!({ "paymentType": e.payment_type, "amount": e.amount })
            });
            ctx.out().emit(&report, || match estimate {
                Some(estimate) => println!("{estimate}"),
                None => println!("No payment for {}", visit_status.label()),
            })?;
        }
        PaymentCommands::List {
            status,
            agent,
            category,
            month,
            page,
            limit,
        } => {
            let mut query = PaymentQuery {
                status,
                agent_id: agent,
                category,
                page: Some(page),
                limit: Some(limit),
                ..PaymentQuery::default()
            };
            if let Some((year, month)) = month {
                query = query.for_month(year, month)?;
            }
            let list = client.list_payments(&query).await?;
            ctx.out().emit(&list, || {
                print_payments(&list.payments);
                let stats = &list.stats;
                println!(
                    "\nPending {} ({})  paid {} ({})",
                    format_rupees(stats.pending),
                    stats.pending_count,
                    format_rupees(stats.paid),
                    stats.paid_count
                );
            })?;
        }
        PaymentCommands::ByAgent { status, month } => {
            let mut query = PaymentQuery {
                status,
                ..PaymentQuery::default()
            };
            if let Some((year, month)) = month {
                query = query.for_month(year, month)?;
            }
            let agents = client.payments_by_agent(&query).await?;
            ctx.out().emit(&agents, || {
                let mut table =
                    Table::new(&["AGENT", "NAME", "VENDORS", "TOTAL", "PENDING", "PAID"]);
                for agent in &agents {
                    table.row([
                        agent.agent_id.clone(),
                        agent.agent_name.clone(),
                        agent.vendor_count.to_string(),
                        format_rupees(agent.total_amount),
                        format_rupees(agent.pending_amount),
                        format_rupees(agent.paid_amount),
                    ]);
                }
                table.print_or("No payments recorded");
            })?;
        }
        PaymentCommands::Agent { agent_id } => {
            let ledger = PaymentLedger::load(client.clone(), &agent_id).await?;
            print_ledger(ctx, &ledger)?;
        }
        PaymentCommands::MarkPaid { agent, ids } => {
            let modified = if let Some(agent_id) = agent {
                let mut ledger = PaymentLedger::load(client.clone(), &agent_id).await?;
                let modified = ledger.mark_all_paid().await?;
                if !ctx.out().is_json() {
                    println!(
                        "{} now has {} pending",
                        ledger.details().agent.name,
                        format_rupees(ledger.pending_total())
                    );
                }
                modified
            } else {
                client
                    .mark_payments_paid(&MarkPaidRequest::for_payments(ids))
                    .await?
            };
            ctx.out()
                .done(&format!("Marked {modified} payments as paid"));
        }
        PaymentCommands::Update {
            id,
            amount,
            category,
            status,
        } => {
            let update = PaymentUpdate {
                category,
                payment_type: None,
                amount,
                payment_status: status,
            };
            let payment = client.update_payment(&id, &update).await?;
            ctx.out()
                .emit(&payment, || print_payments(std::slice::from_ref(&payment)))?;
        }
        PaymentCommands::Delete { id } => {
            client.delete_payment(&id).await?;
            ctx.out().done(&format!("Deleted payment {id}"));
        }
    }
    Ok(())
}

fn print_rates(config: &PaymentConfig) {
    let mut table = Table::new(&["CATEGORY", "VISIT", "FOLLOW-UP", "ONBOARDING"]);
    for category in PaymentCategory::ALL {
        match config.rates_for(category) {
            Some(rates) => table.row([
                category.to_string(),
                format_rupees(rates.visit),
                format_rupees(rates.followup),
                format_rupees(rates.onboarding),
            ]),
            None => table.row([category.to_string(), "-".into(), "-".into(), "-".into()]),
        };
    }
    println!("{}", table.render());
    if let Some(by) = &config.updated_by {
        println!("\nLast changed by {by} on {}", date(config.updated_at));
    }
}

fn print_payments(payments: &[Payment]) {
    let mut table = Table::new(&[
        "ID", "AGENT", "VENDOR", "CAT", "TYPE", "AMOUNT", "STATUS", "CREATED",
    ]);
    for payment in payments {
        table.row([
            payment.id.clone(),
            or_dash(payment.agent_name.as_deref()),
            or_dash(payment.vendor_name.as_deref()),
            payment
                .category
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
            payment.payment_type.to_string(),
            format_rupees(payment.amount),
            match payment.payment_status {
                SettlementStatus::Pending => "pending".to_string(),
                SettlementStatus::Paid => format!("paid {}", date(payment.paid_date)),
            },
            date(payment.created_at),
        ]);
    }
    table.print_or("No payments found");
}

fn print_ledger(ctx: &Context, ledger: &PaymentLedger) -> Result<()> {
    let details = ledger.details();
    ctx.out().emit(details, || {
        let stats = &details.stats;
        println!("{} ({})", details.agent.name, details.agent.id);
        println!(
            "Total {}  pending {} in {} payments  paid {}",
            format_rupees(stats.total),
            format_rupees(ledger.pending_total()),
            ledger.pending_count(),
            format_rupees(stats.paid)
        );
        let counts = &stats.vendor_counts;
        println!(
            "Vendors {}: visited {}, onboarded {}, rejected {}, follow-up {}\n",
            stats.total_vendors, counts.visited, counts.onboarded, counts.rejected, counts.followup
        );
        print_payments(&details.payments);
    })
}
