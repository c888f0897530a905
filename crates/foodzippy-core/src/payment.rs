//! Field-agent payment model and the vendor visit-status workflow
//!
//! The backend owns payment computation. This module mirrors its vocabulary
//! (categories, visit statuses, payment types) and derives the estimate shown
//! to an operator before a status change is submitted, using the rates the
//! server reports in its [`PaymentConfig`].

use crate::types::{EntityId, Pagination};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Vendor payment category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaymentCategory {
    /// Category A
    A,
    /// Category B
    B,
    /// Category C
    C,
    /// Category D
    D,
}

impl PaymentCategory {
    /// Every category in display order
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                crate::Error::validation("paymentCategory", format!("unknown category '{s}'"))
            })
    }
}

/// Stage of the vendor visit lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VisitStage {
    /// Not visited yet
    #[serde(rename = "pending")]
    Pending,
    /// First visit done
    #[serde(rename = "visited")]
    Visited,
    /// Follow-up visit
    #[serde(rename = "followup")]
    FollowUp,
    /// Second follow-up visit
    #[serde(rename = "2nd-followup")]
    SecondFollowUp,
}

impl VisitStage {
    /// Every stage in lifecycle order
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Visited,
        Self::FollowUp,
        Self::SecondFollowUp,
    ];

    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Visited => "visited",
            Self::FollowUp => "followup",
            Self::SecondFollowUp => "2nd-followup",
        }
    }
}

impl fmt::Display for VisitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitStage {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s.trim())
            .ok_or_else(|| crate::Error::validation("stage", format!("unknown stage '{s}'")))
    }
}

/// Visit status of a vendor, using the server's exact strings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum VisitStatus {
    /// Awaiting the first visit
    #[default]
    #[serde(rename = "pending-visit")]
    PendingVisit,
    /// Onboarded on the first visit
    #[serde(rename = "visited-onboarded")]
    VisitedOnboarded,
    /// Rejected on the first visit
    #[serde(rename = "visited-rejected")]
    VisitedRejected,
    /// First visit done, follow-up scheduled
    #[serde(rename = "visited-followup-scheduled")]
    VisitedFollowupScheduled,
    /// Onboarded on the follow-up
    #[serde(rename = "followup-onboarded")]
    FollowupOnboarded,
    /// Rejected on the follow-up
    #[serde(rename = "followup-rejected")]
    FollowupRejected,
    /// Follow-up done, second follow-up scheduled
    #[serde(rename = "followup-2nd-scheduled")]
    Followup2ndScheduled,
    /// Onboarded on the second follow-up
    #[serde(rename = "2nd-followup-onboarded")]
    SecondFollowupOnboarded,
    /// Rejected on the second follow-up
    #[serde(rename = "2nd-followup-rejected")]
    SecondFollowupRejected,
}

impl VisitStatus {
    /// Every status in lifecycle order
    pub const ALL: [Self; 9] = [
        Self::PendingVisit,
        Self::VisitedOnboarded,
        Self::VisitedRejected,
        Self::VisitedFollowupScheduled,
        Self::FollowupOnboarded,
        Self::FollowupRejected,
        Self::Followup2ndScheduled,
        Self::SecondFollowupOnboarded,
        Self::SecondFollowupRejected,
    ];

    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingVisit => "pending-visit",
            Self::VisitedOnboarded => "visited-onboarded",
            Self::VisitedRejected => "visited-rejected",
            Self::VisitedFollowupScheduled => "visited-followup-scheduled",
            Self::FollowupOnboarded => "followup-onboarded",
            Self::FollowupRejected => "followup-rejected",
            Self::Followup2ndScheduled => "followup-2nd-scheduled",
            Self::SecondFollowupOnboarded => "2nd-followup-onboarded",
            Self::SecondFollowupRejected => "2nd-followup-rejected",
        }
    }

    /// Display label, the wire value with dashes as spaces
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('-', " ")
    }

    /// Stage this status belongs to
    #[must_use]
    pub const fn stage(self) -> VisitStage {
        match self {
            Self::PendingVisit => VisitStage::Pending,
            Self::VisitedOnboarded | Self::VisitedRejected | Self::VisitedFollowupScheduled => {
                VisitStage::Visited
            }
            Self::FollowupOnboarded | Self::FollowupRejected | Self::Followup2ndScheduled => {
                VisitStage::FollowUp
            }
            Self::SecondFollowupOnboarded | Self::SecondFollowupRejected => {
                VisitStage::SecondFollowUp
            }
        }
    }

    /// Status preselected when an operator switches to `stage`
    #[must_use]
    pub const fn default_for(stage: VisitStage) -> Self {
        match stage {
            VisitStage::Pending => Self::PendingVisit,
            VisitStage::Visited => Self::VisitedOnboarded,
            VisitStage::FollowUp => Self::FollowupOnboarded,
            VisitStage::SecondFollowUp => Self::SecondFollowupOnboarded,
        }
    }

    /// Statuses selectable within `stage`
    #[must_use]
    pub fn outcomes(stage: VisitStage) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|status| status.stage() == stage)
            .collect()
    }

    /// Whether the vendor was onboarded
    #[must_use]
    pub const fn is_onboarded(self) -> bool {
        matches!(
            self,
            Self::VisitedOnboarded | Self::FollowupOnboarded | Self::SecondFollowupOnboarded
        )
    }

    /// Whether the vendor turned the offer down
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        matches!(
            self,
            Self::VisitedRejected | Self::FollowupRejected | Self::SecondFollowupRejected
        )
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                crate::Error::validation("visitStatus", format!("unknown visit status '{s}'"))
            })
    }
}

/// Kind of payment owed to an agent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// First visit
    Visit,
    /// Follow-up visit
    Followup,
    /// Vendor onboarded
    Onboarding,
    /// Balance adjustment
    Balance,
}

impl PaymentType {
    /// Wire value
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Visit => "visit",
            Self::Followup => "followup",
            Self::Onboarding => "onboarding",
            Self::Balance => "balance",
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Visit => "Visit",
            Self::Followup => "Follow-up",
            Self::Onboarding => "Onboarding",
            Self::Balance => "Balance",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rates paid per event for one category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryRates {
    /// First visit
    #[serde(default)]
    pub visit: f64,
    /// Follow-up visit
    #[serde(default)]
    pub followup: f64,
    /// Onboarding
    #[serde(default)]
    pub onboarding: f64,
}

impl CategoryRates {
    /// Rate for a payment type; balance entries have no fixed rate
    #[must_use]
    pub const fn rate(&self, payment_type: PaymentType) -> Option<f64> {
        match payment_type {
            PaymentType::Visit => Some(self.visit),
            PaymentType::Followup => Some(self.followup),
            PaymentType::Onboarding => Some(self.onboarding),
            PaymentType::Balance => None,
        }
    }
}

/// Server-held payment rate table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    /// Document id
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Rates keyed by category
    #[serde(default)]
    pub categories: BTreeMap<PaymentCategory, CategoryRates>,
    /// Legacy flat shape, category A
    #[serde(rename = "categoryA", default, skip_serializing_if = "Option::is_none")]
    pub category_a: Option<CategoryRates>,
    /// Legacy flat shape, category B
    #[serde(rename = "categoryB", default, skip_serializing_if = "Option::is_none")]
    pub category_b: Option<CategoryRates>,
    /// Legacy flat shape, category C
    #[serde(rename = "categoryC", default, skip_serializing_if = "Option::is_none")]
    pub category_c: Option<CategoryRates>,
    /// Legacy flat shape, category D
    #[serde(rename = "categoryD", default, skip_serializing_if = "Option::is_none")]
    pub category_d: Option<CategoryRates>,
    /// Last editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Last edit time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PaymentConfig {
    /// Rates for `category`, preferring the nested table over the legacy fields
    #[must_use]
    pub fn rates_for(&self, category: PaymentCategory) -> Option<CategoryRates> {
        self.categories.get(&category).copied().or(match category {
            PaymentCategory::A => self.category_a,
            PaymentCategory::B => self.category_b,
            PaymentCategory::C => self.category_c,
            PaymentCategory::D => self.category_d,
        })
    }

    /// Replace the rates of one category in the nested table
    pub fn set_rates(&mut self, category: PaymentCategory, rates: CategoryRates) {
        self.categories.insert(category, rates);
    }

    /// Payload for saving the table; legacy fields are folded into `categories`
    #[must_use]
    pub fn to_update(&self) -> PaymentConfigUpdate {
        let categories = PaymentCategory::ALL
            .into_iter()
            .filter_map(|category| self.rates_for(category).map(|rates| (category, rates)))
            .collect();
        PaymentConfigUpdate { categories }
    }
}

/// Body of `PUT /api/payments/admin/payment-config`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentConfigUpdate {
    /// Rates keyed by category
    pub categories: BTreeMap<PaymentCategory, CategoryRates>,
}

/// Expected payment for a status change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentEstimate {
    /// Payment kind
    pub payment_type: PaymentType,
    /// Amount in rupees
    pub amount: f64,
}

impl fmt::Display for PaymentEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} payment of {}",
            self.payment_type,
            crate::utils::format_rupees(self.amount)
        )
    }
}

/// Payment type a status change triggers, if any
#[must_use]
pub const fn payment_type_for(status: VisitStatus) -> Option<PaymentType> {
    if status.is_onboarded() {
        return Some(PaymentType::Onboarding);
    }
    match status {
        VisitStatus::VisitedFollowupScheduled => Some(PaymentType::Visit),
        VisitStatus::Followup2ndScheduled => Some(PaymentType::Followup),
        _ => None,
    }
}

/// Estimate the payment for `status` using the server's rates
#[must_use]
pub fn estimate_payment(
    config: &PaymentConfig,
    category: PaymentCategory,
    status: VisitStatus,
) -> Option<PaymentEstimate> {
    let payment_type = payment_type_for(status)?;
    let amount = config.rates_for(category)?.rate(payment_type)?;
    Some(PaymentEstimate {
        payment_type,
        amount,
    })
}

/// Operator selection on the vendor payment panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentStatusSelection {
    /// Selected category
    pub category: Option<PaymentCategory>,
    /// Selected visit status
    pub visit_status: Option<VisitStatus>,
    /// Follow-up date, when scheduling one
    pub follow_up_date: Option<String>,
    /// Second follow-up date
    pub second_follow_up_date: Option<String>,
    /// Free-text remarks
    pub remarks: Option<String>,
}

impl PaymentStatusSelection {
    /// Selection prefilled from a vendor's current values
    #[must_use]
    pub fn from_vendor(vendor: &crate::vendor::Vendor) -> Self {
        Self {
            category: vendor.payment_category,
            visit_status: Some(vendor.visit_status.unwrap_or_default()),
            ..Self::default()
        }
    }

    /// Switch stage, resetting the status to the stage default
    pub fn select_stage(&mut self, stage: VisitStage) {
        self.visit_status = Some(VisitStatus::default_for(stage));
    }

    /// Estimate for the current selection
    #[must_use]
    pub fn estimate(&self, config: &PaymentConfig) -> Option<PaymentEstimate> {
        estimate_payment(config, self.category?, self.visit_status?)
    }

    /// Build the request body
    ///
    /// # Errors
    ///
    /// Returns a validation error unless both category and visit status are selected.
    pub fn into_request(self) -> crate::Result<PaymentStatusUpdate> {
        match (self.category, self.visit_status) {
            (Some(payment_category), Some(visit_status)) => Ok(PaymentStatusUpdate {
                payment_category,
                visit_status,
                follow_up_date: self.follow_up_date,
                second_follow_up_date: self.second_follow_up_date,
                remarks: self.remarks,
            }),
            (None, _) => Err(crate::Error::validation(
                "paymentCategory",
                "Please select both category and visit status",
            )),
            (Some(_), None) => Err(crate::Error::validation(
                "visitStatus",
                "Please select both category and visit status",
            )),
        }
    }
}

/// Body of `PATCH /api/payments/admin/vendors/{id}/payment-status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    /// Category
    pub payment_category: PaymentCategory,
    /// New visit status
    pub visit_status: VisitStatus,
    /// Follow-up date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
    /// Second follow-up date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_follow_up_date: Option<String>,
    /// Remarks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Payment fields of a vendor as echoed after a status change
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorPaymentState {
    /// Category
    #[serde(default)]
    pub payment_category: Option<PaymentCategory>,
    /// Visit status
    #[serde(default)]
    pub visit_status: Option<VisitStatus>,
    /// Next follow-up
    #[serde(default)]
    pub follow_up_date: Option<DateTime<Utc>>,
    /// Amount still owed
    #[serde(default)]
    pub total_payment_due: Option<f64>,
    /// Amount settled
    #[serde(default)]
    pub total_payment_paid: Option<f64>,
    /// Whether every payment is settled
    #[serde(default)]
    pub payment_completed: Option<bool>,
}

/// Server answer to a payment status change
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusOutcome {
    /// Whether the server reports success
    #[serde(default)]
    pub success: bool,
    /// Server message
    #[serde(default)]
    pub message: Option<String>,
    /// Updated vendor payment fields
    #[serde(default)]
    pub vendor: Option<VendorPaymentState>,
    /// Payment created by this change
    #[serde(default)]
    pub new_payment: Option<Payment>,
    /// Whether a payment was created
    #[serde(default)]
    pub payment_created: Option<bool>,
    /// Amount of the created payment
    #[serde(default)]
    pub payment_amount: Option<f64>,
    /// Kind of the created payment
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
}

impl PaymentStatusOutcome {
    /// One-line summary for the operator
    #[must_use]
    pub fn summary(&self) -> String {
        match (self.payment_created, self.payment_amount, self.payment_type) {
            (Some(true), Some(amount), Some(kind)) => format!(
                "Payment of {} created for {}",
                crate::utils::format_rupees(amount),
                kind.as_wire()
            ),
            _ => "Payment status updated".to_string(),
        }
    }
}

/// Settlement state of a payment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Owed to the agent
    #[default]
    Pending,
    /// Paid out
    Paid,
}

impl FromStr for SettlementStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(crate::Error::validation(
                "paymentStatus",
                format!("unknown payment status '{other}'"),
            )),
        }
    }
}

/// A payment owed to a field agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Document id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Agent
    #[serde(default)]
    pub agent_id: Option<EntityId>,
    /// Agent display name
    #[serde(default)]
    pub agent_name: Option<String>,
    /// Vendor
    #[serde(default)]
    pub vendor_id: Option<EntityId>,
    /// Vendor display name
    #[serde(default)]
    pub vendor_name: Option<String>,
    /// Category
    #[serde(default)]
    pub category: Option<PaymentCategory>,
    /// Payment kind
    pub payment_type: PaymentType,
    /// Amount in rupees
    #[serde(default)]
    pub amount: f64,
    /// Visit status that produced the payment
    #[serde(default)]
    pub visit_status: Option<VisitStatus>,
    /// Settlement state
    #[serde(default)]
    pub payment_status: SettlementStatus,
    /// When it was paid
    #[serde(default)]
    pub paid_date: Option<DateTime<Utc>>,
    /// Who paid it
    #[serde(default)]
    pub paid_by: Option<String>,
    /// Remarks
    #[serde(default)]
    pub remarks: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Totals of a payment listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    /// Amount pending
    #[serde(default)]
    pub pending: f64,
    /// Amount paid
    #[serde(default)]
    pub paid: f64,
    /// Number of pending payments
    #[serde(default)]
    pub pending_count: u64,
    /// Number of paid payments
    #[serde(default)]
    pub paid_count: u64,
}

/// Response of the payments listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentList {
    /// Page items
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Totals across the filter
    #[serde(default)]
    pub stats: PaymentStats,
    /// Pagination metadata
    #[serde(default)]
    pub pagination: Pagination,
}

/// Filter of the payments listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentQuery {
    /// Settlement state
    pub status: Option<SettlementStatus>,
    /// Agent
    pub agent_id: Option<EntityId>,
    /// Category
    pub category: Option<PaymentCategory>,
    /// Range start
    pub start_date: Option<DateTime<Utc>>,
    /// Range end
    pub end_date: Option<DateTime<Utc>>,
    /// Page
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

impl PaymentQuery {
    /// Restrict to one calendar month
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid month.
    pub fn for_month(mut self, year: i32, month: u32) -> crate::Result<Self> {
        let (start, end) = crate::utils::month_bounds(year, month)
            .ok_or_else(|| crate::Error::validation("month", format!("invalid month {month}")))?;
        self.start_date = Some(start);
        self.end_date = Some(end);
        Ok(self)
    }

    /// Query string pairs, skipping unset filters
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            let value = match status {
                SettlementStatus::Pending => "pending",
                SettlementStatus::Paid => "paid",
            };
            pairs.push(("status", value.to_string()));
        }
        if let Some(agent_id) = &self.agent_id {
            pairs.push(("agentId", agent_id.clone()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.to_rfc3339()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.to_rfc3339()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Per-agent totals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPaymentSummary {
    /// Agent id
    #[serde(rename = "_id")]
    pub agent_id: EntityId,
    /// Agent name
    #[serde(default)]
    pub agent_name: String,
    /// Total owed over the period
    #[serde(default)]
    pub total_amount: f64,
    /// Vendors handled
    #[serde(default)]
    pub vendor_count: u64,
    /// Still pending
    #[serde(default)]
    pub pending_amount: f64,
    /// Already paid
    #[serde(default)]
    pub paid_amount: f64,
}

/// Agent profile attached to payment details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    /// Agent id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Name
    #[serde(default)]
    pub name: String,
    /// Email
    #[serde(default)]
    pub email: Option<String>,
    /// Phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Whether the account is active
    #[serde(default)]
    pub is_active: bool,
    /// Agent kind
    #[serde(default)]
    pub agent_type: Option<String>,
}

/// Payment counts per type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentCounts {
    /// Visits
    #[serde(default)]
    pub visit: u64,
    /// Follow-ups
    #[serde(default)]
    pub followup: u64,
    /// Onboardings
    #[serde(default)]
    pub onboarding: u64,
    /// Balance entries
    #[serde(default)]
    pub balance: u64,
}

/// Vendor counts per outcome
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VendorCounts {
    /// Visited
    #[serde(default)]
    pub visited: u64,
    /// Onboarded
    #[serde(default)]
    pub onboarded: u64,
    /// Rejected
    #[serde(default)]
    pub rejected: u64,
    /// In follow-up
    #[serde(default)]
    pub followup: u64,
}

/// Totals on the agent payment page
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPaymentStats {
    /// Total earned
    #[serde(default)]
    pub total: f64,
    /// Still pending
    #[serde(default)]
    pub pending: f64,
    /// Already paid
    #[serde(default)]
    pub paid: f64,
    /// Vendors handled
    #[serde(default)]
    pub total_vendors: u64,
    /// Payments per type
    #[serde(default)]
    pub payment_counts: PaymentCounts,
    /// Vendors per outcome
    #[serde(default)]
    pub vendor_counts: VendorCounts,
}

/// Everything shown on the agent payment page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPaymentDetails {
    /// Agent profile
    pub agent: AgentProfile,
    /// All payments of the agent
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Totals
    #[serde(default)]
    pub stats: AgentPaymentStats,
    /// Rates in force
    #[serde(default)]
    pub payment_config: Option<PaymentConfig>,
}

impl AgentPaymentDetails {
    /// Payments still owed
    pub fn pending_payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments
            .iter()
            .filter(|payment| payment.payment_status == SettlementStatus::Pending)
    }
}

/// Body of `PATCH /api/payments/admin/payments/mark-paid`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequest {
    /// Specific payments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_ids: Option<Vec<EntityId>>,
    /// Every pending payment of this agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<EntityId>,
}

impl MarkPaidRequest {
    /// Settle every pending payment of an agent
    pub fn for_agent(agent_id: impl Into<EntityId>) -> Self {
        Self {
            payment_ids: None,
            agent_id: Some(agent_id.into()),
        }
    }

    /// Settle specific payments
    #[must_use]
    pub const fn for_payments(payment_ids: Vec<EntityId>) -> Self {
        Self {
            payment_ids: Some(payment_ids),
            agent_id: None,
        }
    }
}

/// Body of `PUT /api/payments/admin/payments/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    /// Category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<PaymentCategory>,
    /// Payment kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    /// Amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Settlement state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<SettlementStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn config() -> PaymentConfig {
        serde_json::from_value(json!({
            "_id": "cfg1",
            "categories": {
                "A": {"visit": 50, "followup": 30, "onboarding": 200},
                "B": {"visit": 40, "followup": 25, "onboarding": 150}
            },
            "categoryC": {"visit": 20, "followup": 10, "onboarding": 80}
        }))
        .unwrap()
    }

    #[rstest]
    #[case(VisitStatus::PendingVisit, VisitStage::Pending)]
    #[case(VisitStatus::VisitedRejected, VisitStage::Visited)]
    #[case(VisitStatus::VisitedFollowupScheduled, VisitStage::Visited)]
    #[case(VisitStatus::Followup2ndScheduled, VisitStage::FollowUp)]
    #[case(VisitStatus::SecondFollowupRejected, VisitStage::SecondFollowUp)]
    fn test_status_stage(#[case] status: VisitStatus, #[case] stage: VisitStage) {
        assert_eq!(status.stage(), stage);
    }

    #[test]
    fn test_stage_defaults_belong_to_their_stage() {
        for stage in VisitStage::ALL {
            let status = VisitStatus::default_for(stage);
            assert_eq!(status.stage(), stage);
            assert!(VisitStatus::outcomes(stage).contains(&status));
        }
        assert_eq!(
            VisitStatus::default_for(VisitStage::SecondFollowUp),
            VisitStatus::SecondFollowupOnboarded
        );
    }

    #[test]
    fn test_status_wire_strings_round_trip() {
        for status in VisitStatus::ALL {
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, json!(status.as_str()));
            assert_eq!(status.as_str().parse::<VisitStatus>().unwrap(), status);
        }
        assert_eq!(VisitStatus::Followup2ndScheduled.label(), "followup 2nd scheduled");
    }

    #[rstest]
    #[case(PaymentCategory::A, VisitStatus::VisitedOnboarded, Some((PaymentType::Onboarding, 200.0)))]
    #[case(PaymentCategory::B, VisitStatus::SecondFollowupOnboarded, Some((PaymentType::Onboarding, 150.0)))]
    #[case(PaymentCategory::A, VisitStatus::VisitedFollowupScheduled, Some((PaymentType::Visit, 50.0)))]
    #[case(PaymentCategory::B, VisitStatus::Followup2ndScheduled, Some((PaymentType::Followup, 25.0)))]
    #[case(PaymentCategory::C, VisitStatus::FollowupOnboarded, Some((PaymentType::Onboarding, 80.0)))]
    #[case(PaymentCategory::A, VisitStatus::VisitedRejected, None)]
    #[case(PaymentCategory::A, VisitStatus::PendingVisit, None)]
    #[case(PaymentCategory::D, VisitStatus::VisitedOnboarded, None)]
    fn test_estimate_uses_server_rates(
        #[case] category: PaymentCategory,
        #[case] status: VisitStatus,
        #[case] expected: Option<(PaymentType, f64)>,
    ) {
        let estimate = estimate_payment(&config(), category, status)
            .map(|estimate| (estimate.payment_type, estimate.amount));
        assert_eq!(estimate, expected);
    }

    #[test]
    fn test_estimate_follows_config_changes() {
        let mut config = config();
        let before = estimate_payment(&config, PaymentCategory::A, VisitStatus::VisitedOnboarded);
        assert_eq!(before.map(|e| e.amount), Some(200.0));

        config.set_rates(
            PaymentCategory::A,
            CategoryRates {
                visit: 60.0,
                followup: 35.0,
                onboarding: 250.0,
            },
        );
        let after = estimate_payment(&config, PaymentCategory::A, VisitStatus::VisitedOnboarded);
        assert_eq!(after.map(|e| e.amount), Some(250.0));
    }

    #[test]
    fn test_selection_requires_category_and_status() {
        let missing_category = PaymentStatusSelection {
            visit_status: Some(VisitStatus::VisitedOnboarded),
            ..PaymentStatusSelection::default()
        };
        let err = missing_category.into_request().unwrap_err();
        assert_eq!(err.user_message(), "Please select both category and visit status");

        let missing_status = PaymentStatusSelection {
            category: Some(PaymentCategory::A),
            ..PaymentStatusSelection::default()
        };
        assert!(missing_status.into_request().is_err());
    }

    #[test]
    fn test_selection_stage_switch_and_request_body() {
        let mut selection = PaymentStatusSelection {
            category: Some(PaymentCategory::B),
            ..PaymentStatusSelection::default()
        };
        selection.select_stage(VisitStage::FollowUp);
        assert_eq!(selection.visit_status, Some(VisitStatus::FollowupOnboarded));

        let body = serde_json::to_value(selection.into_request().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"paymentCategory": "B", "visitStatus": "followup-onboarded"})
        );
    }

    #[test]
    fn test_legacy_fields_fold_into_update() {
        let update = config().to_update();
        assert_eq!(update.categories.len(), 3);
        assert_eq!(update.categories[&PaymentCategory::C].onboarding, 80.0);
    }

    #[test]
    fn test_outcome_summary() {
        let outcome: PaymentStatusOutcome = serde_json::from_value(json!({
            "success": true,
            "paymentCreated": true,
            "paymentAmount": 200,
            "paymentType": "onboarding",
            "vendor": {"paymentCategory": "A", "visitStatus": "visited-onboarded", "totalPaymentDue": 200}
        }))
        .unwrap();
        assert_eq!(outcome.summary(), "Payment of ₹200 created for onboarding");

        let quiet = PaymentStatusOutcome::default();
        assert_eq!(quiet.summary(), "Payment status updated");
    }

    #[test]
    fn test_payment_query_month_pairs() {
        let query = PaymentQuery {
            status: Some(SettlementStatus::Pending),
            ..PaymentQuery::default()
        }
        .for_month(2025, 3)
        .unwrap();

        assert_eq!(
            query.to_pairs(),
            vec![
                ("status", "pending".to_string()),
                ("startDate", "2025-03-01T00:00:00+00:00".to_string()),
                ("endDate", "2025-03-31T23:59:59+00:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_mark_paid_bodies() {
        assert_eq!(
            serde_json::to_value(MarkPaidRequest::for_agent("ag1")).unwrap(),
            json!({"agentId": "ag1"})
        );
        assert_eq!(
            serde_json::to_value(MarkPaidRequest::for_payments(vec!["p1".into()])).unwrap(),
            json!({"paymentIds": ["p1"]})
        );
    }
}
