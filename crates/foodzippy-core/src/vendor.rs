//! Vendor records, their normalization and the review workflow

use crate::payment::{PaymentCategory, VisitStatus};
use crate::types::{EntityId, Pagination, StatusCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

/// Publication status of a vendor registration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    /// Awaiting review
    #[default]
    Pending,
    /// Approved and listed
    Publish,
    /// Rejected
    Reject,
}

impl VendorStatus {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Publish => "publish",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VendorStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "publish" | "published" | "approved" => Ok(Self::Publish),
            "reject" | "rejected" => Ok(Self::Reject),
            other => Err(crate::Error::validation(
                "status",
                format!("unknown vendor status '{other}'"),
            )),
        }
    }
}

/// Review decision on a pending vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Publish the vendor
    Approve,
    /// Reject the registration
    Reject,
}

impl ReviewAction {
    /// Status the vendor moves to
    #[must_use]
    pub const fn target_status(self) -> VendorStatus {
        match self {
            Self::Approve => VendorStatus::Publish,
            Self::Reject => VendorStatus::Reject,
        }
    }
}

/// Marketplace listing tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    /// Free launch listing
    #[default]
    Launching,
    /// Premium listing
    Vip,
    /// Standard listing
    Normal,
}

impl ListingType {
    /// Every tier in display order
    pub const ALL: [Self; 3] = [Self::Launching, Self::Vip, Self::Normal];

    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Launching => "launching",
            Self::Vip => "vip",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListingType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                crate::Error::validation("listingType", format!("unknown listing type '{s}'"))
            })
    }
}

/// A vendor as shown in the console, after normalization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    /// Identifier, taken from `_id` or `id`
    pub id: EntityId,
    /// Restaurant name
    #[serde(default)]
    pub restaurant_name: String,
    /// Review status
    #[serde(default)]
    pub restaurant_status: VendorStatus,
    /// Vendor type slug
    #[serde(default)]
    pub vendor_type: Option<String>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// Contact number
    #[serde(default)]
    pub mobile_number: Option<String>,
    /// Name of the agent or employee who registered it
    #[serde(default)]
    pub created_by_name: Option<String>,
    /// Payment category
    #[serde(default)]
    pub payment_category: Option<PaymentCategory>,
    /// Visit status
    #[serde(default)]
    pub visit_status: Option<VisitStatus>,
    /// Next follow-up
    #[serde(default)]
    pub follow_up_date: Option<DateTime<Utc>>,
    /// Amount still owed to agents
    #[serde(default)]
    pub total_payment_due: Option<f64>,
    /// Amount paid to agents
    #[serde(default)]
    pub total_payment_paid: Option<f64>,
    /// Whether agent payments are settled
    #[serde(default)]
    pub payment_completed: Option<bool>,
    /// Listing tier
    #[serde(default)]
    pub listing_type: Option<ListingType>,
    /// Listing charge in rupees
    #[serde(default)]
    pub listing_charge: Option<f64>,
    /// Cover image URL
    #[serde(default)]
    pub restaurant_image: Option<String>,
    /// Cuisine categories
    #[serde(default)]
    pub categories: Vec<String>,
    /// Offered services
    #[serde(default)]
    pub services: Vec<String>,
    /// Latitude, 0 when unknown
    #[serde(default)]
    pub latitude: f64,
    /// Longitude, 0 when unknown
    #[serde(default)]
    pub longitude: f64,
    /// Whether an edit request is open
    #[serde(default)]
    pub edit_requested: Option<bool>,
    /// Registration time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Dynamic form answers as submitted
    #[serde(default)]
    pub form_data: Map<String, Value>,
    /// Remaining server fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vendor {
    /// Normalize a raw server document
    ///
    /// `formData` entries are flattened over the top level, `restaurantImage`
    /// objects collapse to their `secure_url`, `categories` and `services`
    /// default to empty, and coordinates become numbers. Numeric answers to
    /// text fields are kept as text. When the flattened answers still do not
    /// fit the record, the vendor's own fields win and the answers stay in
    /// `formData`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an object or has no id.
    pub fn from_raw(raw: Value) -> crate::Result<Self> {
        let Value::Object(vendor) = raw else {
            return Err(crate::Error::validation("vendor", "expected a JSON object"));
        };
        let form_data = match vendor.get("formData") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        let id = vendor
            .get("_id")
            .filter(|v| !v.is_null())
            .or_else(|| vendor.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| crate::Error::validation("id", "vendor has no identifier"))?
            .to_string();

        let flattened = normalized_document(&vendor, &form_data, &id, true);
        match serde_json::from_value(Value::Object(flattened)) {
            Ok(normalized) => Ok(normalized),
            Err(err) => {
                debug!(vendor_id = %id, error = %err, "Form answers do not fit the vendor record");
                let plain = normalized_document(&vendor, &form_data, &id, false);
                Ok(serde_json::from_value(Value::Object(plain))?)
            }
        }
    }

    /// Normalize a list of raw documents, skipping the ones that cannot be read
    #[must_use]
    pub fn from_raw_list(raw: Vec<Value>) -> Vec<Self> {
        raw.into_iter()
            .filter_map(|doc| match Self::from_raw(doc) {
                Ok(vendor) => Some(vendor),
                Err(err) => {
                    warn!(error = %err, "Skipping vendor that could not be normalized");
                    None
                }
            })
            .collect()
    }

    /// Vendor type for display, defaulting to "Restaurant"
    #[must_use]
    pub fn vendor_type_label(&self) -> String {
        self.vendor_type
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .map_or_else(|| "Restaurant".to_string(), crate::utils::capitalize)
    }

    /// Review decisions currently available
    #[must_use]
    pub fn review_actions(&self) -> &'static [ReviewAction] {
        match self.restaurant_status {
            VendorStatus::Pending => &[ReviewAction::Approve, ReviewAction::Reject],
            VendorStatus::Publish | VendorStatus::Reject => &[],
        }
    }

    /// Current visit status, `pending-visit` when unset
    #[must_use]
    pub fn effective_visit_status(&self) -> VisitStatus {
        self.visit_status.unwrap_or_default()
    }

    /// Take over the payment fields echoed after a status change
    ///
    /// The server's values replace the local ones, including cleared fields.
    pub fn apply_payment_state(&mut self, state: &crate::payment::VendorPaymentState) {
        self.payment_category = state.payment_category;
        self.visit_status = state.visit_status;
        self.follow_up_date = state.follow_up_date;
        self.total_payment_due = state.total_payment_due;
        self.total_payment_paid = state.total_payment_paid;
        self.payment_completed = state.payment_completed;
    }

    /// Field from the dynamic form, falling back to the flattened record
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.form_data.get(key).or_else(|| self.extra.get(key))
    }
}

/// Top-level fields typed as text on [`Vendor`]
const TEXT_FIELDS: [&str; 6] = [
    "restaurantName",
    "vendorType",
    "city",
    "mobileNumber",
    "createdByName",
    "restaurantImage",
];

fn normalized_document(
    vendor: &Map<String, Value>,
    form_data: &Map<String, Value>,
    id: &str,
    flatten_form: bool,
) -> Map<String, Value> {
    let mut doc = vendor.clone();
    if flatten_form {
        for (key, value) in form_data {
            doc.insert(key.clone(), value.clone());
        }
    }
    doc.insert("formData".to_string(), Value::Object(form_data.clone()));
    doc.remove("_id");
    doc.insert("id".to_string(), Value::String(id.to_string()));

    let image = match vendor.get("restaurantImage") {
        Some(Value::Object(image)) => image.get("secure_url").cloned().unwrap_or(Value::Null),
        Some(other) => other.clone(),
        None => Value::Null,
    };
    doc.insert("restaurantImage".to_string(), image);

    for key in ["categories", "services"] {
        let list = if flatten_form {
            first_array(form_data, vendor, key)
        } else {
            first_array(&Map::new(), vendor, key)
        };
        doc.insert(key.to_string(), list);
    }

    for key in ["latitude", "longitude"] {
        let coordinate = vendor
            .get(key)
            .and_then(crate::utils::parse_coordinate)
            .or_else(|| form_data.get(key).and_then(crate::utils::parse_coordinate))
            .unwrap_or(0.0);
        doc.insert(key.to_string(), Value::from(coordinate));
    }

    for key in TEXT_FIELDS {
        let text = match doc.get(key) {
            Some(Value::Number(n)) => Some(Value::String(n.to_string())),
            Some(Value::Bool(b)) => Some(Value::String(b.to_string())),
            Some(Value::Null) => {
                doc.remove(key);
                None
            }
            _ => None,
        };
        if let Some(text) = text {
            doc.insert(key.to_string(), text);
        }
    }
    doc
}

fn first_array(form_data: &Map<String, Value>, vendor: &Map<String, Value>, key: &str) -> Value {
    form_data
        .get(key)
        .filter(|v| !v.is_null())
        .or_else(|| vendor.get(key).filter(|v| !v.is_null()))
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}

/// Filter of the vendor listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorQuery {
    /// Page
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Review status
    pub status: Option<VendorStatus>,
    /// City
    pub city: Option<String>,
    /// Free-text search
    pub search: Option<String>,
}

impl VendorQuery {
    /// Query string pairs, skipping unset filters
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(city) = &self.city {
            pairs.push(("city", city.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

/// Filter of the per-agent vendor listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentVendorQuery {
    /// Review status
    pub status: Option<VendorStatus>,
    /// Creation date window understood by the server, e.g. `today` or `week`
    pub date_filter: Option<String>,
    /// Follow-up window understood by the server
    pub follow_up_filter: Option<String>,
    /// Ask for aggregate statistics
    pub include_stats: bool,
    /// Page size
    pub limit: Option<u32>,
}

impl AgentVendorQuery {
    /// Query string pairs for `agent_id`, skipping unset filters
    #[must_use]
    pub fn to_pairs(&self, agent_id: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("agentId", agent_id.to_string())];
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(date_filter) = &self.date_filter {
            pairs.push(("dateFilter", date_filter.clone()));
        }
        if let Some(follow_up) = &self.follow_up_filter {
            pairs.push(("followUpFilter", follow_up.clone()));
        }
        if self.include_stats {
            pairs.push(("includeStats", "true".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Page of normalized vendors
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct VendorPage {
    /// Vendors
    pub vendors: Vec<Vendor>,
    /// Pagination metadata
    pub pagination: Pagination,
    /// Aggregate statistics, when requested
    pub statistics: Option<Value>,
}

/// Vendor registrations in one month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyCount {
    /// Year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
    /// Registrations
    pub count: u64,
}

/// Dashboard analytics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VendorAnalytics {
    /// Registrations per month
    #[serde(default)]
    pub monthly_requests: Vec<MonthlyCount>,
    /// Totals by status
    #[serde(default)]
    pub summary: StatusCounts,
}

/// Listing charge change, optionally switching tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingChange {
    /// Target tier
    pub listing_type: ListingType,
    /// Charge in rupees
    pub listing_charge: f64,
}

impl ListingChange {
    /// Build a change; the launching tier is always free
    #[must_use]
    pub fn new(listing_type: ListingType, listing_charge: f64) -> Self {
        let listing_charge = if listing_type == ListingType::Launching {
            0.0
        } else {
            listing_charge.max(0.0)
        };
        Self {
            listing_type,
            listing_charge,
        }
    }
}

/// Vendor with an open edit request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// Vendor id
    #[serde(rename = "_id")]
    pub vendor_id: EntityId,
    /// Restaurant name
    #[serde(default)]
    pub restaurant_name: String,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// Requester display name
    #[serde(default)]
    pub created_by_name: Option<String>,
    /// When the edit was requested
    #[serde(default)]
    pub edit_request_date: Option<DateTime<Utc>>,
    /// Current review status
    #[serde(default)]
    pub restaurant_status: VendorStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_normalization_flattens_form_data() {
        let vendor = Vendor::from_raw(json!({
            "_id": "v1",
            "restaurantName": "Old Name",
            "restaurantStatus": "pending",
            "formData": {
                "restaurantName": "Spice Route",
                "categories": ["North Indian"],
                "latitude": "12.9716",
                "ownerName": "Asha"
            },
            "restaurantImage": {"secure_url": "https://cdn.example/img.jpg", "public_id": "x"},
            "longitude": 77.5946
        }))
        .unwrap();

        assert_eq!(vendor.id, "v1");
        assert_eq!(vendor.restaurant_name, "Spice Route");
        assert_eq!(vendor.categories, vec!["North Indian".to_string()]);
        assert!(vendor.services.is_empty());
        assert_eq!(vendor.latitude, 12.9716);
        assert_eq!(vendor.longitude, 77.5946);
        assert_eq!(
            vendor.restaurant_image.as_deref(),
            Some("https://cdn.example/img.jpg")
        );
        assert_eq!(vendor.extra.get("ownerName"), Some(&json!("Asha")));
        assert_eq!(vendor.field("ownerName"), Some(&json!("Asha")));
    }

    #[test]
    fn test_normalization_defaults() {
        let vendor = Vendor::from_raw(json!({"id": "v2", "latitude": "unknown"})).unwrap();

        assert_eq!(vendor.id, "v2");
        assert_eq!(vendor.latitude, 0.0);
        assert_eq!(vendor.longitude, 0.0);
        assert_eq!(vendor.restaurant_status, VendorStatus::Pending);
        assert_eq!(vendor.vendor_type_label(), "Restaurant");
        assert_eq!(vendor.effective_visit_status(), VisitStatus::PendingVisit);
    }

    #[test]
    fn test_numeric_form_answers_do_not_break_normalization() {
        let vendor = Vendor::from_raw(json!({
            "_id": "v1",
            "mobileNumber": "9876500000",
            "formData": {"mobileNumber": 9_876_543_210_u64, "city": 560_001}
        }))
        .unwrap();

        assert_eq!(vendor.mobile_number.as_deref(), Some("9876543210"));
        assert_eq!(vendor.city.as_deref(), Some("560001"));
    }

    #[test]
    fn test_unfit_form_answers_stay_in_form_data() {
        let vendor = Vendor::from_raw(json!({
            "_id": "v1",
            "restaurantStatus": "publish",
            "formData": {"restaurantStatus": {"label": "Open"}, "categories": "Thai"}
        }))
        .unwrap();

        assert_eq!(vendor.restaurant_status, VendorStatus::Publish);
        assert!(vendor.categories.is_empty());
        assert_eq!(vendor.field("categories"), Some(&json!("Thai")));
    }

    #[test]
    fn test_listing_skips_unreadable_vendors() {
        let vendors = Vendor::from_raw_list(vec![
            json!({"_id": "good", "restaurantName": "Spice Route"}),
            json!({"restaurantName": "No id"}),
            json!({"_id": "also-good", "formData": {"mobileNumber": 9_876_543_210_u64}}),
        ]);

        let ids: Vec<&str> = vendors.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["good", "also-good"]);
    }

    #[test]
    fn test_normalization_requires_id() {
        assert!(Vendor::from_raw(json!({"restaurantName": "Nameless"})).is_err());
        assert!(Vendor::from_raw(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_review_actions_only_for_pending() {
        let mut vendor = Vendor::from_raw(json!({"_id": "v3", "restaurantStatus": "pending"})).unwrap();
        assert_eq!(
            vendor.review_actions(),
            &[ReviewAction::Approve, ReviewAction::Reject]
        );

        vendor.restaurant_status = ReviewAction::Approve.target_status();
        assert_eq!(vendor.restaurant_status, VendorStatus::Publish);
        assert!(vendor.review_actions().is_empty());
    }

    #[test]
    fn test_vendor_type_label() {
        let vendor =
            Vendor::from_raw(json!({"_id": "v4", "vendorType": "cloud-kitchen"})).unwrap();
        assert_eq!(vendor.vendor_type_label(), "Cloud-kitchen");
    }

    #[test]
    fn test_launching_listing_is_free() {
        assert_eq!(ListingChange::new(ListingType::Launching, 499.0).listing_charge, 0.0);
        assert_eq!(ListingChange::new(ListingType::Vip, 499.0).listing_charge, 499.0);
        assert_eq!(ListingChange::new(ListingType::Normal, -5.0).listing_charge, 0.0);
    }

    #[test]
    fn test_query_pairs() {
        let query = VendorQuery {
            page: Some(2),
            status: Some(VendorStatus::Pending),
            search: Some("dosa".to_string()),
            ..VendorQuery::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "2".to_string()),
                ("status", "pending".to_string()),
                ("search", "dosa".to_string()),
            ]
        );

        let by_agent = AgentVendorQuery {
            include_stats: true,
            ..AgentVendorQuery::default()
        };
        assert_eq!(
            by_agent.to_pairs("ag1"),
            vec![("agentId", "ag1".to_string()), ("includeStats", "true".to_string())]
        );
    }

    #[test]
    fn test_apply_payment_state() {
        let mut vendor = Vendor::from_raw(json!({"_id": "v5", "totalPaymentDue": 50})).unwrap();
        vendor.apply_payment_state(&crate::payment::VendorPaymentState {
            payment_category: Some(PaymentCategory::A),
            visit_status: Some(VisitStatus::VisitedOnboarded),
            total_payment_due: Some(250.0),
            ..crate::payment::VendorPaymentState::default()
        });

        assert_eq!(vendor.payment_category, Some(PaymentCategory::A));
        assert_eq!(vendor.visit_status, Some(VisitStatus::VisitedOnboarded));
        assert_eq!(vendor.total_payment_due, Some(250.0));
    }

    #[test]
    fn test_payment_state_clears_fields_the_server_cleared() {
        let mut vendor = Vendor::from_raw(json!({
            "_id": "v6",
            "visitStatus": "visited-followup-scheduled",
            "followUpDate": "2025-05-01T00:00:00Z"
        }))
        .unwrap();
        assert!(vendor.follow_up_date.is_some());

        let echoed: crate::payment::VendorPaymentState = serde_json::from_value(json!({
            "visitStatus": "followup-onboarded",
            "followUpDate": null
        }))
        .unwrap();
        vendor.apply_payment_state(&echoed);

        assert_eq!(vendor.visit_status, Some(VisitStatus::FollowupOnboarded));
        assert_eq!(vendor.follow_up_date, None);
    }
}
