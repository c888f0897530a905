//! Auxiliary content managed from the console: careers, franchise leads,
//! delivery partners, email templates and drafts, newsletter subscribers.

use crate::error::{Error, Result};
use crate::types::EntityId;
use crate::utils::render_template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Template looked up when approving a delivery partner
pub const PARTNER_APPROVAL_TEMPLATE: &str = "delivery_partner_approval";

/// Subject used when no approval template is stored
pub const DEFAULT_APPROVAL_SUBJECT: &str = "Delivery Partner Application Approved";

/// Body used when no approval template is stored
pub const DEFAULT_APPROVAL_BODY: &str = "Dear {{name}},\n\nCongratulations! Your application has been approved.\n\nLogin Details:\nID: {{loginId}}\nPassword: {{password}}\n\nPlease keep this information secure.\n\nRegards,\n{{appName}}";

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// Career applications

/// Hiring pipeline stage
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CareerStatus {
    /// New application
    #[default]
    Pending,
    /// Being reviewed
    Reviewing,
    /// Shortlisted
    Shortlisted,
    /// Rejected
    Rejected,
    /// Hired
    Hired,
    /// Unrecognized status
    #[serde(other)]
    Unknown,
}

impl CareerStatus {
    /// Settable statuses
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Reviewing,
        Self::Shortlisted,
        Self::Rejected,
        Self::Hired,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewing => "reviewing",
            Self::Shortlisted => "shortlisted",
            Self::Rejected => "rejected",
            Self::Hired => "hired",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CareerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CareerStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::validation("status", format!("Unknown career status: {s}")))
    }
}

/// A job application from the public site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CareerApplication {
    /// Id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Applicant
    #[serde(default)]
    pub full_name: String,
    /// Email
    #[serde(default)]
    pub email: String,
    /// Phone
    #[serde(default)]
    pub phone: String,
    /// Position applied for
    #[serde(default)]
    pub position: String,
    /// City
    #[serde(default)]
    pub city: String,
    /// Cover message
    #[serde(default)]
    pub message: String,
    /// Uploaded resume
    #[serde(default)]
    pub resume_url: String,
    /// Pipeline stage
    #[serde(default)]
    pub status: CareerStatus,
    /// Internal notes
    #[serde(default)]
    pub notes: String,
    /// Submission time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CareerApplication {
    /// Case-insensitive match on name, email, phone, position or city
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        contains_ci(&self.full_name, &q)
            || contains_ci(&self.email, &q)
            || self.phone.contains(query)
            || contains_ci(&self.position, &q)
            || contains_ci(&self.city, &q)
    }
}

/// Counts per hiring stage
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CareerTally {
    /// All applications
    pub total: usize,
    /// Pending
    pub pending: usize,
    /// Reviewing
    pub reviewing: usize,
    /// Shortlisted
    pub shortlisted: usize,
    /// Hired
    pub hired: usize,
    /// Rejected
    pub rejected: usize,
}

impl CareerTally {
    /// Tally a loaded list
    #[must_use]
    pub fn from_applications(applications: &[CareerApplication]) -> Self {
        applications.iter().fold(
            Self {
                total: applications.len(),
                ..Self::default()
            },
            |mut tally, app| {
                match app.status {
                    CareerStatus::Pending => tally.pending += 1,
                    CareerStatus::Reviewing => tally.reviewing += 1,
                    CareerStatus::Shortlisted => tally.shortlisted += 1,
                    CareerStatus::Hired => tally.hired += 1,
                    CareerStatus::Rejected => tally.rejected += 1,
                    CareerStatus::Unknown => {}
                }
                tally
            },
        )
    }
}

// Franchise inquiries

/// Franchise lead stage
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FranchiseStatus {
    /// New lead
    #[default]
    Pending,
    /// Contacted
    Contacted,
    /// Negotiating
    InProgress,
    /// Approved
    Approved,
    /// Rejected
    Rejected,
    /// Unrecognized status
    #[serde(other)]
    Unknown,
}

impl FranchiseStatus {
    /// Settable statuses
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Contacted,
        Self::InProgress,
        Self::Approved,
        Self::Rejected,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::InProgress => "in-progress",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FranchiseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FranchiseStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::validation("status", format!("Unknown franchise status: {s}")))
    }
}

/// A franchise inquiry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseInquiry {
    /// Id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Contact name
    #[serde(default)]
    pub name: String,
    /// Email
    #[serde(default)]
    pub email: String,
    /// Phone
    #[serde(default)]
    pub phone: String,
    /// What they propose
    #[serde(default)]
    pub description: String,
    /// Lead stage
    #[serde(default)]
    pub status: FranchiseStatus,
    /// Internal notes
    #[serde(default)]
    pub notes: String,
    /// Submission time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl FranchiseInquiry {
    /// Case-insensitive match on name, email or phone
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        contains_ci(&self.name, &q) || contains_ci(&self.email, &q) || self.phone.contains(&q)
    }
}

/// Counts per lead stage
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseTally {
    /// All inquiries
    pub total: usize,
    /// Pending
    pub pending: usize,
    /// Contacted
    pub contacted: usize,
    /// In progress
    pub in_progress: usize,
    /// Approved
    pub approved: usize,
    /// Rejected
    pub rejected: usize,
}

impl FranchiseTally {
    /// Tally a loaded list
    #[must_use]
    pub fn from_inquiries(inquiries: &[FranchiseInquiry]) -> Self {
        let mut tally = Self {
            total: inquiries.len(),
            ..Self::default()
        };
        for inquiry in inquiries {
            match inquiry.status {
                FranchiseStatus::Pending => tally.pending += 1,
                FranchiseStatus::Contacted => tally.contacted += 1,
                FranchiseStatus::InProgress => tally.in_progress += 1,
                FranchiseStatus::Approved => tally.approved += 1,
                FranchiseStatus::Rejected => tally.rejected += 1,
                FranchiseStatus::Unknown => {}
            }
        }
        tally
    }
}

/// Status and notes update shared by careers and franchise inquiries
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewUpdate<S> {
    /// New status
    pub status: S,
    /// Notes, replacing the stored ones
    pub notes: String,
}

// Delivery partners

/// Delivery partner application state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PartnerStatus {
    /// Awaiting review
    #[default]
    Pending,
    /// Approved with login credentials
    Approved,
    /// Rejected
    Rejected,
    /// Unrecognized status
    #[serde(other)]
    Unknown,
}

impl PartnerStatus {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PartnerStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [Self::Pending, Self::Approved, Self::Rejected]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::validation("status", format!("Unknown partner status: {s}")))
    }
}

/// A delivery partner application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPartner {
    /// Id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Applicant
    #[serde(default)]
    pub full_name: String,
    /// Phone
    #[serde(default)]
    pub phone: String,
    /// Email
    #[serde(default)]
    pub email: String,
    /// Postal address
    #[serde(default)]
    pub address: String,
    /// Application state
    #[serde(default)]
    pub status: PartnerStatus,
    /// Issued login, once approved
    #[serde(default)]
    pub login_id: Option<String>,
    /// Reason given on rejection
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Approving admin
    #[serde(default)]
    pub approved_by: Option<String>,
    /// Submission time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DeliveryPartner {
    /// Only pending applications can be approved or rejected
    #[must_use]
    pub fn is_reviewable(&self) -> bool {
        self.status == PartnerStatus::Pending
    }
}

/// Delivery partner list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerQuery {
    /// Page
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Status filter, `None` for all
    pub status: Option<PartnerStatus>,
    /// Free text search
    pub search: Option<String>,
}

impl PartnerQuery {
    /// Query string pairs
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.unwrap_or(1).to_string()),
            ("limit", self.limit.unwrap_or(20).to_string()),
        ];
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.trim().to_string()));
        }
        pairs
    }
}

/// Approval payload: issued credentials plus the email to send
#[derive(Debug, Clone, Serialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartnerApproval {
    /// Login to issue
    #[validate(length(min = 1))]
    pub login_id: String,
    /// Password to issue
    #[validate(length(min = 1))]
    pub password: String,
    /// Email subject
    pub email_subject: String,
    /// Email body with `{{placeholders}}`
    pub email_body: String,
}

impl PartnerApproval {
    /// Build an approval from the stored template, or the built-in one
    #[must_use]
    pub fn new(
        login_id: &str,
        password: &str,
        template: Option<&EmailTemplate>,
    ) -> Self {
        let (subject, body) = template.map_or(
            (DEFAULT_APPROVAL_SUBJECT, DEFAULT_APPROVAL_BODY),
            |tpl| (tpl.subject.as_str(), tpl.body.as_str()),
        );
        Self {
            login_id: login_id.trim().to_string(),
            password: password.trim().to_string(),
            email_subject: subject.to_string(),
            email_body: body.to_string(),
        }
    }

    /// Both credentials must be present
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the missing credentials.
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|errors| {
            let mut fields: Vec<_> = errors.field_errors().into_keys().collect();
            fields.sort_unstable();
            Error::validation(fields.join(", "), "Login ID and password are required")
        })
    }

    /// Email body as the partner will read it
    #[must_use]
    pub fn preview(&self, partner_name: &str, app_name: &str) -> String {
        render_template(
            &self.email_body,
            &[
                ("name", partner_name),
                ("loginId", &self.login_id),
                ("password", &self.password),
                ("appName", app_name),
            ],
        )
    }
}

/// Server answer to an approval
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResult {
    /// Whether the server reports success
    #[serde(default)]
    pub success: bool,
    /// Server message
    #[serde(default)]
    pub message: Option<String>,
    /// Credential email outcome, absent on older servers
    #[serde(default)]
    pub email_sent: Option<bool>,
}

impl ApprovalResult {
    /// Missing means sent
    #[must_use]
    pub fn email_delivered(&self) -> bool {
        self.email_sent != Some(false)
    }

    /// Operator-facing summary
    #[must_use]
    pub fn summary(&self) -> &'static str {
        if self.email_delivered() {
            "Application approved and credentials sent via email"
        } else {
            "Application approved but email failed, please share credentials manually"
        }
    }
}

// Email templates and drafts

/// Stored transactional email template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    /// Id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Lookup name
    pub name: String,
    /// Subject
    #[serde(default)]
    pub subject: String,
    /// Body with placeholders
    #[serde(default)]
    pub body: String,
    /// Placeholders the body supports
    #[serde(default)]
    pub variables: Vec<String>,
    /// Last edit
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Template create or update payload
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TemplateDraft {
    /// Lookup name
    pub name: String,
    /// Subject
    pub subject: String,
    /// Body
    pub body: String,
    /// Placeholders
    pub variables: Vec<String>,
}

impl TemplateDraft {
    /// Name, subject and body are all required
    ///
    /// # Errors
    ///
    /// Returns a validation error when any of them is blank.
    pub fn validate(&self) -> Result<()> {
        if [&self.name, &self.subject, &self.body]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return Err(Error::validation(
                "template",
                "Name, subject and body are required",
            ));
        }
        Ok(())
    }
}

/// Newsletter draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailDraft {
    /// Id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Subject
    #[serde(default)]
    pub subject: String,
    /// Body
    #[serde(default)]
    pub body: String,
    /// Author
    #[serde(default)]
    pub created_by: Option<String>,
    /// Last send
    #[serde(default)]
    pub last_sent_at: Option<DateTime<Utc>>,
    /// Recipients of the last send
    #[serde(default)]
    pub recipient_count: u64,
    /// Last edit
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Draft create or update payload
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DraftContent {
    /// Subject
    pub subject: String,
    /// Body
    pub body: String,
}

impl DraftContent {
    /// Subject and body are required
    ///
    /// # Errors
    ///
    /// Returns a validation error when either is blank.
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() || self.body.trim().is_empty() {
            return Err(Error::validation("draft", "Subject and body are required"));
        }
        Ok(())
    }
}

/// Who receives a draft
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DraftSend {
    /// Chosen subscribers, or every active subscriber when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_ids: Option<Vec<EntityId>>,
}

// Subscribers

/// Newsletter subscription state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    /// Receiving mail
    #[default]
    Active,
    /// Opted out or disabled
    Inactive,
}

impl SubscriberStatus {
    /// The opposite state
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for SubscriberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriberStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(Error::validation(
                "status",
                format!("unknown subscriber status '{other}'"),
            )),
        }
    }
}

/// Newsletter subscriber
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    /// Id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Address
    pub email: String,
    /// State
    #[serde(default)]
    pub status: SubscriberStatus,
    /// Where the signup came from
    #[serde(default)]
    pub source: String,
    /// Signup time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Subscriber list filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriberQuery {
    /// Page size
    pub limit: Option<u32>,
    /// Status filter
    pub status: Option<SubscriberStatus>,
}

impl SubscriberQuery {
    /// Query string pairs
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.unwrap_or(200).to_string())];
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// Subscriber counts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriberStats {
    /// All subscribers
    #[serde(default)]
    pub total: u64,
    /// Active
    #[serde(default)]
    pub active: u64,
    /// Inactive
    #[serde(default)]
    pub inactive: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn career(status: &str) -> CareerApplication {
        serde_json::from_value(json!({
            "_id": format!("c-{status}"),
            "fullName": "Asha Menon",
            "email": "asha@example.com",
            "phone": "9876543210",
            "position": "Field Agent",
            "city": "Kochi",
            "status": status
        }))
        .unwrap()
    }

    #[test]
    fn test_career_tally_counts_each_stage() {
        let apps: Vec<_> = ["pending", "pending", "hired", "archived"]
            .into_iter()
            .map(career)
            .collect();
        let tally = CareerTally::from_applications(&apps);

        assert_eq!(tally.total, 4);
        assert_eq!(tally.pending, 2);
        assert_eq!(tally.hired, 1);
        assert_eq!(apps[3].status, CareerStatus::Unknown);
    }

    #[test]
    fn test_career_search() {
        let app = career("pending");
        assert!(app.matches("kochi"));
        assert!(app.matches("98765"));
        assert!(app.matches("FIELD"));
        assert!(!app.matches("delhi"));
    }

    #[test]
    fn test_franchise_in_progress_wire_name() {
        let inquiry: FranchiseInquiry =
            serde_json::from_value(json!({"_id": "f1", "name": "Ravi", "status": "in-progress"}))
                .unwrap();
        assert_eq!(inquiry.status, FranchiseStatus::InProgress);
        assert_eq!("in-progress".parse::<FranchiseStatus>().unwrap(), FranchiseStatus::InProgress);

        let tally = FranchiseTally::from_inquiries(&[inquiry]);
        assert_eq!(tally.in_progress, 1);
    }

    #[test]
    fn test_partner_approval_defaults_to_builtin_template() {
        let approval = PartnerApproval::new(" rider01 ", "s3cret", None);
        assert_eq!(approval.login_id, "rider01");
        assert_eq!(approval.email_subject, DEFAULT_APPROVAL_SUBJECT);
        assert!(approval.check().is_ok());

        let preview = approval.preview("Karan", "Foodzippy");
        assert!(preview.starts_with("Dear Karan,"));
        assert!(preview.contains("ID: rider01"));
        assert!(preview.ends_with("Regards,\nFoodzippy"));
    }

    #[test]
    fn test_partner_approval_uses_stored_template() {
        let template = EmailTemplate {
            id: "t1".to_string(),
            name: PARTNER_APPROVAL_TEMPLATE.to_string(),
            subject: "Welcome aboard".to_string(),
            body: "Hi {{name}}".to_string(),
            variables: vec!["name".to_string()],
            updated_at: None,
        };
        let approval = PartnerApproval::new("rider01", "pw", Some(&template));
        assert_eq!(approval.email_subject, "Welcome aboard");
        assert_eq!(approval.preview("Karan", "Foodzippy"), "Hi Karan");
    }

    #[test]
    fn test_partner_approval_requires_credentials() {
        let err = PartnerApproval::new("  ", "", None).check().unwrap_err();
        assert_eq!(err.user_message(), "Login ID and password are required");
    }

    #[test]
    fn test_approval_result_email_flag() {
        let missing: ApprovalResult = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(missing.email_delivered());

        let failed: ApprovalResult =
            serde_json::from_value(json!({"success": true, "emailSent": false})).unwrap();
        assert!(!failed.email_delivered());
        assert!(failed.summary().contains("email failed"));
    }

    #[test]
    fn test_partner_query_defaults() {
        let query = PartnerQuery {
            status: Some(PartnerStatus::Pending),
            search: Some("  ".to_string()),
            ..PartnerQuery::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "20".to_string()),
                ("status", "Pending".to_string()),
            ]
        );
    }

    #[test]
    fn test_draft_send_omits_ids_for_everyone() {
        assert_eq!(serde_json::to_value(DraftSend::default()).unwrap(), json!({}));
        let chosen = DraftSend {
            subscriber_ids: Some(vec!["s1".to_string()]),
        };
        assert_eq!(
            serde_json::to_value(chosen).unwrap(),
            json!({"subscriberIds": ["s1"]})
        );
    }

    #[test]
    fn test_subscriber_toggle_round_trips() {
        let status = SubscriberStatus::Active;
        assert_eq!(status.toggled(), SubscriberStatus::Inactive);
        assert_eq!(status.toggled().toggled(), status);
        assert_eq!(" Inactive ".parse::<SubscriberStatus>().unwrap(), SubscriberStatus::Inactive);
        assert!("paused".parse::<SubscriberStatus>().is_err());
    }

    #[test]
    fn test_blank_template_and_draft_rejected() {
        assert!(TemplateDraft::default().validate().is_err());
        assert_eq!(
            DraftContent::default().validate().unwrap_err().user_message(),
            "Subject and body are required"
        );
    }
}
