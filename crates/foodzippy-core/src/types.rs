//! Wire envelopes and small shared types used across the admin API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned document identifier
pub type EntityId = String;

/// Generic `{ success, data, message }` envelope returned by most endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    /// Whether the server reports success
    #[serde(default)]
    pub success: bool,
    /// Payload, when the endpoint returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error detail reported alongside a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    /// Whether the server reports success
    #[serde(default)]
    pub success: bool,
    /// Page items
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Pagination metadata
    #[serde(default)]
    pub pagination: Pagination,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page, starting at 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size
    #[serde(default)]
    pub limit: u32,
    /// Total number of matching records
    #[serde(default)]
    pub total: u64,
    /// Total number of pages
    #[serde(default)]
    pub pages: u32,
}

const fn default_page() -> u32 {
    1
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 0,
            total: 0,
            pages: 0,
        }
    }
}

impl Pagination {
    /// Whether another page follows this one
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// Plain `{ success, message }` acknowledgement
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    /// Whether the server reports success
    #[serde(default)]
    pub success: bool,
    /// Human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of a bulk update
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedCount {
    /// Number of documents changed by the server
    #[serde(default)]
    pub modified_count: u64,
}

/// `{ count }` payload used by the unread counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountPayload {
    /// Counter value
    #[serde(default)]
    pub count: u64,
}

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Field agent
    Agent,
    /// Office employee
    Employee,
}

impl Role {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "agent" => Ok(Self::Agent),
            "employee" => Ok(Self::Employee),
            other => Err(crate::Error::validation(
                "role",
                format!("unknown role '{other}'"),
            )),
        }
    }
}

/// Identity of the signed-in administrator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminIdentity {
    /// Login email
    pub email: String,
    /// Administrative role, when the server reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Tally of a moderated queue
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    /// All records
    #[serde(default)]
    pub total: u64,
    /// Awaiting review
    #[serde(default)]
    pub pending: u64,
    /// Approved or published
    #[serde(default)]
    pub approved: u64,
    /// Rejected
    #[serde(default)]
    pub rejected: u64,
}

/// Accept an id that is either a plain string or a populated `{ _id }` object
///
/// # Errors
///
/// Fails when the value is neither form.
pub fn deserialize_ref_id<'de, D>(deserializer: D) -> Result<EntityId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    let value = serde_json::Value::deserialize(deserializer)?;
    ref_id(&value).ok_or_else(|| D::Error::custom("expected an id string or object with _id"))
}

/// Extract an id from a string or a populated `{ _id }` / `{ id }` object
#[must_use]
pub fn ref_id(value: &serde_json::Value) -> Option<EntityId> {
    match value {
        serde_json::Value::String(id) => Some(id.clone()),
        serde_json::Value::Object(map) => map
            .get("_id")
            .or_else(|| map.get("id"))
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}
