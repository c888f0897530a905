//! Admin notifications raised by agent activity

use crate::types::{EntityId, Pagination, ref_id};
use crate::vendor::VendorStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What triggered a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An agent moved a follow-up date
    FollowUpUpdate,
    /// A vendor changed status
    StatusUpdate,
    /// Anything newer than this console
    #[serde(other)]
    Other,
}

/// Who caused the notification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedBy {
    /// Account id
    #[serde(default)]
    pub user_id: Option<EntityId>,
    /// Display name
    #[serde(default)]
    pub user_name: String,
    /// Role
    #[serde(default)]
    pub user_role: Option<String>,
}

/// Follow-up date change
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpChange {
    /// Previous date
    #[serde(default)]
    pub old_date: Option<DateTime<Utc>>,
    /// New date
    #[serde(default)]
    pub new_date: Option<DateTime<Utc>>,
}

/// Vendor snapshot stored with the notification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VendorSnapshot {
    /// Restaurant name
    #[serde(default)]
    pub restaurant_name: String,
    /// Status at notification time
    #[serde(default)]
    pub restaurant_status: VendorStatus,
}

/// A notification in the admin inbox
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Trigger
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Vendor id, or the populated vendor document
    #[serde(default)]
    pub vendor_id: serde_json::Value,
    /// Author
    #[serde(default)]
    pub updated_by: UpdatedBy,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Body
    #[serde(default)]
    pub message: String,
    /// Follow-up change, for follow-up updates
    #[serde(default)]
    pub follow_up_date: Option<FollowUpChange>,
    /// Vendor snapshot
    #[serde(default)]
    pub vendor_details: VendorSnapshot,
    /// Whether it was opened
    #[serde(default)]
    pub is_read: bool,
    /// When it was opened
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Vendor id whether the server sent a string or a populated object
    #[must_use]
    pub fn vendor_ref(&self) -> Option<EntityId> {
        ref_id(&self.vendor_id)
    }

    /// Where opening the notification leads
    #[must_use]
    pub fn target(&self) -> Option<NavigationTarget> {
        let vendor_id = self.vendor_ref()?;
        Some(
            if self.vendor_details.restaurant_status == VendorStatus::Pending {
                NavigationTarget::VendorRequests { vendor_id }
            } else {
                NavigationTarget::VendorDetail { vendor_id }
            },
        )
    }
}

/// Console page a notification opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Review queue, focused on the vendor
    VendorRequests {
        /// Vendor id
        vendor_id: EntityId,
    },
    /// Vendor detail page
    VendorDetail {
        /// Vendor id
        vendor_id: EntityId,
    },
}

impl NavigationTarget {
    /// Console route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::VendorRequests { vendor_id } => format!("/vendor-requests?id={vendor_id}"),
            Self::VendorDetail { vendor_id } => format!("/vendor/{vendor_id}"),
        }
    }

    /// Vendor the page is about
    #[must_use]
    pub fn vendor_id(&self) -> &str {
        match self {
            Self::VendorRequests { vendor_id } | Self::VendorDetail { vendor_id } => vendor_id,
        }
    }
}

/// One page of the inbox
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    /// Notifications, newest first
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Pagination metadata
    #[serde(default)]
    pub pagination: Pagination,
    /// Unread notifications overall
    #[serde(default)]
    pub unread_count: u64,
}

/// Inbox filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Page size
    pub limit: Option<u32>,
    /// Page
    pub page: Option<u32>,
    /// Only read or only unread
    pub is_read: Option<bool>,
}

impl NotificationQuery {
    /// Query string pairs, skipping unset filters
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(is_read) = self.is_read {
            pairs.push(("isRead", is_read.to_string()));
        }
        pairs
    }
}

/// Unread counters shown as sidebar and bell badges
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BadgeCounts {
    /// Unread notifications
    pub notifications: u64,
    /// Unseen vendor edit requests
    pub edit_requests: u64,
    /// Unseen vendor registrations
    pub vendor_requests: u64,
}

/// Badge text, capped at `99+`
#[must_use]
pub fn badge_label(count: u64) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".to_string()),
    }
}

/// Compact age such as `5m ago`, falling back to the date after a week
#[must_use]
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        at.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn notification(vendor_id: serde_json::Value, status: &str) -> Notification {
        serde_json::from_value(json!({
            "_id": "n1",
            "type": "status_update",
            "vendorId": vendor_id,
            "updatedBy": {"userId": "u1", "userName": "Ravi", "userRole": "agent"},
            "title": "Vendor updated",
            "message": "Spice Route moved to follow-up",
            "followUpDate": {"oldDate": null, "newDate": "2025-03-10T00:00:00.000Z"},
            "vendorDetails": {"restaurantName": "Spice Route", "restaurantStatus": status},
            "isRead": false,
            "createdAt": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_pending_vendor_opens_review_queue() {
        let n = notification(json!("v1"), "pending");
        assert_eq!(
            n.target(),
            Some(NavigationTarget::VendorRequests {
                vendor_id: "v1".to_string()
            })
        );
        assert_eq!(n.target().unwrap().path(), "/vendor-requests?id=v1");
    }

    #[test]
    fn test_published_vendor_opens_detail_with_populated_id() {
        let n = notification(json!({"_id": "v2", "restaurantName": "Spice Route"}), "publish");
        let target = n.target().unwrap();
        assert_eq!(target.path(), "/vendor/v2");
        assert_eq!(target.vendor_id(), "v2");
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let n: Notification = serde_json::from_value(json!({"_id": "n9", "type": "payment_update"})).unwrap();
        assert_eq!(n.kind, NotificationKind::Other);
        assert!(n.target().is_none());
    }

    #[test]
    fn test_badge_label() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(7), Some("7".to_string()));
        assert_eq!(badge_label(150), Some("99+".to_string()));
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        let ago = |minutes| now - chrono::Duration::minutes(minutes);

        assert_eq!(relative_time(now, now), "Just now");
        assert_eq!(relative_time(ago(5), now), "5m ago");
        assert_eq!(relative_time(ago(180), now), "3h ago");
        assert_eq!(relative_time(ago(60 * 24 * 2), now), "2d ago");
        assert_eq!(relative_time(ago(60 * 24 * 10), now), "Mar 10");
    }
}
