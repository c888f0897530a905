//! Vendor edit requests raised by agents

use super::segment;
use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use foodzippy_core::types::{CountPayload, ModifiedCount};
use foodzippy_core::vendor::{EditRequest, ReviewAction};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

const EDIT_REQUESTS: &str = "/api/admin/edit-requests";

#[derive(Deserialize)]
struct PendingEdits {
    #[serde(default)]
    vendors: Vec<EditRequest>,
}

#[derive(Serialize)]
struct Remark<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    remark: Option<&'a str>,
}

impl ApiClient {
    /// Vendors with an open edit request
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn pending_edit_requests(&self) -> ClientResult<Vec<EditRequest>> {
        let pending: PendingEdits = self.get(&format!("{EDIT_REQUESTS}/pending")).await?;
        Ok(pending.vendors)
    }

    /// Edit requests not yet seen
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unread_edit_requests(&self) -> ClientResult<u64> {
        let payload: CountPayload = self.get(&format!("{EDIT_REQUESTS}/unread-count")).await?;
        Ok(payload.count)
    }

    /// Mark every edit request as seen
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_edit_requests_seen(&self) -> ClientResult<u64> {
        let payload: ModifiedCount = self
            .patch_empty(&format!("{EDIT_REQUESTS}/mark-seen"))
            .await?;
        Ok(payload.modified_count)
    }

    /// Approve or reject an edit request; a rejection needs a remark
    ///
    /// # Errors
    ///
    /// Returns a validation error for a rejection without remark, or the
    /// server's error.
    pub async fn review_edit_request(
        &self,
        vendor_id: &str,
        action: ReviewAction,
        remark: Option<&str>,
    ) -> ClientResult<()> {
        let remark = remark.map(str::trim).filter(|r| !r.is_empty());
        let verb = match action {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => {
                if remark.is_none() {
                    return Err(ClientError::validation(
                        "Please provide a reason for rejection",
                    ));
                }
                "reject"
            }
        };

        let _: Value = self
            .patch(
                &format!("{EDIT_REQUESTS}/{}/{verb}", segment(vendor_id)),
                &Remark { remark },
            )
            .await?;
        info!(vendor_id, action = verb, "Edit request reviewed");
        Ok(())
    }
}
