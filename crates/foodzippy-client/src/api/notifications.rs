//! Notification feed

use super::{required, segment};
use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::notification::{Notification, NotificationPage, NotificationQuery};
use foodzippy_core::types::{ApiEnvelope, CountPayload, ModifiedCount};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const NOTIFICATIONS: &str = "/api/notifications";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletedCount {
    #[serde(default)]
    deleted_count: u64,
}

impl ApiClient {
    /// One page of notifications with the unread total
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_notifications(
        &self,
        query: &NotificationQuery,
    ) -> ClientResult<NotificationPage> {
        let envelope: ApiEnvelope<NotificationPage> = self
            .get_with_query(NOTIFICATIONS, &query.to_pairs())
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Number of unread notifications
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unread_notification_count(&self) -> ClientResult<u64> {
        let payload: CountPayload = self.get(&format!("{NOTIFICATIONS}/unread-count")).await?;
        Ok(payload.count)
    }

    /// Mark one notification read
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_notification_read(&self, id: &str) -> ClientResult<Notification> {
        let envelope: ApiEnvelope<Notification> = self
            .patch_empty(&format!("{NOTIFICATIONS}/{}/read", segment(id)))
            .await?;
        required(envelope.data, "notification")
    }

    /// Mark every notification read
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_all_notifications_read(&self) -> ClientResult<u64> {
        let result: ModifiedCount = self
            .patch_empty(&format!("{NOTIFICATIONS}/mark-all-read"))
            .await?;
        debug!(modified = result.modified_count, "Notifications marked read");
        Ok(result.modified_count)
    }

    /// Delete one notification
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_notification(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .delete(&format!("{NOTIFICATIONS}/{}", segment(id)))
            .await?;
        Ok(())
    }

    /// Delete every read notification, returning how many went
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn clear_read_notifications(&self) -> ClientResult<u64> {
        let result: DeletedCount = self
            .delete(&format!("{NOTIFICATIONS}/clear-read"))
            .await?;
        debug!(deleted = result.deleted_count, "Read notifications cleared");
        Ok(result.deleted_count)
    }
}
