//! Notification center state

use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::notification::{NavigationTarget, Notification, NotificationQuery};
use tracing::debug;

/// Loaded notifications plus the unread counter
#[derive(Debug, Clone)]
pub struct Inbox {
    client: ApiClient,
    page_size: u32,
    notifications: Vec<Notification>,
    unread: u64,
}

impl Inbox {
    /// Empty inbox that loads `page_size` notifications per refresh
    #[must_use]
    pub const fn new(client: ApiClient, page_size: u32) -> Self {
        Self {
            client,
            page_size,
            notifications: Vec::new(),
            unread: 0,
        }
    }

    /// Loaded notifications, newest first as the server sends them
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Unread counter
    #[must_use]
    pub const fn unread(&self) -> u64 {
        self.unread
    }

    /// Reload the first page and the unread counter
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let query = NotificationQuery {
            limit: Some(self.page_size),
            page: Some(1),
            is_read: None,
        };
        let page = self.client.list_notifications(&query).await?;
        self.notifications = page.notifications;
        self.unread = page.unread_count;
        Ok(())
    }

    /// Refresh only the counter
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn refresh_count(&mut self) -> ClientResult<u64> {
        self.unread = self.client.unread_notification_count().await?;
        Ok(self.unread)
    }

    /// Open a notification: mark it read if needed and say where to go
    ///
    /// # Errors
    ///
    /// Returns an error if marking it read fails.
    pub async fn open(&mut self, id: &str) -> ClientResult<Option<NavigationTarget>> {
        let position = self.notifications.iter().position(|n| n.id == id);
        let already_read = position.is_some_and(|i| self.notifications[i].is_read);

        if !already_read {
            let updated = self.client.mark_notification_read(id).await?;
            self.unread = self.unread.saturating_sub(1);
            match position {
                Some(i) => self.notifications[i] = updated,
                None => self.notifications.push(updated),
            }
        }

        let target = self
            .notifications
            .iter()
            .find(|n| n.id == id)
            .and_then(Notification::target);
        debug!(notification_id = id, target = ?target, "Notification opened");
        Ok(target)
    }

    /// Mark everything read
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_all_read(&mut self) -> ClientResult<u64> {
        let modified = self.client.mark_all_notifications_read().await?;
        for notification in &mut self.notifications {
            notification.is_read = true;
        }
        self.unread = 0;
        Ok(modified)
    }

    /// Delete one notification
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        self.client.delete_notification(id).await?;
        if let Some(i) = self.notifications.iter().position(|n| n.id == id) {
            let removed = self.notifications.remove(i);
            if !removed.is_read {
                self.unread = self.unread.saturating_sub(1);
            }
        }
        Ok(())
    }

    /// Delete every read notification
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn clear_read(&mut self) -> ClientResult<u64> {
        let deleted = self.client.clear_read_notifications().await?;
        self.notifications.retain(|n| !n.is_read);
        Ok(deleted)
    }
}
