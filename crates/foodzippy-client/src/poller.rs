//! Background refresh of the sidebar badge counters
//!
//! [`BadgePoller::spawn`] fetches the three unread counters right away and
//! then on every tick, publishing a [`BadgeCounts`] snapshot on a watch
//! channel. A failed fetch leaves that counter at its previous value.
//! Dropping the poller stops the task.

use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::config::PollingConfig;
use foodzippy_core::notification::BadgeCounts;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Handle to the running poll task
#[derive(Debug)]
pub struct BadgePoller {
    receiver: watch::Receiver<BadgeCounts>,
    task: JoinHandle<()>,
}

impl BadgePoller {
    /// Start polling with the configured interval
    #[must_use]
    pub fn spawn(client: ApiClient, polling: &PollingConfig) -> Self {
        Self::spawn_every(client, polling.interval())
    }

    /// Start polling every `period`
    #[must_use]
    pub fn spawn_every(client: ApiClient, period: Duration) -> Self {
        let (sender, receiver) = watch::channel(BadgeCounts::default());

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let previous = *sender.borrow();
                let counts = refresh(&client, previous).await;
                if counts != previous {
                    debug!(
                        notifications = counts.notifications,
                        edit_requests = counts.edit_requests,
                        vendor_requests = counts.vendor_requests,
                        "Badge counts changed"
                    );
                }
                if sender.send(counts).is_err() {
                    break;
                }
            }
        });

        Self { receiver, task }
    }

    /// Latest snapshot
    #[must_use]
    pub fn current(&self) -> BadgeCounts {
        *self.receiver.borrow()
    }

    /// A receiver that is notified on every refresh
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BadgeCounts> {
        self.receiver.clone()
    }
}

impl Drop for BadgePoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn refresh(client: &ApiClient, previous: BadgeCounts) -> BadgeCounts {
    let (notifications, edit_requests, vendor_requests) = tokio::join!(
        client.unread_notification_count(),
        client.unread_edit_requests(),
        client.unread_vendor_requests(),
    );

    BadgeCounts {
        notifications: keep_on_error("notifications", notifications, previous.notifications),
        edit_requests: keep_on_error("edit requests", edit_requests, previous.edit_requests),
        vendor_requests: keep_on_error(
            "vendor requests",
            vendor_requests,
            previous.vendor_requests,
        ),
    }
}

fn keep_on_error(counter: &str, result: ClientResult<u64>, previous: u64) -> u64 {
    result.unwrap_or_else(|err| {
        warn!(counter, error = %err, "Failed to refresh badge count");
        previous
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_refresh_keeps_previous() {
        assert_eq!(keep_on_error("n", Err(ClientError::network("down")), 7), 7);
        assert_eq!(keep_on_error("n", Ok(3), 7), 3);
    }
}
