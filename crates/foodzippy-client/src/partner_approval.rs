//! Delivery partner approval against a backend that may be asleep
//!
//! Preparing an approval pings the backend so it starts waking up, and loads
//! the stored approval email, falling back to the built-in text. Submitting
//! retries only when the backend cannot be reached.

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::retry::with_network_retry;
use foodzippy_core::config::RetryConfig;
use foodzippy_core::content::{ApprovalResult, PARTNER_APPROVAL_TEMPLATE, PartnerApproval};
use tracing::{debug, warn};

/// Shown when every attempt failed to reach the backend
pub const UNREACHABLE_MESSAGE: &str =
    "it may be starting up, please wait 30 seconds and try again";

/// Wake the backend and build the approval from the stored template
///
/// Neither the ping nor the template lookup can fail this call; the
/// built-in email is used when the template is unavailable.
pub async fn prepare_approval(client: &ApiClient, login_id: &str, password: &str) -> PartnerApproval {
    if let Err(err) = client.ping().await {
        debug!(error = %err, "Warm-up ping failed");
    }

    let template = match client.find_email_template(PARTNER_APPROVAL_TEMPLATE).await {
        Ok(template) => template,
        Err(err) => {
            warn!(error = %err, "Approval template unavailable, using built-in text");
            None
        }
    };
    PartnerApproval::new(login_id, password, template.as_ref())
}

/// Submit an approval, retrying while the backend is unreachable
///
/// # Errors
///
/// Returns a validation error without contacting the server when the
/// credentials are blank, the server's error as soon as it answers with
/// one, or a network error carrying [`UNREACHABLE_MESSAGE`] once the
/// attempts are used up.
pub async fn submit_approval(
    client: &ApiClient,
    retry: &RetryConfig,
    partner_id: &str,
    approval: &PartnerApproval,
) -> ClientResult<ApprovalResult> {
    approval.check()?;

    let result = with_network_retry(retry, "approve delivery partner", |attempt| {
        if attempt > 1 {
            debug!(attempt, max_attempts = retry.max_attempts, "Retrying approval");
        }
        client.approve_delivery_partner(partner_id, approval)
    })
    .await;

    match result {
        Err(err) if err.is_network() => Err(ClientError::network(UNREACHABLE_MESSAGE)),
        other => other,
    }
}

/// Prepare and submit in one go
///
/// # Errors
///
/// See [`submit_approval`].
pub async fn approve_partner(
    client: &ApiClient,
    retry: &RetryConfig,
    partner_id: &str,
    login_id: &str,
    password: &str,
) -> ClientResult<ApprovalResult> {
    let approval = PartnerApproval::new(login_id, password, None);
    approval.check()?;

    let approval = prepare_approval(client, login_id, password).await;
    let result = submit_approval(client, retry, partner_id, &approval).await?;
    if !result.email_delivered() {
        warn!(partner_id, "Approved but the credential email was not sent");
    }
    Ok(result)
}
