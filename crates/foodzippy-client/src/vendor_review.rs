//! Approving and rejecting vendor sign-ups, and recording payment status

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use foodzippy_core::payment::{PaymentStatusOutcome, PaymentStatusSelection};
use foodzippy_core::vendor::{ReviewAction, Vendor};
use tracing::{debug, info};

/// Apply a review action to a vendor and replace it with the server's copy
///
/// Only pending vendors can be reviewed; afterwards
/// [`Vendor::review_actions`] is empty.
///
/// # Errors
///
/// Returns a validation error when the vendor is not awaiting review, or the
/// request error.
pub async fn review_vendor(
    client: &ApiClient,
    vendor: &mut Vendor,
    action: ReviewAction,
) -> ClientResult<()> {
    if !vendor.review_actions().contains(&action) {
        return Err(ClientError::validation(format!(
            "Vendor '{}' is {} and cannot be reviewed",
            vendor.restaurant_name, vendor.restaurant_status
        )));
    }

    let target = action.target_status();
    *vendor = client.set_vendor_status(&vendor.id, target).await?;
    info!(vendor_id = %vendor.id, status = %vendor.restaurant_status, "Vendor reviewed");
    Ok(())
}

/// Send a payment status selection and merge the result into `vendor`
///
/// The echoed payment fields replace the local ones. Without an echo the
/// vendor is fetched again.
///
/// # Errors
///
/// Returns a validation error without contacting the server when the
/// selection is incomplete, or the request error.
pub async fn record_payment_status(
    client: &ApiClient,
    vendor: &mut Vendor,
    selection: PaymentStatusSelection,
) -> ClientResult<PaymentStatusOutcome> {
    let outcome = client
        .update_vendor_payment_status(&vendor.id, selection)
        .await?;
    match &outcome.vendor {
        Some(state) => vendor.apply_payment_state(state),
        None => {
            debug!(vendor_id = %vendor.id, "No vendor echoed, reloading");
            *vendor = client.get_vendor(&vendor.id).await?;
        }
    }
    Ok(outcome)
}
