//! Payment rates, vendor payment status and agent payouts

use super::{required, segment};
use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::payment::{
    AgentPaymentDetails, AgentPaymentSummary, MarkPaidRequest, Payment, PaymentConfig,
    PaymentConfigUpdate, PaymentList, PaymentQuery, PaymentStatusOutcome, PaymentStatusSelection,
    PaymentUpdate,
};
use foodzippy_core::types::ModifiedCount;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

const PAYMENTS_ADMIN: &str = "/api/payments/admin";

#[derive(Deserialize)]
struct ConfigPayload {
    #[serde(default)]
    config: Option<PaymentConfig>,
}

#[derive(Deserialize)]
struct AgentSummaries {
    #[serde(default)]
    agents: Vec<AgentPaymentSummary>,
}

#[derive(Deserialize)]
struct PaymentPayload {
    #[serde(default)]
    payment: Option<Payment>,
}

impl ApiClient {
    /// Current payment rate table
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no table is returned.
    pub async fn payment_config(&self) -> ClientResult<PaymentConfig> {
        let payload: ConfigPayload = self
            .get(&format!("{PAYMENTS_ADMIN}/payment-config"))
            .await?;
        required(payload.config, "payment config")
    }

    /// Replace the payment rate table
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_payment_config(
        &self,
        update: &PaymentConfigUpdate,
    ) -> ClientResult<PaymentConfig> {
        let payload: ConfigPayload = self
            .put(&format!("{PAYMENTS_ADMIN}/payment-config"), update)
            .await?;
        info!(categories = update.categories.len(), "Payment config saved");
        required(payload.config, "payment config")
    }

    /// Record a vendor's payment category and visit status
    ///
    /// The selection is checked locally first; the server decides whether a
    /// payment is created and for how much.
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the server when the
    /// category or visit status is missing, or the server's error.
    pub async fn update_vendor_payment_status(
        &self,
        vendor_id: &str,
        selection: PaymentStatusSelection,
    ) -> ClientResult<PaymentStatusOutcome> {
        let request = selection.into_request()?;
        let outcome: PaymentStatusOutcome = self
            .patch(
                &format!("{PAYMENTS_ADMIN}/vendors/{}/payment-status", segment(vendor_id)),
                &request,
            )
            .await?;
        info!(
            vendor_id,
            visit_status = %request.visit_status,
            payment_created = outcome.payment_created.unwrap_or(false),
            "Vendor payment status updated"
        );
        Ok(outcome)
    }

    /// Payment records matching the filter, with totals
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_payments(&self, query: &PaymentQuery) -> ClientResult<PaymentList> {
        self.get_with_query(&format!("{PAYMENTS_ADMIN}/payments"), &query.to_pairs())
            .await
    }

    /// Payment totals per agent
    ///
    /// Only the status and date range of `query` narrow the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn payments_by_agent(
        &self,
        query: &PaymentQuery,
    ) -> ClientResult<Vec<AgentPaymentSummary>> {
        let summaries: AgentSummaries = self
            .get_with_query(&format!("{PAYMENTS_ADMIN}/payments/by-agent"), &query.to_pairs())
            .await?;
        Ok(summaries.agents)
    }

    /// One agent's profile, payments and statistics
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn agent_payment_details(&self, agent_id: &str) -> ClientResult<AgentPaymentDetails> {
        self.get(&format!("{PAYMENTS_ADMIN}/payments/agent/{}", segment(agent_id)))
            .await
    }

    /// Mark payments as paid, either by id or every pending one of an agent
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_payments_paid(&self, request: &MarkPaidRequest) -> ClientResult<u64> {
        let result: ModifiedCount = self
            .patch(&format!("{PAYMENTS_ADMIN}/payments/mark-paid"), request)
            .await?;
        info!(modified = result.modified_count, "Payments marked paid");
        Ok(result.modified_count)
    }

    /// Edit a payment record
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no record is returned.
    pub async fn update_payment(&self, id: &str, update: &PaymentUpdate) -> ClientResult<Payment> {
        let payload: PaymentPayload = self
            .put(&format!("{PAYMENTS_ADMIN}/payments/{}", segment(id)), update)
            .await?;
        required(payload.payment, "payment")
    }

    /// Delete a payment record
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_payment(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .delete(&format!("{PAYMENTS_ADMIN}/payments/{}", segment(id)))
            .await?;
        debug!(payment_id = id, "Payment deleted");
        Ok(())
    }
}
