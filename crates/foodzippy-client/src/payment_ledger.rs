//! Per-agent payment ledger

use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::payment::{AgentPaymentDetails, MarkPaidRequest};
use tracing::info;

/// One agent's payments, kept in sync with the server after each change
#[derive(Debug, Clone)]
pub struct PaymentLedger {
    client: ApiClient,
    agent_id: String,
    details: AgentPaymentDetails,
}

impl PaymentLedger {
    /// Load the ledger of `agent_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn load(client: ApiClient, agent_id: &str) -> ClientResult<Self> {
        let details = client.agent_payment_details(agent_id).await?;
        Ok(Self {
            client,
            agent_id: agent_id.to_string(),
            details,
        })
    }

    /// Profile, payments and statistics as last loaded
    #[must_use]
    pub const fn details(&self) -> &AgentPaymentDetails {
        &self.details
    }

    /// Sum still owed to the agent
    #[must_use]
    pub const fn pending_total(&self) -> f64 {
        self.details.stats.pending
    }

    /// Fetch the ledger again
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reload(&mut self) -> ClientResult<()> {
        self.details = self.client.agent_payment_details(&self.agent_id).await?;
        Ok(())
    }

    /// Settle every pending payment of the agent
    ///
    /// Returns the number of payments the server changed. Nothing is sent
    /// when there is nothing pending.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    pub async fn mark_all_paid(&mut self) -> ClientResult<u64> {
        if self.details.pending_payments().next().is_none() {
            return Ok(0);
        }
        let modified = self
            .client
            .mark_payments_paid(&MarkPaidRequest::for_agent(self.agent_id.as_str()))
            .await?;
        info!(agent_id = %self.agent_id, modified, "Agent payments settled");
        self.reload().await?;
        Ok(modified)
    }

    /// Settle selected payments
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    pub async fn mark_paid(&mut self, payment_ids: Vec<String>) -> ClientResult<u64> {
        let modified = self
            .client
            .mark_payments_paid(&MarkPaidRequest::for_payments(payment_ids))
            .await?;
        self.reload().await?;
        Ok(modified)
    }

    /// Number of payments still pending
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.details.pending_payments().count()
    }
}
