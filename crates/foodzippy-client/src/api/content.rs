//! Career applications, franchise inquiries and delivery partner sign-ups

use super::{required, segment};
use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::content::{
    ApprovalResult, CareerApplication, CareerStatus, DeliveryPartner, FranchiseInquiry,
    FranchiseStatus, PartnerApproval, PartnerQuery, ReviewUpdate,
};
use foodzippy_core::types::{Ack, ApiEnvelope, Paginated, StatusCounts};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

const CAREERS: &str = "/api/admin/careers";
const FRANCHISE: &str = "/api/admin/franchise-inquiries";
const PARTNERS: &str = "/api/admin/delivery-partners";

#[derive(Serialize)]
struct Rejection<'a> {
    reason: &'a str,
}

impl ApiClient {
    /// Every career application
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_career_applications(&self) -> ClientResult<Vec<CareerApplication>> {
        let envelope: ApiEnvelope<Vec<CareerApplication>> = self.get(CAREERS).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Set status and notes of a career application
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or nothing is returned.
    pub async fn update_career_application(
        &self,
        id: &str,
        update: &ReviewUpdate<CareerStatus>,
    ) -> ClientResult<CareerApplication> {
        let envelope: ApiEnvelope<CareerApplication> = self
            .patch(&format!("{CAREERS}/{}", segment(id)), update)
            .await?;
        required(envelope.data, "career application")
    }

    /// Delete a career application
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_career_application(&self, id: &str) -> ClientResult<()> {
        let _: Value = self.delete(&format!("{CAREERS}/{}", segment(id))).await?;
        Ok(())
    }

    /// Every franchise inquiry
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_franchise_inquiries(&self) -> ClientResult<Vec<FranchiseInquiry>> {
        let envelope: ApiEnvelope<Vec<FranchiseInquiry>> = self.get(FRANCHISE).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Set status and notes of a franchise inquiry
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or nothing is returned.
    pub async fn update_franchise_inquiry(
        &self,
        id: &str,
        update: &ReviewUpdate<FranchiseStatus>,
    ) -> ClientResult<FranchiseInquiry> {
        let envelope: ApiEnvelope<FranchiseInquiry> = self
            .patch(&format!("{FRANCHISE}/{}", segment(id)), update)
            .await?;
        required(envelope.data, "franchise inquiry")
    }

    /// Delete a franchise inquiry
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_franchise_inquiry(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .delete(&format!("{FRANCHISE}/{}", segment(id)))
            .await?;
        Ok(())
    }

    /// One page of delivery partner applications
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_delivery_partners(
        &self,
        query: &PartnerQuery,
    ) -> ClientResult<Paginated<DeliveryPartner>> {
        self.get_with_query(PARTNERS, &query.to_pairs()).await
    }

    /// Application counts per status
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delivery_partner_stats(&self) -> ClientResult<StatusCounts> {
        let envelope: ApiEnvelope<StatusCounts> =
            self.get(&format!("{PARTNERS}/stats")).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Approve an application and send the login credentials by email
    ///
    /// A single attempt; [`crate::partner_approval`] adds the warm-up and
    /// retries.
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the server when the
    /// login id or password is blank, or the server's error.
    pub async fn approve_delivery_partner(
        &self,
        id: &str,
        approval: &PartnerApproval,
    ) -> ClientResult<ApprovalResult> {
        approval.check()?;
        let result: ApprovalResult = self
            .patch(&format!("{PARTNERS}/{}/approve", segment(id)), approval)
            .await?;
        info!(
            partner_id = id,
            email_sent = result.email_delivered(),
            "Delivery partner approved"
        );
        Ok(result)
    }

    /// Reject an application with an optional reason
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reject_delivery_partner(&self, id: &str, reason: &str) -> ClientResult<Ack> {
        let ack: Ack = self
            .patch(
                &format!("{PARTNERS}/{}/reject", segment(id)),
                &Rejection {
                    reason: reason.trim(),
                },
            )
            .await?;
        info!(partner_id = id, "Delivery partner rejected");
        Ok(ack)
    }

    /// Delete an application
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_delivery_partner(&self, id: &str) -> ClientResult<()> {
        let _: Value = self.delete(&format!("{PARTNERS}/{}", segment(id))).await?;
        Ok(())
    }
}
