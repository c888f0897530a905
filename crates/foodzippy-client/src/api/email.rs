//! Email templates, newsletter drafts and subscribers

use super::{required, segment};
use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::content::{
    DraftContent, DraftSend, EmailDraft, EmailTemplate, Subscriber, SubscriberQuery,
    SubscriberStats, SubscriberStatus, TemplateDraft,
};
use foodzippy_core::types::{Ack, ApiEnvelope};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

const TEMPLATES: &str = "/api/admin/email-templates";
const DRAFTS: &str = "/api/admin/email-drafts";
const SUBSCRIBERS: &str = "/api/admin/subscribers";

#[derive(Serialize)]
struct StatusChange {
    status: SubscriberStatus,
}

impl ApiClient {
    /// Every email template
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_email_templates(&self) -> ClientResult<Vec<EmailTemplate>> {
        let envelope: ApiEnvelope<Vec<EmailTemplate>> = self.get(TEMPLATES).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Find a template by its lookup name
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn find_email_template(&self, name: &str) -> ClientResult<Option<EmailTemplate>> {
        Ok(self
            .list_email_templates()
            .await?
            .into_iter()
            .find(|template| template.name == name))
    }

    /// Create a template
    ///
    /// # Errors
    ///
    /// Returns a validation error when name, subject or body is blank, or
    /// the server's error.
    pub async fn create_email_template(&self, draft: &TemplateDraft) -> ClientResult<EmailTemplate> {
        draft.validate()?;
        let envelope: ApiEnvelope<EmailTemplate> = self.post(TEMPLATES, draft).await?;
        let template = required(envelope.data, "email template")?;
        info!(name = %template.name, "Email template created");
        Ok(template)
    }

    /// Update a template
    ///
    /// # Errors
    ///
    /// Returns a validation error when name, subject or body is blank, or
    /// the server's error.
    pub async fn update_email_template(
        &self,
        id: &str,
        draft: &TemplateDraft,
    ) -> ClientResult<EmailTemplate> {
        draft.validate()?;
        let envelope: ApiEnvelope<EmailTemplate> = self
            .put(&format!("{TEMPLATES}/{}", segment(id)), draft)
            .await?;
        required(envelope.data, "email template")
    }

    /// Delete a template
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_email_template(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .delete(&format!("{TEMPLATES}/{}", segment(id)))
            .await?;
        Ok(())
    }

    /// Install the built-in templates the server ships with
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn seed_email_templates(&self) -> ClientResult<Ack> {
        self.post(&format!("{TEMPLATES}/seed"), &Value::Null).await
    }

    /// Every newsletter draft
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_email_drafts(&self) -> ClientResult<Vec<EmailDraft>> {
        let envelope: ApiEnvelope<Vec<EmailDraft>> = self.get(DRAFTS).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Create a draft
    ///
    /// # Errors
    ///
    /// Returns a validation error when subject or body is blank, or the
    /// server's error.
    pub async fn create_email_draft(&self, content: &DraftContent) -> ClientResult<EmailDraft> {
        content.validate()?;
        let envelope: ApiEnvelope<EmailDraft> = self.post(DRAFTS, content).await?;
        required(envelope.data, "email draft")
    }

    /// Update a draft
    ///
    /// # Errors
    ///
    /// Returns a validation error when subject or body is blank, or the
    /// server's error.
    pub async fn update_email_draft(
        &self,
        id: &str,
        content: &DraftContent,
    ) -> ClientResult<EmailDraft> {
        content.validate()?;
        let envelope: ApiEnvelope<EmailDraft> = self
            .put(&format!("{DRAFTS}/{}", segment(id)), content)
            .await?;
        required(envelope.data, "email draft")
    }

    /// Delete a draft
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_email_draft(&self, id: &str) -> ClientResult<()> {
        let _: Value = self.delete(&format!("{DRAFTS}/{}", segment(id))).await?;
        Ok(())
    }

    /// Send a draft to the chosen subscribers, or every active one
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn send_email_draft(&self, id: &str, recipients: &DraftSend) -> ClientResult<Ack> {
        let ack: Ack = self
            .post(&format!("{DRAFTS}/{}/send", segment(id)), recipients)
            .await?;
        info!(
            draft_id = id,
            recipients = recipients.subscriber_ids.as_ref().map_or(0, Vec::len),
            "Email draft sent"
        );
        Ok(ack)
    }

    /// Subscribers matching the filter
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_subscribers(&self, query: &SubscriberQuery) -> ClientResult<Vec<Subscriber>> {
        let envelope: ApiEnvelope<Vec<Subscriber>> = self
            .get_with_query(SUBSCRIBERS, &query.to_pairs())
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Subscriber totals
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn subscriber_stats(&self) -> ClientResult<SubscriberStats> {
        let envelope: ApiEnvelope<SubscriberStats> =
            self.get(&format!("{SUBSCRIBERS}/stats")).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Activate or deactivate a subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn set_subscriber_status(
        &self,
        id: &str,
        status: SubscriberStatus,
    ) -> ClientResult<()> {
        let _: Value = self
            .patch(
                &format!("{SUBSCRIBERS}/{}", segment(id)),
                &StatusChange { status },
            )
            .await?;
        Ok(())
    }

    /// Delete a subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_subscriber(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .delete(&format!("{SUBSCRIBERS}/{}", segment(id)))
            .await?;
        Ok(())
    }

    /// Every subscriber as CSV
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn export_subscribers(&self) -> ClientResult<String> {
        self.get_text(&format!("{SUBSCRIBERS}/export")).await
    }
}
