//! Form configuration: sections, fields and their order

use super::{required, segment};
use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::form::{FieldDraft, FormField, FormSection, OrderEntry, SectionDraft};
use foodzippy_core::types::{ApiEnvelope, Role};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

const FORM: &str = "/api/form";

#[derive(Serialize)]
struct FieldOrder<'a> {
    fields: &'a [OrderEntry],
}

impl ApiClient {
    /// Sections with their fields, filtered by audience and vendor type
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn form_config(
        &self,
        visible_to: Option<Role>,
        vendor_type: Option<&str>,
    ) -> ClientResult<Vec<FormSection>> {
        let mut query = Vec::new();
        if let Some(role) = visible_to {
            query.push(("visibleTo", role.to_string()));
        }
        if let Some(slug) = vendor_type {
            query.push(("vendorType", slug.to_string()));
        }
        let envelope: ApiEnvelope<Vec<FormSection>> = self
            .get_with_query(&format!("{FORM}/config"), &query)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Every section, active or not
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_sections(&self) -> ClientResult<Vec<FormSection>> {
        let envelope: ApiEnvelope<Vec<FormSection>> =
            self.get(&format!("{FORM}/sections")).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Create a section
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing key or label, or the
    /// server's error.
    pub async fn create_section(&self, draft: &SectionDraft) -> ClientResult<FormSection> {
        draft.validate()?;
        let envelope: ApiEnvelope<FormSection> =
            self.post(&format!("{FORM}/sections"), draft).await?;
        let section = required(envelope.data, "section")?;
        info!(section_key = %section.section_key, "Section created");
        Ok(section)
    }

    /// Update section attributes
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_section(&self, id: &str, changes: &Value) -> ClientResult<FormSection> {
        let envelope: ApiEnvelope<FormSection> = self
            .put(&format!("{FORM}/sections/{}", segment(id)), changes)
            .await?;
        required(envelope.data, "section")
    }

    /// Delete a section
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_section(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .delete(&format!("{FORM}/sections/{}", segment(id)))
            .await?;
        info!(section_id = id, "Section deleted");
        Ok(())
    }

    /// Fetch one field
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the field is missing.
    pub async fn get_field(&self, id: &str) -> ClientResult<FormField> {
        let envelope: ApiEnvelope<FormField> = self
            .get(&format!("{FORM}/fields/{}", segment(id)))
            .await?;
        required(envelope.data, "field")
    }

    /// Create a field
    ///
    /// # Errors
    ///
    /// Returns a validation error for a draft without label, key or section,
    /// or the server's error.
    pub async fn create_field(&self, draft: &FieldDraft) -> ClientResult<FormField> {
        draft.validate()?;
        let envelope: ApiEnvelope<FormField> = self.post(&format!("{FORM}/fields"), draft).await?;
        required(envelope.data, "field")
    }

    /// Update field attributes
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_field<B>(&self, id: &str, changes: &B) -> ClientResult<FormField>
    where
        B: Serialize + ?Sized + Sync,
    {
        let envelope: ApiEnvelope<FormField> = self
            .put(&format!("{FORM}/fields/{}", segment(id)), changes)
            .await?;
        required(envelope.data, "field")
    }

    /// Delete a field
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_field(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .delete(&format!("{FORM}/fields/{}", segment(id)))
            .await?;
        Ok(())
    }

    /// Persist new field positions
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reorder_fields(&self, fields: &[OrderEntry]) -> ClientResult<()> {
        let _: Value = self
            .post(&format!("{FORM}/fields/reorder"), &FieldOrder { fields })
            .await?;
        Ok(())
    }
}
