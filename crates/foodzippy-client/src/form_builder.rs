//! Editing the vendor onboarding form
//!
//! A [`FormBuilder`] holds the layout of one vendor type. Every mutation goes
//! to the server and is followed by a reload, so the local layout always
//! reflects what the server stored. System fields cannot be deleted or made
//! optional; those requests are refused before anything is sent.

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use foodzippy_core::form::{FieldDraft, FormField, FormLayout, VendorType, sequential_order};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActiveFlag {
    is_active: bool,
}

#[derive(Serialize)]
struct RequiredFlag {
    required: bool,
}

/// Form editor bound to one vendor type
#[derive(Debug, Clone)]
pub struct FormBuilder {
    client: ApiClient,
    vendor_types: Vec<VendorType>,
    selected: Option<String>,
    layout: FormLayout,
}

impl FormBuilder {
    /// Load the active vendor types, select the first one and its form
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    pub async fn load(client: ApiClient) -> ClientResult<Self> {
        let vendor_types = client.list_vendor_types(true).await?;
        let selected = vendor_types.first().map(|t| t.slug.clone());
        let mut builder = Self {
            client,
            vendor_types,
            selected,
            layout: FormLayout::default(),
        };
        builder.reload().await?;
        Ok(builder)
    }

    /// Active vendor types
    #[must_use]
    pub fn vendor_types(&self) -> &[VendorType] {
        &self.vendor_types
    }

    /// Slug of the selected vendor type
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Current layout
    #[must_use]
    pub const fn layout(&self) -> &FormLayout {
        &self.layout
    }

    /// Field by id in the current layout
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.layout.find_field(id)
    }

    /// Switch to another vendor type and load its form
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown slug, or the request error.
    pub async fn select(&mut self, slug: &str) -> ClientResult<()> {
        if !self.vendor_types.iter().any(|t| t.slug == slug) {
            return Err(ClientError::validation(format!(
                "Unknown vendor type '{slug}'"
            )));
        }
        self.selected = Some(slug.to_string());
        self.reload().await
    }

    /// Fetch the form of the selected vendor type again
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reload(&mut self) -> ClientResult<()> {
        let sections = self
            .client
            .form_config(None, self.selected.as_deref())
            .await?;
        self.layout = FormLayout::from_sections(sections);
        Ok(())
    }

    /// Flip a field's `isActive` flag
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn toggle_active(&mut self, field: &FormField) -> ClientResult<()> {
        let flag = ActiveFlag {
            is_active: !field.is_active,
        };
        self.client.update_field(&field.id, &flag).await?;
        info!(field_key = %field.field_key, is_active = flag.is_active, "Field toggled");
        self.reload().await
    }

    /// Flip a field's `required` flag
    ///
    /// # Errors
    ///
    /// Returns a validation error for a system field, or the request error.
    pub async fn toggle_required(&mut self, field: &FormField) -> ClientResult<()> {
        refuse_system(field, "made optional")?;
        let flag = RequiredFlag {
            required: !field.required,
        };
        self.client.update_field(&field.id, &flag).await?;
        self.reload().await
    }

    /// Delete a field
    ///
    /// # Errors
    ///
    /// Returns a validation error for a system field, or the request error.
    pub async fn delete_field(&mut self, field: &FormField) -> ClientResult<()> {
        refuse_system(field, "deleted")?;
        self.client.delete_field(&field.id).await?;
        info!(field_key = %field.field_key, "Field deleted");
        self.reload().await
    }

    /// Create a field, or update `existing` with the draft
    ///
    /// # Errors
    ///
    /// Returns a validation error for an incomplete draft, or the request
    /// error.
    pub async fn save_field(
        &mut self,
        existing: Option<&FormField>,
        draft: &FieldDraft,
    ) -> ClientResult<FormField> {
        let saved = match existing {
            Some(field) => {
                draft.validate()?;
                self.client.update_field(&field.id, draft).await?
            }
            None => self.client.create_field(draft).await?,
        };
        self.reload().await?;
        Ok(saved)
    }

    /// Move a field one position up or down within its section
    ///
    /// # Errors
    ///
    /// Returns a validation error when the field is not in the layout, or
    /// the request error.
    pub async fn move_field(&mut self, field_id: &str, up: bool) -> ClientResult<()> {
        let section = self
            .layout
            .sections()
            .find(|s| s.fields.iter().any(|f| f.id == field_id))
            .ok_or_else(|| ClientError::validation("Field not found in the current form"))?;

        let mut ids: Vec<String> = section.fields.iter().map(|f| f.id.clone()).collect();
        let Some(index) = ids.iter().position(|id| id == field_id) else {
            return Ok(());
        };
        let target = if up {
            index.checked_sub(1)
        } else {
            Some(index + 1).filter(|&i| i < ids.len())
        };
        let Some(target) = target else {
            return Ok(());
        };
        ids.swap(index, target);

        self.client.reorder_fields(&sequential_order(&ids)).await?;
        self.reload().await
    }
}

fn refuse_system(field: &FormField, action: &str) -> ClientResult<()> {
    if field.is_system_field {
        return Err(ClientError::validation(format!(
            "System field '{}' cannot be {action}",
            field.label
        )));
    }
    Ok(())
}
