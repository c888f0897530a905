//! Vendor type catalogue

use super::{required, segment};
use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::form::{NewVendorType, OrderEntry, VendorType, VendorTypeUpdate};
use foodzippy_core::types::ApiEnvelope;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

const VENDOR_TYPES: &str = "/api/vendor-types";

#[derive(Serialize)]
struct TypeOrder<'a> {
    orders: &'a [OrderEntry],
}

impl ApiClient {
    /// Vendor types, optionally only active ones
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_vendor_types(&self, active_only: bool) -> ClientResult<Vec<VendorType>> {
        let query: Vec<_> = active_only
            .then_some(("activeOnly", "true".to_string()))
            .into_iter()
            .collect();
        let envelope: ApiEnvelope<Vec<VendorType>> =
            self.get_with_query(VENDOR_TYPES, &query).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Fetch one vendor type
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the type is missing.
    pub async fn get_vendor_type(&self, id: &str) -> ClientResult<VendorType> {
        let envelope: ApiEnvelope<VendorType> = self
            .get(&format!("{VENDOR_TYPES}/{}", segment(id)))
            .await?;
        required(envelope.data, "vendor type")
    }

    /// Create a vendor type
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or slug, or the server's
    /// error.
    pub async fn create_vendor_type(&self, vendor_type: &NewVendorType) -> ClientResult<VendorType> {
        vendor_type.validate()?;
        let envelope: ApiEnvelope<VendorType> = self.post(VENDOR_TYPES, vendor_type).await?;
        let created = required(envelope.data, "vendor type")?;
        info!(slug = %created.slug, "Vendor type created");
        Ok(created)
    }

    /// Update a vendor type
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_vendor_type(
        &self,
        id: &str,
        update: &VendorTypeUpdate,
    ) -> ClientResult<VendorType> {
        let envelope: ApiEnvelope<VendorType> = self
            .put(&format!("{VENDOR_TYPES}/{}", segment(id)), update)
            .await?;
        required(envelope.data, "vendor type")
    }

    /// Delete a vendor type
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_vendor_type(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .delete(&format!("{VENDOR_TYPES}/{}", segment(id)))
            .await?;
        Ok(())
    }

    /// Persist a new display order
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reorder_vendor_types(&self, orders: &[OrderEntry]) -> ClientResult<()> {
        let _: Value = self
            .post(&format!("{VENDOR_TYPES}/reorder"), &TypeOrder { orders })
            .await?;
        Ok(())
    }
}
