//! Vendor listing, review and listing charges

use super::{required, segment};
use crate::client::ApiClient;
use crate::error::ClientResult;
use foodzippy_core::types::{ApiEnvelope, CountPayload, ModifiedCount, Pagination};
use foodzippy_core::vendor::{
    AgentVendorQuery, ListingChange, ListingType, Vendor, VendorAnalytics, VendorPage,
    VendorQuery, VendorStatus,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

const VENDORS: &str = "/api/admin/vendors";

#[derive(Deserialize)]
struct RawVendorPage {
    #[serde(default, alias = "vendors")]
    data: Vec<Value>,
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    statistics: Option<Value>,
}

impl RawVendorPage {
    fn normalize(self) -> VendorPage {
        let vendors = Vendor::from_raw_list(self.data);
        let pagination = self.pagination.unwrap_or(Pagination {
            total: vendors.len() as u64,
            ..Pagination::default()
        });
        VendorPage {
            vendors,
            pagination,
            statistics: self.statistics,
        }
    }
}

impl ApiClient {
    /// List vendors
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Vendors that cannot be normalized are skipped.
    pub async fn list_vendors(&self, query: &VendorQuery) -> ClientResult<VendorPage> {
        let raw: RawVendorPage = self.get_with_query(VENDORS, &query.to_pairs()).await?;
        Ok(raw.normalize())
    }

    /// List vendors registered by one agent or employee
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Vendors that cannot be normalized are skipped.
    pub async fn list_agent_vendors(
        &self,
        agent_id: &str,
        query: &AgentVendorQuery,
    ) -> ClientResult<VendorPage> {
        let raw: RawVendorPage = self
            .get_with_query(VENDORS, &query.to_pairs(agent_id))
            .await?;
        Ok(raw.normalize())
    }

    /// Fetch one vendor
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the vendor is missing.
    pub async fn get_vendor(&self, id: &str) -> ClientResult<Vendor> {
        let envelope: ApiEnvelope<Value> =
            self.get(&format!("{VENDORS}/{}", segment(id))).await?;
        Ok(Vendor::from_raw(required(envelope.data, "vendor")?)?)
    }

    /// Patch arbitrary vendor fields
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the updated vendor is missing.
    pub async fn update_vendor(&self, id: &str, changes: &Value) -> ClientResult<Vendor> {
        let envelope: ApiEnvelope<Value> = self
            .patch(&format!("{VENDORS}/{}", segment(id)), changes)
            .await?;
        Ok(Vendor::from_raw(required(envelope.data, "vendor")?)?)
    }

    /// Move a vendor to a review status
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn set_vendor_status(&self, id: &str, status: VendorStatus) -> ClientResult<Vendor> {
        let vendor = self
            .update_vendor(id, &json!({ "restaurantStatus": status }))
            .await?;
        info!(vendor_id = id, status = %status, "Vendor status changed");
        Ok(vendor)
    }

    /// Dashboard analytics
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn vendor_analytics(&self) -> ClientResult<VendorAnalytics> {
        let envelope: ApiEnvelope<VendorAnalytics> =
            self.get(&format!("{VENDORS}/analytics")).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Vendor registrations not yet seen by an administrator
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unread_vendor_requests(&self) -> ClientResult<u64> {
        let payload: CountPayload = self.get(&format!("{VENDORS}/unread-count")).await?;
        Ok(payload.count)
    }

    /// Mark every vendor registration as seen
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_vendor_requests_seen(&self) -> ClientResult<u64> {
        let payload: ModifiedCount = self.patch_empty(&format!("{VENDORS}/mark-seen")).await?;
        Ok(payload.modified_count)
    }

    /// Vendors on one listing tier
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn vendors_by_listing(
        &self,
        listing_type: ListingType,
        limit: u32,
    ) -> ClientResult<VendorPage> {
        let raw: RawVendorPage = self
            .get_with_query(
                &format!("{VENDORS}/listing/{listing_type}"),
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(raw.normalize())
    }

    /// Number of vendors on each listing tier
    ///
    /// # Errors
    ///
    /// Returns an error if any of the requests fails.
    pub async fn listing_counts(&self) -> ClientResult<Vec<(ListingType, u64)>> {
        let (launching, vip, normal) = tokio::try_join!(
            self.vendors_by_listing(ListingType::Launching, 1),
            self.vendors_by_listing(ListingType::Vip, 1),
            self.vendors_by_listing(ListingType::Normal, 1),
        )?;
        Ok(vec![
            (ListingType::Launching, launching.pagination.total),
            (ListingType::Vip, vip.pagination.total),
            (ListingType::Normal, normal.pagination.total),
        ])
    }

    /// Set the listing charge, then the tier
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    pub async fn update_listing(&self, id: &str, change: ListingChange) -> ClientResult<()> {
        let path = format!("{VENDORS}/{}", segment(id));
        let _: Value = self
            .put(
                &format!("{path}/listing-charge"),
                &json!({ "listingCharge": change.listing_charge }),
            )
            .await?;
        let _: Value = self
            .patch(&path, &json!({ "listingType": change.listing_type }))
            .await?;
        info!(
            vendor_id = id,
            listing_type = %change.listing_type,
            listing_charge = change.listing_charge,
            "Listing updated"
        );
        Ok(())
    }
}
