//! Shared helpers for the client integration tests

#![allow(dead_code)]

use foodzippy_client::{ApiClient, AuthContext, MemorySessionStore, SessionStore};
use foodzippy_core::config::RetryConfig;
use serde_json::{Value, json};
use std::sync::{Arc, Once};
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Route test logs through the test writer
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Bearer token the mocks expect
pub const TOKEN: &str = "test-token";

/// Client pointed at `server`, already signed in
pub fn signed_in_client(server: &MockServer) -> ApiClient {
    init_test_logging();
    ApiClient::new(server.uri())
        .expect("client builds")
        .with_token(TOKEN)
}

/// Client pointed at a port nothing listens on
pub fn unreachable_client() -> ApiClient {
    init_test_logging();
    ApiClient::new("http://127.0.0.1:9").expect("client builds")
}

/// Three attempts without waiting
pub const fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        delay_ms: 1,
    }
}

/// Auth context over an in-memory store, returned with the store
pub fn auth_context(client: ApiClient) -> (AuthContext, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let shared: Arc<dyn SessionStore> = store.clone();
    (AuthContext::new(client, shared, fast_retry()), store)
}

/// Raw vendor document as the server returns it
pub fn vendor_json(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "restaurantName": "Spice Route",
        "restaurantStatus": status,
        "formData": {"city": "Pune"},
        "createdAt": "2025-03-01T10:00:00.000Z"
    })
}

/// Form field document
pub fn field_json(id: &str, is_active: bool, is_system: bool) -> Value {
    json!({
        "_id": id,
        "section": "basic",
        "sectionLabel": "Basic details",
        "label": "Restaurant name",
        "fieldKey": "restaurantName",
        "fieldType": "text",
        "required": true,
        "order": 1,
        "visibleTo": ["agent", "employee"],
        "isActive": is_active,
        "isSystemField": is_system
    })
}

/// Form config response holding one section with `field`
pub fn form_config_json(field: Value) -> Value {
    json!({
        "success": true,
        "data": [{
            "_id": "s1",
            "sectionKey": "basic",
            "sectionLabel": "Basic details",
            "order": 1,
            "stepNumber": 1,
            "isActive": true,
            "fields": [field]
        }]
    })
}

/// Notification document
pub fn notification_json(id: &str, is_read: bool, vendor_status: &str) -> Value {
    json!({
        "_id": id,
        "type": "status_update",
        "vendorId": {"_id": "v1", "restaurantName": "Spice Route"},
        "updatedBy": {"userId": "u1", "userName": "Ravi", "userRole": "agent"},
        "title": "Vendor updated",
        "message": "Spice Route moved to follow-up",
        "vendorDetails": {"restaurantName": "Spice Route", "restaurantStatus": vendor_status},
        "isRead": is_read,
        "createdAt": "2025-03-01T10:00:00.000Z"
    })
}

/// Payment document
pub fn payment_json(id: &str, status: &str, amount: f64) -> Value {
    json!({
        "_id": id,
        "agentId": "a1",
        "agentName": "Ravi",
        "vendorId": "v1",
        "vendorName": "Spice Route",
        "category": "A",
        "paymentType": "visit",
        "amount": amount,
        "paymentStatus": status
    })
}

/// Agent ledger with the given payments
pub fn agent_details_json(payments: &[Value], pending: f64, paid: f64) -> Value {
    json!({
        "success": true,
        "agent": {"_id": "a1", "name": "Ravi", "isActive": true},
        "payments": payments,
        "stats": {"total": pending + paid, "pending": pending, "paid": paid, "totalVendors": 1}
    })
}
