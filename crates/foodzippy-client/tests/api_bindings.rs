//! Endpoint bindings: paths, query strings and envelope handling

mod common;

use common::*;
use foodzippy_client::{BadgePoller, ClientError};
use foodzippy_core::content::{SubscriberQuery, SubscriberStatus, TemplateDraft};
use foodzippy_core::payment::{
    CategoryRates, PaymentCategory, PaymentQuery, PaymentType, SettlementStatus,
};
use foodzippy_core::vendor::{ListingChange, ListingType, VendorQuery, VendorStatus};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_vendor_list_sends_filters_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/vendors"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("status", "pending"))
        .and(query_param("search", "spice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [vendor_json("v1", "pending")],
            "pagination": {"page": 1, "limit": 10, "total": 1, "pages": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let query = VendorQuery {
        status: Some(VendorStatus::Pending),
        search: Some("spice".to_string()),
        ..VendorQuery::default()
    };
    let page = client.list_vendors(&query).await.unwrap();

    assert_eq!(page.vendors.len(), 1);
    assert_eq!(page.vendors[0].id, "v1");
    assert_eq!(page.vendors[0].city.as_deref(), Some("Pune"));
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/vendors/v404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Vendor not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/vendors/v500"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = signed_in_client(&server);

    let err = client.get_vendor("v404").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "Vendor not found");

    let err = client.get_vendor("v500").await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed");
}

#[tokio::test]
async fn test_listing_counts_use_pagination_totals() {
    let server = MockServer::start().await;
    for (tier, total) in [("launching", 4), ("vip", 2), ("normal", 11)] {
        Mock::given(method("GET"))
            .and(path(format!("/api/admin/vendors/listing/{tier}")))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [],
                "pagination": {"page": 1, "limit": 1, "total": total, "pages": total}
            })))
            .mount(&server)
            .await;
    }

    let client = signed_in_client(&server);
    let counts = client.listing_counts().await.unwrap();

    assert_eq!(
        counts,
        vec![
            (ListingType::Launching, 4),
            (ListingType::Vip, 2),
            (ListingType::Normal, 11)
        ]
    );
}

#[tokio::test]
async fn test_launching_listing_resets_charge() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/vendors/v1/listing-charge"))
        .and(body_json(json!({"listingCharge": 0.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/vendors/v1"))
        .and(body_json(json!({"listingType": "launching"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    client
        .update_listing("v1", ListingChange::new(ListingType::Launching, 499.0))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_payment_estimate_follows_server_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/admin/payment-config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "config": {
                "_id": "cfg",
                "categories": {"A": {"visit": 50, "followup": 30, "onboarding": 200}}
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/payments/admin/payment-config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Saved",
            "config": {
                "_id": "cfg",
                "categories": {"A": {"visit": 50, "followup": 30, "onboarding": 350}}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let mut config = client.payment_config().await.unwrap();
    let onboarded = foodzippy_core::payment::estimate_payment(
        &config,
        PaymentCategory::A,
        foodzippy_core::VisitStatus::VisitedOnboarded,
    )
    .unwrap();
    assert_eq!(onboarded.payment_type, PaymentType::Onboarding);
    assert!((onboarded.amount - 200.0).abs() < f64::EPSILON);

    config.set_rates(
        PaymentCategory::A,
        CategoryRates {
            visit: 50.0,
            followup: 30.0,
            onboarding: 350.0,
        },
    );
    let saved = client.update_payment_config(&config.to_update()).await.unwrap();
    let onboarded = foodzippy_core::payment::estimate_payment(
        &saved,
        PaymentCategory::A,
        foodzippy_core::VisitStatus::VisitedOnboarded,
    )
    .unwrap();
    assert!((onboarded.amount - 350.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_agent_totals_send_status_and_month() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/admin/payments/by-agent"))
        .and(query_param("status", "pending"))
        .and(query_param("startDate", "2025-03-01T00:00:00+00:00"))
        .and(query_param("endDate", "2025-03-31T23:59:59+00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "agents": [{
                "_id": "a1",
                "agentName": "Ravi",
                "totalAmount": 250,
                "vendorCount": 3,
                "pendingAmount": 250,
                "paidAmount": 0
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let query = PaymentQuery {
        status: Some(SettlementStatus::Pending),
        ..PaymentQuery::default()
    }
    .for_month(2025, 3)
    .unwrap();
    let agents = client.payments_by_agent(&query).await.unwrap();

    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].agent_name, "Ravi");
    assert!((agents[0].pending_amount - 250.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_incomplete_template_is_refused() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let draft = TemplateDraft {
        name: "welcome".to_string(),
        subject: String::new(),
        body: "Hello".to_string(),
        variables: Vec::new(),
    };
    let err = client.create_email_template(&draft).await.unwrap_err();
    assert_eq!(err.to_string(), "Name, subject and body are required");
}

#[tokio::test]
async fn test_subscribers_list_and_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/subscribers"))
        .and(query_param("status", "active"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"_id": "s1", "email": "a@example.com", "status": "active", "source": "website"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/subscribers/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string("email,status\na@example.com,active\n"),
        )
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let query = SubscriberQuery {
        limit: Some(500),
        status: Some(SubscriberStatus::Active),
    };
    let subscribers = client.list_subscribers(&query).await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].status.toggled(), SubscriberStatus::Inactive);

    let csv = client.export_subscribers().await.unwrap();
    assert!(csv.starts_with("email,status"));
}

#[tokio::test]
async fn test_poller_publishes_counts_and_keeps_failed_ones() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/unread-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 3})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/edit-requests/unread-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/vendors/unread-count"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let poller = BadgePoller::spawn_every(client, Duration::from_secs(60));
    let mut updates = poller.subscribe();

    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("first refresh published")
        .unwrap();

    let counts = poller.current();
    assert_eq!(counts.notifications, 3);
    assert_eq!(counts.edit_requests, 1);
    assert_eq!(counts.vendor_requests, 0);
}
