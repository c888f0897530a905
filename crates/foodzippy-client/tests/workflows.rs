//! Console workflows driven against a mock backend

mod common;

use common::*;
use foodzippy_client::partner_approval::{self, UNREACHABLE_MESSAGE};
use foodzippy_client::vendor_review::{record_payment_status, review_vendor};
use foodzippy_client::{ClientError, FormBuilder, Inbox, PaymentLedger};
use foodzippy_core::NavigationTarget;
use foodzippy_core::payment::{PaymentCategory, PaymentStatusSelection, VisitStatus};
use foodzippy_core::staff::{NewAgent, NewStaffUser};
use foodzippy_core::types::Role;
use foodzippy_core::vendor::{ReviewAction, Vendor, VendorStatus};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn expect_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_user_without_required_fields_sends_nothing() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let client = signed_in_client(&server);

    let user = NewStaffUser::new("", "ravi", "", Role::Agent);
    let err = client.create_user(&user).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));

    let agent = NewAgent {
        name: "Ravi".to_string(),
        username: String::new(),
        password: String::new(),
    };
    let err = client.create_agent(&agent).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
}

#[tokio::test]
async fn test_incomplete_payment_selection_sends_nothing() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let client = signed_in_client(&server);

    let selection = PaymentStatusSelection {
        category: Some(PaymentCategory::A),
        visit_status: None,
        ..PaymentStatusSelection::default()
    };
    let err = client
        .update_vendor_payment_status("v1", selection)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Please select both category and visit status");
}

#[tokio::test]
async fn test_payment_status_merges_into_vendor() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/payments/admin/vendors/v1/payment-status"))
        .and(body_partial_json(json!({
            "paymentCategory": "A",
            "visitStatus": "visited-onboarded"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "vendor": {
                "paymentCategory": "A",
                "visitStatus": "visited-onboarded",
                "totalPaymentDue": 200
            },
            "paymentCreated": true,
            "paymentAmount": 200,
            "paymentType": "onboarding"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = signed_in_client(&server);

    let mut vendor = Vendor::from_raw(vendor_json("v1", "publish")).unwrap();
    let selection = PaymentStatusSelection {
        category: Some(PaymentCategory::A),
        visit_status: Some(VisitStatus::VisitedOnboarded),
        ..PaymentStatusSelection::default()
    };
    let outcome = record_payment_status(&client, &mut vendor, selection)
        .await
        .unwrap();

    assert_eq!(outcome.payment_created, Some(true));
    assert_eq!(vendor.visit_status, Some(VisitStatus::VisitedOnboarded));
    assert_eq!(vendor.total_payment_due, Some(200.0));
}

#[tokio::test]
async fn test_payment_status_without_echo_reloads_vendor() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/payments/admin/vendors/v1/payment-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "paymentCreated": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut reloaded = vendor_json("v1", "publish");
    reloaded["visitStatus"] = json!("followup-onboarded");
    reloaded["paymentCategory"] = json!("B");
    Mock::given(method("GET"))
        .and(path("/api/admin/vendors/v1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": reloaded})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = signed_in_client(&server);

    let mut raw = vendor_json("v1", "publish");
    raw["followUpDate"] = json!("2025-05-01T00:00:00Z");
    let mut vendor = Vendor::from_raw(raw).unwrap();
    let selection = PaymentStatusSelection {
        category: Some(PaymentCategory::B),
        visit_status: Some(VisitStatus::FollowupOnboarded),
        ..PaymentStatusSelection::default()
    };
    record_payment_status(&client, &mut vendor, selection)
        .await
        .unwrap();

    assert_eq!(vendor.visit_status, Some(VisitStatus::FollowupOnboarded));
    assert_eq!(vendor.payment_category, Some(PaymentCategory::B));
    assert_eq!(vendor.follow_up_date, None);
}

#[tokio::test]
async fn test_mark_all_paid_zeroes_pending() {
    let server = MockServer::start().await;
    let before = agent_details_json(
        &[
            payment_json("p1", "pending", 50.0),
            payment_json("p2", "pending", 200.0),
            payment_json("p3", "paid", 30.0),
        ],
        250.0,
        30.0,
    );
    let after = agent_details_json(
        &[
            payment_json("p1", "paid", 50.0),
            payment_json("p2", "paid", 200.0),
            payment_json("p3", "paid", 30.0),
        ],
        0.0,
        280.0,
    );

    Mock::given(method("GET"))
        .and(path("/api/payments/admin/payments/agent/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(before))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/payments/admin/payments/mark-paid"))
        .and(body_json(json!({"agentId": "a1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"modifiedCount": 2})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payments/admin/payments/agent/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(after))
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let mut ledger = PaymentLedger::load(client, "a1").await.unwrap();
    assert_eq!(ledger.pending_count(), 2);

    let modified = ledger.mark_all_paid().await.unwrap();

    assert_eq!(modified, 2);
    assert_eq!(ledger.pending_count(), 0);
    assert!(ledger.pending_total().abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_toggle_active_twice_restores_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vendor-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"_id": "t1", "name": "Restaurant", "slug": "restaurant", "isActive": true}]
        })))
        .mount(&server)
        .await;

    // Each toggle reloads the form; serve the states in order.
    for state in [true, false, true] {
        Mock::given(method("GET"))
            .and(path("/api/form/config"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(form_config_json(field_json("f1", state, false))),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("PUT"))
        .and(path("/api/form/fields/f1"))
        .and(body_json(json!({"isActive": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": field_json("f1", false, false)
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/form/fields/f1"))
        .and(body_json(json!({"isActive": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": field_json("f1", true, false)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let mut builder = FormBuilder::load(client).await.unwrap();
    assert_eq!(builder.selected(), Some("restaurant"));
    let original = builder.field("f1").cloned().unwrap();

    builder.toggle_active(&original).await.unwrap();
    let toggled = builder.field("f1").cloned().unwrap();
    assert!(!toggled.is_active);

    builder.toggle_active(&toggled).await.unwrap();
    assert_eq!(builder.field("f1"), Some(&original));
}

#[tokio::test]
async fn test_system_field_is_protected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vendor-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/form/config"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(form_config_json(field_json("f1", true, true))),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let mut builder = FormBuilder::load(client).await.unwrap();
    let field = builder.field("f1").cloned().unwrap();

    assert!(matches!(
        builder.delete_field(&field).await,
        Err(ClientError::Validation { .. })
    ));
    assert!(matches!(
        builder.toggle_required(&field).await,
        Err(ClientError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_approving_pending_vendor_removes_actions() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/vendors/v1"))
        .and(body_json(json!({"restaurantStatus": "publish"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": vendor_json("v1", "publish")
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = signed_in_client(&server);

    let mut vendor = Vendor::from_raw(vendor_json("v1", "pending")).unwrap();
    assert_eq!(
        vendor.review_actions(),
        &[ReviewAction::Approve, ReviewAction::Reject]
    );

    review_vendor(&client, &mut vendor, ReviewAction::Approve)
        .await
        .unwrap();

    assert_eq!(vendor.restaurant_status, VendorStatus::Publish);
    assert!(vendor.review_actions().is_empty());

    let err = review_vendor(&client, &mut vendor, ReviewAction::Reject)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
}

#[tokio::test]
async fn test_edit_request_rejection_needs_remark() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let client = signed_in_client(&server);

    let err = client
        .review_edit_request("v1", ReviewAction::Reject, Some("  "))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please provide a reason for rejection");
}

#[tokio::test]
async fn test_notification_counter_follows_reads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "notifications": [
                    notification_json("n1", false, "pending"),
                    notification_json("n2", false, "publish"),
                    notification_json("n3", true, "publish")
                ],
                "pagination": {"page": 1, "limit": 20, "total": 3, "pages": 1},
                "unreadCount": 2
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/notifications/n1/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": notification_json("n1", true, "pending")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/notifications/mark-all-read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"modifiedCount": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let mut inbox = Inbox::new(client, 20);
    inbox.refresh().await.unwrap();
    assert_eq!(inbox.unread(), 2);

    let target = inbox.open("n1").await.unwrap();
    assert_eq!(inbox.unread(), 1);
    assert_eq!(
        target,
        Some(NavigationTarget::VendorRequests {
            vendor_id: "v1".to_string()
        })
    );

    // Already read: no request, no change.
    let target = inbox.open("n3").await.unwrap();
    assert_eq!(inbox.unread(), 1);
    assert_eq!(target.map(|t| t.path()), Some("/vendor/v1".to_string()));

    inbox.mark_all_read().await.unwrap();
    assert_eq!(inbox.unread(), 0);
    assert!(inbox.notifications().iter().all(|n| n.is_read));
}

#[tokio::test]
async fn test_inbox_loads_configured_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .and(query_param("limit", "5"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "notifications": [notification_json("n1", false, "publish")],
                "pagination": {"page": 1, "limit": 5, "total": 1, "pages": 1},
                "unreadCount": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut inbox = Inbox::new(signed_in_client(&server), 5);
    inbox.refresh().await.unwrap();
    assert_eq!(inbox.notifications().len(), 1);
    assert_eq!(inbox.unread(), 1);
}

#[tokio::test]
async fn test_partner_approval_reports_unsent_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/email-templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "_id": "t1",
                "name": "delivery_partner_approval",
                "subject": "Welcome aboard",
                "body": "Hi {{name}}, your ID is {{loginId}}"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/delivery-partners/d1/approve"))
        .and(body_json(json!({
            "loginId": "DP001",
            "password": "pass123",
            "emailSubject": "Welcome aboard",
            "emailBody": "Hi {{name}}, your ID is {{loginId}}"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Approved",
            "emailSent": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let result = partner_approval::approve_partner(&client, &fast_retry(), "d1", " DP001 ", "pass123")
        .await
        .unwrap();

    assert!(result.success);
    assert!(!result.email_delivered());
}

#[tokio::test]
async fn test_partner_approval_requires_credentials() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let client = signed_in_client(&server);

    let err = partner_approval::approve_partner(&client, &fast_retry(), "d1", "DP001", "   ")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Login ID and password are required");
}

#[tokio::test]
async fn test_partner_approval_does_not_retry_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/delivery-partners/d1/approve"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "Service Unavailable"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server);
    let approval = foodzippy_core::content::PartnerApproval::new("DP001", "pass123", None);
    let err = partner_approval::submit_approval(&client, &fast_retry(), "d1", &approval)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 503, .. }));
}

#[tokio::test]
async fn test_partner_approval_gives_up_when_unreachable() {
    let client = unreachable_client();
    let approval = foodzippy_core::content::PartnerApproval::new("DP001", "pass123", None);

    let err = partner_approval::submit_approval(&client, &fast_retry(), "d1", &approval)
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert!(err.to_string().ends_with(UNREACHABLE_MESSAGE));
}
