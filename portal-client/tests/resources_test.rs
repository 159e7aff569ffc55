mod common;

use common::{TestPortal, consorcio_json, page, payment_json, success, ticket_json};
use portal_client::api::ApiError;
use portal_client::models::{
    Currency, NewPayment, NewTicket, PaymentMethod, TicketPriority, TicketStatus,
    TicketStatusUpdate,
};
use portal_client::services::{ConsorcioApi, FinanceApi, PaymentsApi, TicketsApi};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn my_consorcios_and_selection() {
    let portal = TestPortal::signed_in("jwt1").await;

    Mock::given(method("GET"))
        .and(path("/accounts/consorcios/my_consorcios/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([
            consorcio_json("c1", "ANTON I"),
            consorcio_json("c2", "ANTON II"),
        ]))))
        .mount(&portal.server)
        .await;

    let api = ConsorcioApi::new(portal.client.clone());
    let consorcios = api.my_consorcios().await.unwrap();
    assert_eq!(consorcios.len(), 2);

    api.select(&consorcios[1]);

    let active = portal.state().active_consorcio.unwrap();
    assert_eq!(active.id, "c2");
    assert_eq!(active.name.as_deref(), Some("ANTON II"));
}

#[tokio::test]
async fn members_pass_search_and_page() {
    let portal = TestPortal::signed_in("jwt1").await;

    Mock::given(method("GET"))
        .and(path("/accounts/consorcios/c1/members/"))
        .and(query_param("search", "ana"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "results": [{
                "id": "u1",
                "email": "ana@example.com",
                "first_name": "Ana",
                "last_name": "García",
                "username": "ana",
                "created_at": "2026-01-10T09:00:00Z"
            }],
            "count": 21
        }))))
        .expect(1)
        .mount(&portal.server)
        .await;

    let members = ConsorcioApi::new(portal.client.clone())
        .members("c1", Some("ana"), 2)
        .await
        .unwrap();

    assert_eq!(members.count, 21);
    assert_eq!(members.results[0].email, "ana@example.com");
}

#[tokio::test]
async fn payments_list_sends_consorcio_and_period() {
    let portal = TestPortal::signed_in("jwt1").await;

    Mock::given(method("GET"))
        .and(path("/payments/payments/"))
        .and(query_param("consorcio_id", "c1"))
        .and(query_param("period", "2026-10"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(page(vec![
            payment_json("p1", "87500.00", "2026-10-01T12:00:00Z"),
        ]))))
        .expect(1)
        .mount(&portal.server)
        .await;

    let payments = PaymentsApi::new(portal.client.clone())
        .list("c1", Some("2026-10"), 1)
        .await
        .unwrap();

    let payment = &payments.results[0];
    assert_eq!(payment.amount, Decimal::from_str("87500.00").unwrap());
    assert_eq!(payment.currency, Currency::Ars);
    assert_eq!(payment.method, PaymentMethod::Transfer);
}

#[tokio::test]
async fn payments_for_active_require_a_selection() {
    let portal = TestPortal::signed_in("jwt1").await;

    let err = PaymentsApi::new(portal.client.clone())
        .list_for_active(None, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidRequest(_)));
    assert_eq!(portal.hits("/payments/payments/").await, 0);
}

#[tokio::test]
async fn create_payment_and_issue_receipt() {
    let portal = TestPortal::signed_in("jwt1").await;

    Mock::given(method("POST"))
        .and(path("/payments/payments/"))
        .and(body_json(json!({
            "consorcio_id": "c1",
            "amount": "1500.50",
            "currency": "ARS",
            "period": "2026-10",
            "concept": "Expensas octubre",
            "method": "CASH"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(success(payment_json("p2", "1500.50", "2026-10-03T08:00:00Z"))),
        )
        .expect(1)
        .mount(&portal.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/payments/payments/p2/receipt/"))
        .and(body_json(json!({})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success(json!({ "receipt_number": "R-0001" }))),
        )
        .expect(1)
        .mount(&portal.server)
        .await;

    let api = PaymentsApi::new(portal.client.clone());
    let payment = api
        .create(&NewPayment {
            consorcio_id: "c1".to_string(),
            payer_user_id: None,
            amount: Decimal::from_str("1500.50").unwrap(),
            currency: Currency::Ars,
            period: "2026-10".to_string(),
            concept: "Expensas octubre".to_string(),
            method: PaymentMethod::Cash,
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(payment.id, "p2");

    let receipt = api.issue_receipt(&payment.id).await.unwrap();
    assert_eq!(receipt["receipt_number"], "R-0001");
}

#[tokio::test]
async fn tickets_list_filters_by_status() {
    let portal = TestPortal::signed_in("jwt1").await;

    Mock::given(method("GET"))
        .and(path("/tickets/tickets/"))
        .and(query_param("consorcio_id", "c1"))
        .and(query_param("status", "IN_PROGRESS"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success(page(vec![ticket_json("t1", "IN_PROGRESS")]))),
        )
        .expect(1)
        .mount(&portal.server)
        .await;

    // Mounted second: only requests the status filter above did not claim
    Mock::given(method("GET"))
        .and(path("/tickets/tickets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(page(vec![]))))
        .expect(1)
        .mount(&portal.server)
        .await;

    let api = TicketsApi::new(portal.client.clone());
    let filtered = api
        .list("c1", Some(TicketStatus::InProgress), 1)
        .await
        .unwrap();
    assert_eq!(filtered.results[0].status, TicketStatus::InProgress);

    let all = api.list("c1", None, 1).await.unwrap();
    assert!(all.results.is_empty());
}

#[tokio::test]
async fn ticket_lifecycle_calls() {
    let portal = TestPortal::signed_in("jwt1").await;

    Mock::given(method("POST"))
        .and(path("/tickets/tickets/"))
        .and(body_json(json!({
            "consorcio_id": "c1",
            "title": "Filtración en cochera",
            "description": "Gotea desde el techo",
            "priority": "HIGH"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(success(ticket_json("t1", "OPEN"))))
        .expect(1)
        .mount(&portal.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tickets/tickets/t1/status/"))
        .and(body_json(json!({ "status": "RESOLVED" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success(ticket_json("t1", "RESOLVED"))),
        )
        .expect(1)
        .mount(&portal.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tickets/tickets/t1/comments/"))
        .and(body_json(json!({ "body": "Plomero en camino" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(success(json!({
            "id": "m1",
            "ticket_id": "t1",
            "author": "admin",
            "body": "Plomero en camino",
            "created_at": "2026-10-02T11:00:00Z"
        }))))
        .expect(1)
        .mount(&portal.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tickets/tickets/t1/comments/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([]))))
        .expect(1)
        .mount(&portal.server)
        .await;

    let api = TicketsApi::new(portal.client.clone());
    let ticket = api
        .create(&NewTicket {
            consorcio_id: "c1".to_string(),
            title: "Filtración en cochera".to_string(),
            description: "Gotea desde el techo".to_string(),
            priority: TicketPriority::High,
        })
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Open);

    let resolved = api
        .update_status(
            &ticket.id,
            &TicketStatusUpdate {
                status: TicketStatus::Resolved,
                assigned_to: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(resolved.status, TicketStatus::Resolved);

    let comment = api.add_comment(&ticket.id, "Plomero en camino").await.unwrap();
    assert_eq!(comment.ticket_id, "t1");

    assert!(api.comments(&ticket.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn finance_overview_for_active_consorcio() {
    let portal = TestPortal::signed_in("jwt1").await;

    Mock::given(method("GET"))
        .and(path("/accounts/consorcios/my_consorcios/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success(json!([consorcio_json("c1", "ANTON I")]))),
        )
        .mount(&portal.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/payments/payments/"))
        .and(query_param("consorcio_id", "c1"))
        .and(query_param("period", "2026-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(page(vec![
            payment_json("p1", "250.00", "2026-10-01T12:00:00Z"),
            payment_json("p2", "250.00", "2026-10-04T12:00:00Z"),
            payment_json("p3", "250.00", "2026-10-02T12:00:00Z"),
            payment_json("p4", "250.00", "2026-10-03T12:00:00Z"),
        ]))))
        .expect(1)
        .mount(&portal.server)
        .await;

    let consorcios = ConsorcioApi::new(portal.client.clone());
    let first = consorcios.my_consorcios().await.unwrap().remove(0);
    consorcios.select(&first);

    let overview = FinanceApi::new(portal.client.clone())
        .overview("2026-10")
        .await
        .unwrap();

    assert_eq!(overview.summary.consorcio_name, "ANTON I");
    assert_eq!(overview.summary.collected, Decimal::from(1000));
    assert_eq!(overview.summary.total, Decimal::from(1150));
    assert_eq!(overview.summary.pending, Decimal::from(150));
    assert_eq!(overview.summary.health_percent, 87);

    let recent: Vec<&str> = overview.recent_activity.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(recent, vec!["p1", "p2", "p3"]);
}
