//! End-to-end operation flows over an injected transport.
//!
//! The transport is the only effectful collaborator, so these tests feed
//! canned provider payloads through the real endpoint table,
//! discriminator, and normalizer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use serde_json::{json, Value};
use toss_payments::endpoints::Verb;
use toss_payments::error::Error;
use toss_payments::transport::Transport;
use toss_payments::types::PaymentStatus;
use toss_payments::{CodeName, Config, ConfirmRequest, TossClient};

/// Replays one canned provider response and records every request.
struct CannedTransport {
    status: u16,
    body: Value,
    seen: Mutex<Vec<(Verb, String, String)>>,
}

impl CannedTransport {
    fn new(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn send(
        &self,
        verb: Verb,
        url: &str,
        authorization: &str,
        _body: Option<&Value>,
    ) -> toss_payments::ApiResult<(u16, Value)> {
        self.seen
            .lock()
            .unwrap()
            .push((verb, url.to_string(), authorization.to_string()));
        Ok((self.status, self.body.clone()))
    }
}

fn client_with(transport: &Arc<CannedTransport>) -> TossClient {
    let config = Config::new("sk_test_abc").with_billing_secret_key("sk_billing_xyz");
    TossClient::with_transport(config, Box::new(Arc::clone(transport))).unwrap()
}

fn decode_basic_auth(authorization: &str) -> Vec<u8> {
    let encoded = authorization.strip_prefix("Basic ").unwrap();
    general_purpose::STANDARD.decode(encoded).unwrap()
}

fn done_card_payment() -> Value {
    json!({
        "paymentKey": "abc",
        "orderId": "o1",
        "orderName": "n",
        "mId": "m1",
        "currency": "KRW",
        "method": "카드",
        "totalAmount": 1000,
        "balanceAmount": 1000,
        "status": "DONE",
        "requestedAt": "2023-01-01T00:00:00+09:00",
        "approvedAt": "2023-01-01T00:00:05+09:00",
        "card": { "issuerCode": "51", "amount": 1000 }
    })
}

fn billing_authorization() -> Value {
    json!({
        "mId": "m1",
        "customerKey": "c1",
        "authenticatedAt": "2023-01-01T00:00:00+09:00",
        "method": "카드",
        "billingKey": "bk1",
        "card": { "issuerCode": "11" }
    })
}

#[tokio::test]
async fn confirm_returns_normalized_payment() {
    let transport = CannedTransport::new(200, done_card_payment());
    let client = client_with(&transport);

    let outcome = client
        .confirm_payment(&ConfirmRequest {
            payment_key: "abc".to_string(),
            order_id: "o1".to_string(),
            amount: 1000,
        })
        .await
        .unwrap();

    let payment = outcome.success().unwrap();
    assert_eq!(payment.status, PaymentStatus::Done);
    assert!(payment.approved_at.is_some());
    assert_eq!(
        payment.card.unwrap().card_name,
        Some(CodeName::Known("삼성카드"))
    );
}

#[tokio::test]
async fn error_body_becomes_failure_even_on_http_404() {
    let transport = CannedTransport::new(
        404,
        json!({ "code": "NOT_FOUND_PAYMENT", "message": "존재하지 않는 결제" }),
    );
    let client = client_with(&transport);

    let outcome = client.find_payment("missing").await.unwrap();
    let failure = outcome.failure().unwrap();
    assert_eq!(failure.code, "NOT_FOUND_PAYMENT");
    assert_eq!(failure.message.as_deref(), Some("존재하지 않는 결제"));
}

#[tokio::test]
async fn error_body_on_http_200_is_still_a_failure() {
    let transport = CannedTransport::new(
        200,
        json!({ "code": "ALREADY_PROCESSED_PAYMENT", "message": "이미 처리된 결제" }),
    );
    let client = client_with(&transport);

    let outcome = client.find_payment("abc").await.unwrap();
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn billing_authorization_returns_billing_result() {
    let transport = CannedTransport::new(200, billing_authorization());
    let client = client_with(&transport);

    let outcome = client
        .billing_auth_issue(&toss_payments::BillingAuthIssueRequest {
            auth_key: "auth".to_string(),
            customer_key: "c1".to_string(),
        })
        .await
        .unwrap();

    let billing = outcome.success().unwrap();
    assert_eq!(billing.billing_key, "bk1");
    assert_eq!(billing.card.card_name, Some(CodeName::Known("KB국민카드")));
}

#[tokio::test]
async fn malformed_success_payload_is_a_hard_error() {
    let mut body = done_card_payment();
    body.as_object_mut().unwrap().remove("requestedAt");
    let transport = CannedTransport::new(200, body);
    let client = client_with(&transport);

    let err = client.find_payment("abc").await.unwrap_err();
    assert!(err.is_malformed_response());
    match err {
        Error::MissingField { field } => assert_eq!(field, "requestedAt"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn find_payment_hits_the_rendered_path_with_standard_auth() {
    let transport = CannedTransport::new(200, done_card_payment());
    let client = client_with(&transport);

    let _ = client.find_payment("pay_123").await.unwrap();

    let seen = transport.seen.lock().unwrap();
    let (verb, url, authorization) = &seen[0];
    assert_eq!(*verb, Verb::Get);
    assert_eq!(
        url,
        "https://api.tosspayments.com/v1/payments/pay_123"
    );
    assert_eq!(decode_basic_auth(authorization), b"sk_test_abc:");
}

#[tokio::test]
async fn billing_operations_sign_with_the_billing_key() {
    let transport = CannedTransport::new(200, billing_authorization());
    let client = client_with(&transport);

    let _ = client
        .billing_auth_issue(&toss_payments::BillingAuthIssueRequest {
            auth_key: "auth".to_string(),
            customer_key: "c1".to_string(),
        })
        .await
        .unwrap();

    let seen = transport.seen.lock().unwrap();
    let (verb, url, authorization) = &seen[0];
    assert_eq!(*verb, Verb::Post);
    assert!(url.ends_with("/v1/billing/authorizations/issue"));
    assert_eq!(decode_basic_auth(authorization), b"sk_billing_xyz:");
}

#[tokio::test]
async fn billing_charge_normalizes_as_a_payment() {
    let transport = CannedTransport::new(200, done_card_payment());
    let client = client_with(&transport);

    let outcome = client
        .billing_charge(
            "bk1",
            &toss_payments::BillingChargeRequest {
                customer_key: "c1".to_string(),
                amount: 1000,
                order_id: "o1".to_string(),
                order_name: None,
                customer_email: None,
                tax_free_amount: None,
            },
        )
        .await
        .unwrap();

    assert!(outcome.is_success());

    let seen = transport.seen.lock().unwrap();
    let (_, url, authorization) = &seen[0];
    assert!(url.ends_with("/v1/billing/bk1"));
    assert_eq!(decode_basic_auth(authorization), b"sk_billing_xyz:");
}
