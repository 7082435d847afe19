//! Client for the provider's payment lifecycle operations.
//!
//! One method per logical operation. Each call looks up its endpoint
//! descriptor, builds the Basic authorization header from the matching
//! secret-key slot, sends via the transport, and runs the discriminator
//! plus the endpoint's normalizer path on the response.

use base64::{engine::general_purpose, Engine};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::endpoints::{self, Endpoint, KeySlot};
use crate::error::{ApiResult, Error};
use crate::normalize;
use crate::transport::{HttpTransport, Transport};
use crate::types::{ApiResponse, Billing, Payment};

/// Payment confirmation after the customer authenticates at checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
}

/// Account a virtual-account refund is sent to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundAccountRequest {
    pub bank: String,
    pub account_number: String,
    pub holder_name: String,
}

/// Full or partial cancellation of a payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub cancel_reason: String,
    /// Omit to cancel the full remaining balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<i64>,
    /// Required when refunding a virtual-account payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_receive_account: Option<RefundAccountRequest>,
}

/// Card-credential registration for a recurring-billing key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAuthCardRequest {
    pub customer_key: String,
    pub card_number: String,
    pub card_expiration_year: String,
    pub card_expiration_month: String,
    pub customer_identity_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_password: Option<String>,
}

/// Exchange of a checkout auth key for a billing key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAuthIssueRequest {
    pub auth_key: String,
    pub customer_key: String,
}

/// Charge against a previously issued billing key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingChargeRequest {
    pub customer_key: String,
    pub amount: i64,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<i64>,
}

pub struct TossClient {
    config: Config,
    transport: Box<dyn Transport>,
}

impl TossClient {
    /// Create a client with the reqwest-backed transport.
    pub fn new(config: Config) -> ApiResult<Self> {
        config
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;
        let transport = HttpTransport::new(config.timeout_secs)?;
        Ok(Self {
            config,
            transport: Box::new(transport),
        })
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: Config, transport: Box<dyn Transport>) -> ApiResult<Self> {
        config
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;
        Ok(Self { config, transport })
    }

    /// Create a payment (checkout flow).
    ///
    /// The provider accepts many optional fields here depending on the
    /// payment means, so the payload passes through as JSON.
    pub async fn create_payment(&self, payload: &Value) -> ApiResult<ApiResponse<Payment>> {
        info!("creating payment");
        self.payment_call(&endpoints::CREATE_PAYMENT, &[], Some(payload.clone()))
            .await
    }

    /// Confirm a payment after customer authentication.
    pub async fn confirm_payment(
        &self,
        request: &ConfirmRequest,
    ) -> ApiResult<ApiResponse<Payment>> {
        info!("confirming payment: order_id={}", request.order_id);
        let payload = serde_json::to_value(request)?;
        self.payment_call(&endpoints::CONFIRM_PAYMENT, &[], Some(payload))
            .await
    }

    /// Look up a payment by its payment key.
    pub async fn find_payment(&self, payment_key: &str) -> ApiResult<ApiResponse<Payment>> {
        debug!("fetching payment: payment_key={}", payment_key);
        self.payment_call(&endpoints::FIND_PAYMENT, &[payment_key], None)
            .await
    }

    /// Look up a payment by the merchant order id.
    pub async fn find_payment_by_order_id(
        &self,
        order_id: &str,
    ) -> ApiResult<ApiResponse<Payment>> {
        debug!("fetching payment: order_id={}", order_id);
        self.payment_call(&endpoints::FIND_PAYMENT_BY_ORDER_ID, &[order_id], None)
            .await
    }

    /// Cancel a payment, fully or partially.
    pub async fn cancel_payment(
        &self,
        payment_key: &str,
        request: &CancelRequest,
    ) -> ApiResult<ApiResponse<Payment>> {
        info!("canceling payment: payment_key={}", payment_key);
        let payload = serde_json::to_value(request)?;
        self.payment_call(&endpoints::CANCEL_PAYMENT, &[payment_key], Some(payload))
            .await
    }

    /// Key-in payment with directly entered card credentials.
    pub async fn key_in_payment(&self, payload: &Value) -> ApiResult<ApiResponse<Payment>> {
        info!("creating key-in payment");
        self.payment_call(&endpoints::KEY_IN_PAYMENT, &[], Some(payload.clone()))
            .await
    }

    /// Issue a virtual account for deposit.
    pub async fn create_virtual_account(
        &self,
        payload: &Value,
    ) -> ApiResult<ApiResponse<Payment>> {
        info!("creating virtual account");
        self.payment_call(&endpoints::CREATE_VIRTUAL_ACCOUNT, &[], Some(payload.clone()))
            .await
    }

    /// Register card credentials for a recurring-billing key.
    pub async fn billing_auth_card(
        &self,
        request: &BillingAuthCardRequest,
    ) -> ApiResult<ApiResponse<Billing>> {
        info!(
            "authorizing billing card: customer_key={}",
            request.customer_key
        );
        let payload = serde_json::to_value(request)?;
        self.billing_call(&endpoints::BILLING_AUTH_CARD, &[], Some(payload))
            .await
    }

    /// Exchange a checkout auth key for a billing key.
    pub async fn billing_auth_issue(
        &self,
        request: &BillingAuthIssueRequest,
    ) -> ApiResult<ApiResponse<Billing>> {
        info!(
            "issuing billing key: customer_key={}",
            request.customer_key
        );
        let payload = serde_json::to_value(request)?;
        self.billing_call(&endpoints::BILLING_AUTH_ISSUE, &[], Some(payload))
            .await
    }

    /// Charge a billing key. The provider answers with a full payment
    /// object, so this normalizes on the payment path.
    pub async fn billing_charge(
        &self,
        billing_key: &str,
        request: &BillingChargeRequest,
    ) -> ApiResult<ApiResponse<Payment>> {
        info!("charging billing key: order_id={}", request.order_id);
        let payload = serde_json::to_value(request)?;
        self.payment_call(&endpoints::BILLING_CHARGE, &[billing_key], Some(payload))
            .await
    }

    async fn payment_call(
        &self,
        endpoint: &Endpoint,
        path_args: &[&str],
        body: Option<Value>,
    ) -> ApiResult<ApiResponse<Payment>> {
        let raw = self.send(endpoint, path_args, body.as_ref()).await?;
        normalize::normalize_payment(&raw)
    }

    async fn billing_call(
        &self,
        endpoint: &Endpoint,
        path_args: &[&str],
        body: Option<Value>,
    ) -> ApiResult<ApiResponse<Billing>> {
        let raw = self.send(endpoint, path_args, body.as_ref()).await?;
        normalize::normalize_billing(&raw)
    }

    async fn send(
        &self,
        endpoint: &Endpoint,
        path_args: &[&str],
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let url = format!("{}{}", self.config.base_url, endpoint.render_path(path_args));
        let authorization = self.authorization(endpoint.key_slot);

        debug!("{}: {:?} {}", endpoint.name, endpoint.verb, url);
        let (status, raw) = self
            .transport
            .send(endpoint.verb, &url, &authorization, body)
            .await?;

        // The discriminator decides error vs success from the body alone;
        // the status is informational.
        if status >= 400 {
            debug!("{}: non-success HTTP status {}", endpoint.name, status);
        }
        Ok(raw)
    }

    fn authorization(&self, slot: KeySlot) -> String {
        let key = match slot {
            KeySlot::Standard => self.config.secret_key.as_str(),
            KeySlot::Billing => self.config.billing_key_or_default(),
        };
        let credentials = general_purpose::STANDARD.encode(format!("{}:", key));
        format!("Basic {}", credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> TossClient {
        let config = Config::new("sk_test_abc").with_billing_secret_key("sk_billing_xyz");
        TossClient::new(config).unwrap()
    }

    #[test]
    fn authorization_encodes_key_with_trailing_colon() {
        let client = test_client();
        let header = client.authorization(KeySlot::Standard);
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"sk_test_abc:");
    }

    #[test]
    fn billing_slot_uses_the_billing_credentials() {
        let client = test_client();
        let header = client.authorization(KeySlot::Billing);
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"sk_billing_xyz:");
    }

    #[test]
    fn client_rejects_invalid_config() {
        let result = TossClient::new(Config::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn cancel_request_omits_absent_fields() {
        let request = CancelRequest {
            cancel_reason: "고객 요청".to_string(),
            cancel_amount: None,
            tax_free_amount: None,
            refund_receive_account: None,
        };
        let payload = serde_json::to_value(&request).unwrap();
        let obj = payload.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["cancelReason"], "고객 요청");
    }

    #[test]
    fn confirm_request_serializes_camel_case() {
        let request = ConfirmRequest {
            payment_key: "pk".to_string(),
            order_id: "o1".to_string(),
            amount: 1000,
        };
        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(payload["paymentKey"], "pk");
        assert_eq!(payload["orderId"], "o1");
        assert_eq!(payload["amount"], 1000);
    }
}
