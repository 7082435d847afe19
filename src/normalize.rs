//! Discrimination and normalization of raw provider payloads.
//!
//! Every endpoint returns JSON whose shape the endpoint table declares as
//! either a payment object or a billing authorization. Before shape-specific
//! normalization runs, the discriminator decides whether the payload is a
//! provider error: a top-level `code` key marks an error body regardless of
//! the HTTP status the transport saw. Only the object's own keys count —
//! success payloads routinely nest fields named `code` (bank codes, the
//! `failure` object) and must not be mistaken for errors.
//!
//! Normalization deserializes into all-optional wire structs first and then
//! applies explicit required-field checks, so a contract violation surfaces
//! as an error naming the exact provider field and raw value instead of a
//! generic decode failure.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::codes::{self, CodeName};
use crate::error::{ApiResult, Error};
use crate::types::{
    AcquireStatus, ApiResponse, Billing, Cancel, CancelStatus, Card, CashReceipt, Checkout,
    Discount, EasyPay, Failure, GiftCertificate, InterestPayer, MobilePhone, PayMethod, Payment,
    PaymentStatus, PaymentType, ProviderError, Receipt, RefundReceiveAccount, RefundStatus,
    SettlementStatus, Transfer, VirtualAccount,
};

/// True when the payload is a provider error body: a JSON object carrying
/// a `code` key among its own top-level keys.
pub fn is_provider_error(raw: &Value) -> bool {
    raw.as_object().map_or(false, |obj| obj.contains_key("code"))
}

/// Build a [`ProviderError`] from an error body. Never fails: a missing
/// message stays absent and `data` passes through untouched.
pub fn provider_error_from(raw: &Value) -> ProviderError {
    let obj = raw.as_object();
    let code = obj
        .and_then(|o| o.get("code"))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();
    let message = obj
        .and_then(|o| o.get("message"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);
    let data = obj
        .and_then(|o| o.get("data"))
        .filter(|v| !v.is_null())
        .cloned();
    ProviderError {
        code,
        message,
        data,
    }
}

/// Discriminate and normalize a response expected to carry a payment
/// object on success.
pub fn normalize_payment(raw: &Value) -> ApiResult<ApiResponse<Payment>> {
    if is_provider_error(raw) {
        return Ok(ApiResponse::Failure(provider_error_from(raw)));
    }
    Ok(ApiResponse::Success(payment_from(raw)?))
}

/// Discriminate and normalize a response expected to carry a billing
/// authorization on success.
pub fn normalize_billing(raw: &Value) -> ApiResult<ApiResponse<Billing>> {
    if is_provider_error(raw) {
        return Ok(ApiResponse::Failure(provider_error_from(raw)));
    }
    Ok(ApiResponse::Success(billing_from(raw)?))
}

// Wire-format structs. Every field is optional; presence requirements are
// enforced during conversion so errors can name the provider field.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayment {
    version: Option<String>,
    payment_key: Option<String>,
    #[serde(rename = "type")]
    payment_type: Option<String>,
    order_id: Option<String>,
    order_name: Option<String>,
    m_id: Option<String>,
    currency: Option<String>,
    method: Option<String>,
    total_amount: Option<i64>,
    balance_amount: Option<i64>,
    status: Option<String>,
    requested_at: Option<String>,
    approved_at: Option<String>,
    use_escrow: Option<bool>,
    last_transaction_key: Option<String>,
    supplied_amount: Option<i64>,
    vat: Option<i64>,
    culture_expense: Option<bool>,
    tax_free_amount: Option<i64>,
    tax_exemption_amount: Option<i64>,
    is_partial_cancelable: Option<bool>,
    cancels: Option<Vec<RawCancel>>,
    secret: Option<String>,
    country: Option<String>,
    card: Option<RawCard>,
    virtual_account: Option<RawVirtualAccount>,
    mobile_phone: Option<RawMobilePhone>,
    gift_certificate: Option<RawGiftCertificate>,
    transfer: Option<RawTransfer>,
    easy_pay: Option<RawEasyPay>,
    cash_receipt: Option<RawCashReceipt>,
    discount: Option<RawDiscount>,
    failure: Option<RawFailure>,
    receipt: Option<RawReceipt>,
    checkout: Option<RawCheckout>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCancel {
    cancel_amount: Option<i64>,
    cancel_reason: Option<String>,
    tax_free_amount: Option<i64>,
    tax_exemption_amount: Option<i64>,
    refundable_amount: Option<i64>,
    easy_pay_discount_amount: Option<i64>,
    canceled_at: Option<String>,
    transaction_key: Option<String>,
    receipt_key: Option<String>,
    cancel_status: Option<String>,
    cancel_request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    amount: Option<i64>,
    issuer_code: Option<String>,
    acquirer_code: Option<String>,
    number: Option<String>,
    installment_plan_months: Option<i64>,
    approve_no: Option<String>,
    use_card_point: Option<bool>,
    card_type: Option<String>,
    owner_type: Option<String>,
    acquire_status: Option<String>,
    is_interest_free: Option<bool>,
    interest_payer: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRefundReceiveAccount {
    bank_code: Option<String>,
    account_number: Option<String>,
    holder_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVirtualAccount {
    account_type: Option<String>,
    account_number: Option<String>,
    bank_code: Option<String>,
    customer_name: Option<String>,
    due_date: Option<String>,
    refund_status: Option<String>,
    expired: Option<bool>,
    settlement_status: Option<String>,
    refund_receive_account: Option<RawRefundReceiveAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMobilePhone {
    customer_mobile_phone: Option<String>,
    settlement_status: Option<String>,
    receipt_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGiftCertificate {
    approve_no: Option<String>,
    settlement_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    bank_code: Option<String>,
    settlement_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEasyPay {
    provider: Option<String>,
    amount: Option<i64>,
    discount_amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCashReceipt {
    #[serde(rename = "type")]
    receipt_type: Option<String>,
    receipt_key: Option<String>,
    issue_number: Option<String>,
    receipt_url: Option<String>,
    amount: Option<i64>,
    tax_free_amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiscount {
    amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFailure {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReceipt {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCheckout {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBilling {
    m_id: Option<String>,
    customer_key: Option<String>,
    authenticated_at: Option<String>,
    method: Option<String>,
    billing_key: Option<String>,
    card: Option<RawCard>,
}

fn payment_from(raw: &Value) -> ApiResult<Payment> {
    let raw: RawPayment = serde_json::from_value(raw.clone())?;

    let cancels = raw
        .cancels
        .map(|entries| {
            entries
                .into_iter()
                .map(cancel_from)
                .collect::<ApiResult<Vec<_>>>()
        })
        .transpose()?;

    Ok(Payment {
        version: raw.version,
        payment_key: require("paymentKey", raw.payment_key)?,
        payment_type: raw.payment_type.as_deref().map(PaymentType::parse),
        order_id: require("orderId", raw.order_id)?,
        order_name: raw.order_name,
        m_id: raw.m_id,
        currency: require("currency", raw.currency)?,
        method: raw.method.as_deref().map(PayMethod::parse),
        total_amount: require("totalAmount", raw.total_amount)?,
        balance_amount: require("balanceAmount", raw.balance_amount)?,
        status: PaymentStatus::parse(&require("status", raw.status)?),
        requested_at: required_timestamp("requestedAt", raw.requested_at.as_deref())?,
        approved_at: optional_timestamp("approvedAt", raw.approved_at.as_deref())?,
        use_escrow: raw.use_escrow,
        last_transaction_key: raw.last_transaction_key,
        supplied_amount: raw.supplied_amount,
        vat: raw.vat,
        culture_expense: raw.culture_expense,
        tax_free_amount: raw.tax_free_amount,
        tax_exemption_amount: raw.tax_exemption_amount,
        is_partial_cancelable: raw.is_partial_cancelable,
        cancels,
        secret: raw.secret,
        country: raw.country,
        card: raw.card.map(card_from),
        virtual_account: raw.virtual_account.map(virtual_account_from).transpose()?,
        mobile_phone: raw.mobile_phone.map(mobile_phone_from),
        gift_certificate: raw.gift_certificate.map(gift_certificate_from),
        transfer: raw.transfer.map(transfer_from),
        easy_pay: raw.easy_pay.map(easy_pay_from),
        cash_receipt: raw.cash_receipt.map(cash_receipt_from),
        discount: raw.discount.map(|d| Discount { amount: d.amount }),
        failure: raw.failure.map(|f| Failure {
            code: f.code,
            message: f.message,
        }),
        receipt: raw.receipt.map(|r| Receipt { url: r.url }),
        checkout: raw.checkout.map(|c| Checkout { url: c.url }),
    })
}

fn billing_from(raw: &Value) -> ApiResult<Billing> {
    let raw: RawBilling = serde_json::from_value(raw.clone())?;
    let card = raw.card.ok_or(Error::MissingField { field: "card" })?;

    Ok(Billing {
        m_id: require("mId", raw.m_id)?,
        customer_key: require("customerKey", raw.customer_key)?,
        authenticated_at: required_timestamp("authenticatedAt", raw.authenticated_at.as_deref())?,
        method: raw.method.as_deref().map(PayMethod::parse),
        billing_key: require("billingKey", raw.billing_key)?,
        card: card_from(card),
    })
}

fn cancel_from(raw: RawCancel) -> ApiResult<Cancel> {
    Ok(Cancel {
        cancel_amount: raw.cancel_amount,
        cancel_reason: raw.cancel_reason,
        tax_free_amount: raw.tax_free_amount,
        tax_exemption_amount: raw.tax_exemption_amount,
        refundable_amount: raw.refundable_amount,
        easy_pay_discount_amount: raw.easy_pay_discount_amount,
        canceled_at: required_timestamp("canceledAt", raw.canceled_at.as_deref())?,
        transaction_key: raw.transaction_key,
        receipt_key: raw.receipt_key,
        cancel_status: raw.cancel_status.as_deref().map(CancelStatus::parse),
        cancel_request_id: raw.cancel_request_id,
    })
}

fn card_from(raw: RawCard) -> Card {
    let card_name = raw.issuer_code.as_deref().map(resolve_issuer);
    Card {
        amount: raw.amount,
        issuer_code: raw.issuer_code,
        card_name,
        acquirer_code: raw.acquirer_code,
        number: raw.number,
        installment_plan_months: raw.installment_plan_months,
        approve_no: raw.approve_no,
        use_card_point: raw.use_card_point,
        card_type: raw.card_type,
        owner_type: raw.owner_type,
        acquire_status: raw.acquire_status.as_deref().map(AcquireStatus::parse),
        is_interest_free: raw.is_interest_free,
        interest_payer: raw.interest_payer.as_deref().map(InterestPayer::parse),
    }
}

fn virtual_account_from(raw: RawVirtualAccount) -> ApiResult<VirtualAccount> {
    let bank_name = raw.bank_code.as_deref().map(resolve_bank);
    Ok(VirtualAccount {
        account_type: raw.account_type,
        account_number: raw.account_number,
        bank_code: raw.bank_code,
        bank_name,
        customer_name: raw.customer_name,
        due_date: optional_timestamp("dueDate", raw.due_date.as_deref())?,
        refund_status: raw.refund_status.as_deref().map(RefundStatus::parse),
        expired: raw.expired,
        settlement_status: raw.settlement_status.as_deref().map(SettlementStatus::parse),
        refund_receive_account: raw.refund_receive_account.map(|acc| {
            let bank_name = acc.bank_code.as_deref().map(resolve_bank);
            RefundReceiveAccount {
                bank_code: acc.bank_code,
                bank_name,
                account_number: acc.account_number,
                holder_name: acc.holder_name,
            }
        }),
    })
}

fn mobile_phone_from(raw: RawMobilePhone) -> MobilePhone {
    MobilePhone {
        customer_mobile_phone: raw.customer_mobile_phone,
        settlement_status: raw.settlement_status.as_deref().map(SettlementStatus::parse),
        receipt_url: raw.receipt_url,
    }
}

fn gift_certificate_from(raw: RawGiftCertificate) -> GiftCertificate {
    GiftCertificate {
        approve_no: raw.approve_no,
        settlement_status: raw.settlement_status.as_deref().map(SettlementStatus::parse),
    }
}

fn transfer_from(raw: RawTransfer) -> Transfer {
    let bank_name = raw.bank_code.as_deref().map(resolve_bank);
    Transfer {
        bank_code: raw.bank_code,
        bank_name,
        settlement_status: raw.settlement_status.as_deref().map(SettlementStatus::parse),
    }
}

fn easy_pay_from(raw: RawEasyPay) -> EasyPay {
    EasyPay {
        provider: raw.provider,
        amount: raw.amount,
        discount_amount: raw.discount_amount,
    }
}

fn cash_receipt_from(raw: RawCashReceipt) -> CashReceipt {
    CashReceipt {
        receipt_type: raw.receipt_type,
        receipt_key: raw.receipt_key,
        issue_number: raw.issue_number,
        receipt_url: raw.receipt_url,
        amount: raw.amount,
        tax_free_amount: raw.tax_free_amount,
    }
}

fn require<T>(field: &'static str, value: Option<T>) -> ApiResult<T> {
    value.ok_or(Error::MissingField { field })
}

/// Parse a required timestamp. The provider sends RFC 3339 with a zone
/// offset almost everywhere; a handful of fields (virtual-account due
/// dates) arrive without an offset and are local to KST.
fn required_timestamp(field: &'static str, value: Option<&str>) -> ApiResult<DateTime<FixedOffset>> {
    let raw = value.ok_or(Error::MissingField { field })?;
    parse_timestamp(raw).ok_or_else(|| Error::malformed_field(field, raw))
}

fn optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> ApiResult<Option<DateTime<FixedOffset>>> {
    match value {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| Error::malformed_field(field, raw)),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    // Offset-less form, KST.
    let kst = FixedOffset::east_opt(9 * 3600)?;
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()?
        .and_local_timezone(kst)
        .single()
}

fn resolve_bank(code: &str) -> CodeName {
    let name = codes::bank_name(code);
    if !name.is_known() {
        debug!("unrecognized bank code: {:?}", code);
    }
    name
}

fn resolve_issuer(code: &str) -> CodeName {
    let name = codes::card_issuer_name(code);
    if !name.is_known() {
        debug!("unrecognized card issuer code: {:?}", code);
    }
    name
}
