//! Normalized result model for provider responses.
//!
//! Every type here is an immutable value object built fresh from one raw
//! JSON response. Nested objects are either fully absent or fully
//! populated; enumerated provider codes are parsed into closed vocabularies
//! with an `Unknown` escape variant that preserves the raw string.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::codes::CodeName;

/// Outcome of one API call after discrimination and normalization.
///
/// A provider-signaled failure is ordinary control flow, not an `Err`:
/// the provider may return an error body under any HTTP status, and
/// callers are expected to branch on it.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(ProviderError),
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            ApiResponse::Success(value) => Some(value),
            ApiResponse::Failure(_) => None,
        }
    }

    pub fn failure(self) -> Option<ProviderError> {
        match self {
            ApiResponse::Success(_) => None,
            ApiResponse::Failure(err) => Some(err),
        }
    }
}

/// Error payload the provider returns when an operation fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderError {
    /// Provider error code, e.g. `NOT_FOUND_PAYMENT`.
    pub code: String,
    /// Human-readable message; absent when the provider sent none.
    pub message: Option<String>,
    /// Opaque extra payload, passed through un-normalized.
    pub data: Option<serde_json::Value>,
}

/// Payment transaction status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Ready,
    InProgress,
    WaitingForDeposit,
    Done,
    Canceled,
    PartialCanceled,
    Aborted,
    Expired,
    Unknown(String),
}

impl PaymentStatus {
    /// Total, case-insensitive parse; unrecognized input becomes
    /// `Unknown` carrying the raw string.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "ready" => Self::Ready,
            "in_progress" => Self::InProgress,
            "waiting_for_deposit" => Self::WaitingForDeposit,
            "done" => Self::Done,
            "canceled" => Self::Canceled,
            "partial_canceled" => Self::PartialCanceled,
            "aborted" => Self::Aborted,
            "expired" => Self::Expired,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// Payment kind: one-off, recurring-billing, or brand pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Normal,
    Billing,
    BrandPay,
    Unknown(String),
}

impl PaymentType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "normal" => Self::Normal,
            "billing" => Self::Billing,
            "brandpay" => Self::BrandPay,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// Payment means; the provider sends Korean display words on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayMethod {
    Card,
    VirtualAccount,
    EasyPay,
    MobilePhone,
    Transfer,
    CultureGiftCertificate,
    BookGiftCertificate,
    GameGiftCertificate,
    Unknown(String),
}

impl PayMethod {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "카드" => Self::Card,
            "가상계좌" => Self::VirtualAccount,
            "간편결제" => Self::EasyPay,
            "휴대폰" => Self::MobilePhone,
            "계좌이체" => Self::Transfer,
            "문화상품권" => Self::CultureGiftCertificate,
            "도서문화상품권" => Self::BookGiftCertificate,
            "게임문화상품권" => Self::GameGiftCertificate,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// Card acquisition progress at the acquirer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquireStatus {
    Ready,
    Requested,
    Completed,
    CancelRequested,
    Canceled,
    Unknown(String),
}

impl AcquireStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "ready" => Self::Ready,
            "requested" => Self::Requested,
            "completed" => Self::Completed,
            "cancel_requested" => Self::CancelRequested,
            "canceled" => Self::Canceled,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// Virtual-account refund progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    None,
    Pending,
    Failed,
    PartialFailed,
    Completed,
    Unknown(String),
}

impl RefundStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "none" => Self::None,
            "pending" => Self::Pending,
            "failed" => Self::Failed,
            "partial_failed" => Self::PartialFailed,
            "completed" => Self::Completed,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// Who carries the installment interest on an interest-free plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestPayer {
    Buyer,
    CardCompany,
    Merchant,
    Unknown(String),
}

impl InterestPayer {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "buyer" => Self::Buyer,
            "card_company" => Self::CardCompany,
            "merchant" => Self::Merchant,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// Settlement progress for transfer, mobile-phone, and gift-certificate
/// payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Incompleted,
    Completed,
    Unknown(String),
}

impl SettlementStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "incompleted" => Self::Incompleted,
            "completed" => Self::Completed,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// Status of one cancellation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelStatus {
    Done,
    Unknown(String),
}

impl CancelStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "done" => Self::Done,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// Card payment details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub amount: Option<i64>,
    pub issuer_code: Option<String>,
    /// Issuer code resolved through the card-issuer table. Absent when
    /// the provider sent no issuer code at all; `Unknown` when it sent a
    /// code the table does not cover.
    pub card_name: Option<CodeName>,
    pub acquirer_code: Option<String>,
    pub number: Option<String>,
    pub installment_plan_months: Option<i64>,
    pub approve_no: Option<String>,
    pub use_card_point: Option<bool>,
    pub card_type: Option<String>,
    pub owner_type: Option<String>,
    pub acquire_status: Option<AcquireStatus>,
    pub is_interest_free: Option<bool>,
    pub interest_payer: Option<InterestPayer>,
}

/// Account the provider refunds a virtual-account payment into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundReceiveAccount {
    pub bank_code: Option<String>,
    pub bank_name: Option<CodeName>,
    pub account_number: Option<String>,
    pub holder_name: Option<String>,
}

/// Virtual-account payment details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualAccount {
    pub account_type: Option<String>,
    pub account_number: Option<String>,
    pub bank_code: Option<String>,
    pub bank_name: Option<CodeName>,
    pub customer_name: Option<String>,
    pub due_date: Option<DateTime<FixedOffset>>,
    pub refund_status: Option<RefundStatus>,
    pub expired: Option<bool>,
    pub settlement_status: Option<SettlementStatus>,
    pub refund_receive_account: Option<RefundReceiveAccount>,
}

/// Mobile-phone payment details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobilePhone {
    pub customer_mobile_phone: Option<String>,
    pub settlement_status: Option<SettlementStatus>,
    pub receipt_url: Option<String>,
}

/// Gift-certificate payment details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GiftCertificate {
    pub approve_no: Option<String>,
    pub settlement_status: Option<SettlementStatus>,
}

/// Bank-transfer payment details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub bank_code: Option<String>,
    pub bank_name: Option<CodeName>,
    pub settlement_status: Option<SettlementStatus>,
}

/// Easy-pay (wallet) payment details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EasyPay {
    pub provider: Option<String>,
    pub amount: Option<i64>,
    pub discount_amount: Option<i64>,
}

/// Cash receipt issued for the payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashReceipt {
    pub receipt_type: Option<String>,
    pub receipt_key: Option<String>,
    pub issue_number: Option<String>,
    pub receipt_url: Option<String>,
    pub amount: Option<i64>,
    pub tax_free_amount: Option<i64>,
}

/// Discount applied by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discount {
    pub amount: Option<i64>,
}

/// Failure details on an aborted payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Receipt URL holder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub url: Option<String>,
}

/// Checkout URL holder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkout {
    pub url: Option<String>,
}

/// One cancellation/refund event on a payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cancel {
    pub cancel_amount: Option<i64>,
    pub cancel_reason: Option<String>,
    pub tax_free_amount: Option<i64>,
    pub tax_exemption_amount: Option<i64>,
    pub refundable_amount: Option<i64>,
    pub easy_pay_discount_amount: Option<i64>,
    /// When the cancellation happened. Required on every entry.
    pub canceled_at: DateTime<FixedOffset>,
    pub transaction_key: Option<String>,
    pub receipt_key: Option<String>,
    pub cancel_status: Option<CancelStatus>,
    pub cancel_request_id: Option<String>,
}

/// Full normalized state of one payment transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub version: Option<String>,
    /// Provider key identifying this payment.
    pub payment_key: String,
    pub payment_type: Option<PaymentType>,
    /// Merchant order id the payment was created under.
    pub order_id: String,
    pub order_name: Option<String>,
    pub m_id: Option<String>,
    pub currency: String,
    /// Payment means; absent on a freshly created checkout payment
    /// before the customer picks one.
    pub method: Option<PayMethod>,
    pub total_amount: i64,
    /// Amount still cancelable.
    pub balance_amount: i64,
    pub status: PaymentStatus,
    pub requested_at: DateTime<FixedOffset>,
    /// Absent until the payment is approved.
    pub approved_at: Option<DateTime<FixedOffset>>,
    pub use_escrow: Option<bool>,
    pub last_transaction_key: Option<String>,
    pub supplied_amount: Option<i64>,
    pub vat: Option<i64>,
    pub culture_expense: Option<bool>,
    pub tax_free_amount: Option<i64>,
    pub tax_exemption_amount: Option<i64>,
    pub is_partial_cancelable: Option<bool>,
    /// Cancellation history. `None` when the provider omitted the field,
    /// `Some(vec![])` when it sent an explicitly empty list.
    pub cancels: Option<Vec<Cancel>>,
    pub secret: Option<String>,
    pub country: Option<String>,
    pub card: Option<Card>,
    pub virtual_account: Option<VirtualAccount>,
    pub mobile_phone: Option<MobilePhone>,
    pub gift_certificate: Option<GiftCertificate>,
    pub transfer: Option<Transfer>,
    pub easy_pay: Option<EasyPay>,
    pub cash_receipt: Option<CashReceipt>,
    pub discount: Option<Discount>,
    pub failure: Option<Failure>,
    pub receipt: Option<Receipt>,
    pub checkout: Option<Checkout>,
}

/// Borrowed view of the single populated payment-method detail object.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodDetail<'a> {
    Card(&'a Card),
    VirtualAccount(&'a VirtualAccount),
    MobilePhone(&'a MobilePhone),
    GiftCertificate(&'a GiftCertificate),
    Transfer(&'a Transfer),
}

impl Payment {
    /// The populated method-detail object, when exactly one of
    /// card/virtual_account/mobile_phone/gift_certificate/transfer is
    /// present. Returns `None` when none or several are populated; the
    /// normalizer itself never enforces this cross-field consistency, it
    /// reflects whatever the provider sent.
    pub fn method_detail(&self) -> Option<MethodDetail<'_>> {
        let mut found = None;
        let mut count = 0;
        if let Some(card) = &self.card {
            found = Some(MethodDetail::Card(card));
            count += 1;
        }
        if let Some(va) = &self.virtual_account {
            found = Some(MethodDetail::VirtualAccount(va));
            count += 1;
        }
        if let Some(mp) = &self.mobile_phone {
            found = Some(MethodDetail::MobilePhone(mp));
            count += 1;
        }
        if let Some(gc) = &self.gift_certificate {
            found = Some(MethodDetail::GiftCertificate(gc));
            count += 1;
        }
        if let Some(tr) = &self.transfer {
            found = Some(MethodDetail::Transfer(tr));
            count += 1;
        }
        if count == 1 {
            found
        } else {
            None
        }
    }
}

/// Outcome of a recurring-billing authorization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Billing {
    pub m_id: String,
    /// Merchant-side customer identifier the billing key is bound to.
    pub customer_key: String,
    pub authenticated_at: DateTime<FixedOffset>,
    pub method: Option<PayMethod>,
    /// Token authorizing future recurring charges.
    pub billing_key: String,
    pub card: Card,
}

impl Serialize for CodeName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(PaymentStatus::parse("DONE"), PaymentStatus::Done);
        assert_eq!(PaymentStatus::parse("done"), PaymentStatus::Done);
        assert_eq!(PaymentStatus::parse("Done"), PaymentStatus::Done);
        assert_eq!(
            PaymentStatus::parse("WAITING_FOR_DEPOSIT"),
            PaymentStatus::WaitingForDeposit
        );
    }

    #[test]
    fn unrecognized_status_keeps_the_raw_string() {
        assert_eq!(
            PaymentStatus::parse("SOMETHING_NEW"),
            PaymentStatus::Unknown("SOMETHING_NEW".to_string())
        );
    }

    #[test]
    fn pay_method_parses_wire_words() {
        assert_eq!(PayMethod::parse("카드"), PayMethod::Card);
        assert_eq!(PayMethod::parse("가상계좌"), PayMethod::VirtualAccount);
        assert_eq!(PayMethod::parse("간편결제"), PayMethod::EasyPay);
        assert_eq!(
            PayMethod::parse("포인트"),
            PayMethod::Unknown("포인트".to_string())
        );
    }

    #[test]
    fn nested_enum_parsers_are_total() {
        assert_eq!(AcquireStatus::parse("COMPLETED"), AcquireStatus::Completed);
        assert_eq!(RefundStatus::parse("NONE"), RefundStatus::None);
        assert_eq!(InterestPayer::parse("BUYER"), InterestPayer::Buyer);
        assert_eq!(
            SettlementStatus::parse("INCOMPLETED"),
            SettlementStatus::Incompleted
        );
        assert_eq!(
            InterestPayer::parse("SOMEONE"),
            InterestPayer::Unknown("SOMEONE".to_string())
        );
    }

    fn minimal_payment() -> Payment {
        Payment {
            version: None,
            payment_key: "pk".to_string(),
            payment_type: None,
            order_id: "order".to_string(),
            order_name: None,
            m_id: None,
            currency: "KRW".to_string(),
            method: None,
            total_amount: 1000,
            balance_amount: 1000,
            status: PaymentStatus::Done,
            requested_at: "2023-01-01T00:00:00+09:00".parse().unwrap(),
            approved_at: None,
            use_escrow: None,
            last_transaction_key: None,
            supplied_amount: None,
            vat: None,
            culture_expense: None,
            tax_free_amount: None,
            tax_exemption_amount: None,
            is_partial_cancelable: None,
            cancels: None,
            secret: None,
            country: None,
            card: None,
            virtual_account: None,
            mobile_phone: None,
            gift_certificate: None,
            transfer: None,
            easy_pay: None,
            cash_receipt: None,
            discount: None,
            failure: None,
            receipt: None,
            checkout: None,
        }
    }

    #[test]
    fn method_detail_requires_exactly_one_populated_object() {
        let mut payment = minimal_payment();
        assert_eq!(payment.method_detail(), None);

        payment.transfer = Some(Transfer {
            bank_code: None,
            bank_name: None,
            settlement_status: None,
        });
        assert!(matches!(
            payment.method_detail(),
            Some(MethodDetail::Transfer(_))
        ));

        payment.mobile_phone = Some(MobilePhone {
            customer_mobile_phone: None,
            settlement_status: None,
            receipt_url: None,
        });
        assert_eq!(payment.method_detail(), None);
    }

    #[test]
    fn api_response_accessors() {
        let ok: ApiResponse<i32> = ApiResponse::Success(1);
        assert!(ok.is_success());
        assert_eq!(ok.success(), Some(1));

        let err: ApiResponse<i32> = ApiResponse::Failure(ProviderError {
            code: "NOT_FOUND_PAYMENT".to_string(),
            message: None,
            data: None,
        });
        assert!(!err.is_success());
        assert_eq!(err.failure().unwrap().code, "NOT_FOUND_PAYMENT");
    }
}
