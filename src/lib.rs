//! Client library for the Toss Payments v1 REST API.
//!
//! Builds authenticated requests for the payment lifecycle (create,
//! confirm, look up, cancel, virtual accounts, recurring billing) and
//! normalizes the provider's heterogeneous JSON responses into a small
//! typed result model. Provider-signaled failures come back as
//! [`ApiResponse::Failure`] values for the caller to branch on; contract
//! violations (a success-shaped payload missing a required field) surface
//! as hard [`Error`]s naming the offending field.

pub mod client;
pub mod codes;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod normalize;
pub mod transport;
pub mod types;

pub use client::{
    BillingAuthCardRequest, BillingAuthIssueRequest, BillingChargeRequest, CancelRequest,
    ConfirmRequest, RefundAccountRequest, TossClient,
};
pub use codes::{bank_name, card_issuer_name, CodeName};
pub use config::Config;
pub use error::{ApiResult, Error};
pub use transport::{HttpTransport, Transport};
pub use types::{
    ApiResponse, Billing, Cancel, Card, PayMethod, Payment, PaymentStatus, ProviderError,
};
