//! Static descriptors for the provider's logical operations.
//!
//! Each operation names its HTTP verb, its path template, which normalizer
//! path applies to its success payload, and which secret-key slot signs the
//! request. The client consults these to build and dispatch requests.

/// HTTP verb an operation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

/// Which normalizer path the success payload takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePath {
    Payment,
    Billing,
}

/// Which configured secret key signs the request. The provider issues
/// separate credentials for recurring-billing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    Standard,
    Billing,
}

/// One logical operation against the provider API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub verb: Verb,
    /// Path template; `{placeholder}` segments are filled positionally.
    pub path: &'static str,
    pub response: ResponsePath,
    pub key_slot: KeySlot,
}

impl Endpoint {
    /// Render the path template, substituting `{placeholder}` segments
    /// with `args` in order.
    pub fn render_path(&self, args: &[&str]) -> String {
        let mut rendered = String::with_capacity(self.path.len());
        let mut rest = self.path;
        let mut args = args.iter();
        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let close = rest[open..]
                .find('}')
                .map(|i| open + i)
                .unwrap_or(rest.len() - 1);
            match args.next() {
                Some(arg) => rendered.push_str(arg),
                None => rendered.push_str(&rest[open..=close]),
            }
            rest = &rest[close + 1..];
        }
        rendered.push_str(rest);
        rendered
    }
}

pub const CREATE_PAYMENT: Endpoint = Endpoint {
    name: "create_payment",
    verb: Verb::Post,
    path: "/v1/payments",
    response: ResponsePath::Payment,
    key_slot: KeySlot::Standard,
};

pub const CONFIRM_PAYMENT: Endpoint = Endpoint {
    name: "confirm_payment",
    verb: Verb::Post,
    path: "/v1/payments/confirm",
    response: ResponsePath::Payment,
    key_slot: KeySlot::Standard,
};

pub const FIND_PAYMENT: Endpoint = Endpoint {
    name: "find_payment",
    verb: Verb::Get,
    path: "/v1/payments/{paymentKey}",
    response: ResponsePath::Payment,
    key_slot: KeySlot::Standard,
};

pub const FIND_PAYMENT_BY_ORDER_ID: Endpoint = Endpoint {
    name: "find_payment_by_order_id",
    verb: Verb::Get,
    path: "/v1/payments/orders/{orderId}",
    response: ResponsePath::Payment,
    key_slot: KeySlot::Standard,
};

pub const CANCEL_PAYMENT: Endpoint = Endpoint {
    name: "cancel_payment",
    verb: Verb::Post,
    path: "/v1/payments/{paymentKey}/cancel",
    response: ResponsePath::Payment,
    key_slot: KeySlot::Standard,
};

pub const KEY_IN_PAYMENT: Endpoint = Endpoint {
    name: "key_in_payment",
    verb: Verb::Post,
    path: "/v1/payments/key-in",
    response: ResponsePath::Payment,
    key_slot: KeySlot::Standard,
};

pub const CREATE_VIRTUAL_ACCOUNT: Endpoint = Endpoint {
    name: "create_virtual_account",
    verb: Verb::Post,
    path: "/v1/virtual-accounts",
    response: ResponsePath::Payment,
    key_slot: KeySlot::Standard,
};

pub const BILLING_AUTH_CARD: Endpoint = Endpoint {
    name: "billing_auth_card",
    verb: Verb::Post,
    path: "/v1/billing/authorizations/card",
    response: ResponsePath::Billing,
    key_slot: KeySlot::Billing,
};

pub const BILLING_AUTH_ISSUE: Endpoint = Endpoint {
    name: "billing_auth_issue",
    verb: Verb::Post,
    path: "/v1/billing/authorizations/issue",
    response: ResponsePath::Billing,
    key_slot: KeySlot::Billing,
};

// A billing-key charge returns a full payment object.
pub const BILLING_CHARGE: Endpoint = Endpoint {
    name: "billing_charge",
    verb: Verb::Post,
    path: "/v1/billing/{billingKey}",
    response: ResponsePath::Payment,
    key_slot: KeySlot::Billing,
};

/// All logical operations, in provider-documentation order.
pub const OPERATIONS: &[Endpoint] = &[
    CREATE_PAYMENT,
    CONFIRM_PAYMENT,
    FIND_PAYMENT,
    FIND_PAYMENT_BY_ORDER_ID,
    CANCEL_PAYMENT,
    KEY_IN_PAYMENT,
    CREATE_VIRTUAL_ACCOUNT,
    BILLING_AUTH_CARD,
    BILLING_AUTH_ISSUE,
    BILLING_CHARGE,
];
