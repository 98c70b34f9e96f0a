//! Payment data models and API request/response types.
//!
//! This module defines:
//! - `PaymentRecord`: Ledger entry tracking a payment's lifecycle
//! - Enumerations for gateway, method, card brand, and status
//! - Request types for creating payments
//! - `PaymentResponse` / `PaymentConfirmResponse`: Response bodies returned to clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment gateway the client selected at checkout.
///
/// Informational only: no gateway is actually called. The value is echoed
/// back in responses so the storefront can render the right branding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentGateway {
    Pagseguro,
    Mercadopago,
    Stripe,
    Paypal,
}

/// How the customer pays.
///
/// - `Card`: simulated synchronous authorization, approved immediately
/// - `Pix`: generates a BR Code and waits for confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Pix,
}

/// Card brands accepted by the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Elo,
    Amex,
    Hipercard,
}

/// Payment lifecycle status.
///
/// # State Machine
///
/// - `Pending`: initial status for PIX payments, waiting for confirmation
/// - `Approved`: terminal; once approved a payment never transitions again
/// - `Rejected`: reserved for a card decline path (unused — card payments
///   always approve synchronously in this simulated design)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Approved,
    Pending,
    Rejected,
}

/// One cart line item attached to a payment request.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemInput {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Customer identification attached to a payment request.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
}

/// Card details, required when `method` is `card`.
///
/// The card is never charged; values are validated for shape only and
/// discarded after the simulated authorization.
#[derive(Debug, Clone, Deserialize)]
pub struct CardPaymentInput {
    pub holder_name: String,
    pub number: String,
    pub expiry: String,
    pub cvv: String,
    pub brand: CardBrand,
}

/// Request to create a payment.
///
/// # JSON Example
///
/// ```json
/// {
///   "order_id": "ord_123",
///   "gateway": "mercadopago",
///   "method": "pix",
///   "amount": "149.90",
///   "currency": "BRL",
///   "items": [{"id": "p1", "title": "Keyboard", "quantity": 1, "unit_price": "149.90"}],
///   "customer": {"name": "Ana Souza", "email": "ana@example.com"}
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct PaymentCreateRequest {
    /// Optional reference to a previously created order
    pub order_id: Option<String>,

    pub gateway: PaymentGateway,
    pub method: PaymentMethod,

    /// Positive amount, currency-agnostic magnitude
    pub amount: Decimal,

    /// 3-letter currency code, normalized to upper case
    #[serde(default = "default_currency")]
    pub currency: String,

    pub items: Vec<CartItemInput>,
    pub customer: CustomerInput,

    /// Required when `method` is `card`, ignored otherwise
    pub card: Option<CardPaymentInput>,
}

fn default_currency() -> String {
    "BRL".to_string()
}

/// PIX block embedded in responses for PIX payments.
#[derive(Debug, Clone, Serialize)]
pub struct PixPaymentData {
    /// Random-UUID PIX key the code was built for
    pub pix_key: String,

    /// The full BR Code "Copy & Paste" string (EMV TLV + CRC16)
    pub qr_code_text: String,

    /// URL of an external renderer that turns the code into a QR image
    pub qr_code_url: String,

    /// Moment after which confirmation is refused
    pub expires_at: DateTime<Utc>,
}

/// A ledger entry for one payment.
///
/// # Invariants
///
/// - `transaction_id` is generated once and never reused
/// - `pix` is `Some` if and only if `method` is `Pix`
/// - once `status` is `Approved` it never changes again
/// - only `status` and `message` are mutated after creation
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub gateway: PaymentGateway,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub currency: String,

    /// Human-readable status description, rewritten on each transition
    pub message: String,

    pub pix: Option<PixPaymentData>,

    /// Email of the caller who created the payment; confirmation is
    /// restricted to this user or a privileged role
    pub owner_email: String,

    pub created_at: DateTime<Utc>,
}

/// Response returned when a payment is created.
///
/// # JSON Example (PIX)
///
/// ```json
/// {
///   "transaction_id": "txn_90f4a2b1c3d4e5f601",
///   "status": "pending",
///   "gateway": "mercadopago",
///   "method": "pix",
///   "amount": "149.90",
///   "currency": "BRL",
///   "message": "PIX code generated. Awaiting payment confirmation.",
///   "pix": {
///     "pix_key": "6841c4e9-5744-434c-81d0-821b48846b22",
///     "qr_code_text": "000201...6304ABCD",
///     "qr_code_url": "https://api.qrserver.com/v1/create-qr-code/?size=280x280&data=...",
///     "expires_at": "2025-12-21T16:30:00Z"
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub gateway: PaymentGateway,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub currency: String,
    pub message: String,
    pub pix: Option<PixPaymentData>,
}

/// Convert a ledger record into the API response body.
///
/// This drops internal fields (`owner_email`, `created_at`) that clients
/// don't need to see.
impl From<PaymentRecord> for PaymentResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            transaction_id: record.transaction_id,
            status: record.status,
            gateway: record.gateway,
            method: record.method,
            amount: record.amount,
            currency: record.currency,
            message: record.message,
            pix: record.pix,
        }
    }
}

/// Response returned by the confirmation endpoint.
#[derive(Debug, Serialize)]
pub struct PaymentConfirmResponse {
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub message: String,
}

/// Static enumeration of supported gateways, card brands, and methods.
#[derive(Debug, Serialize)]
pub struct PaymentOptionsResponse {
    pub gateways: &'static [&'static str],
    pub card_brands: &'static [&'static str],
    pub methods: &'static [&'static str],
}
