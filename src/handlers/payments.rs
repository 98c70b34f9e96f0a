//! Payment HTTP handlers.
//!
//! This module implements the payment API endpoints:
//! - GET /api/v1/payments/options - Supported gateways, brands, and methods
//! - POST /api/v1/payments - Create a payment (card or PIX)
//! - POST /api/v1/payments/:transaction_id/confirm - Confirm a pending PIX payment

use crate::{
    AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::payment::{
        PaymentConfirmResponse, PaymentCreateRequest, PaymentOptionsResponse, PaymentResponse,
    },
    services::payment_service,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

/// List the static payment options supported by the checkout.
///
/// # Endpoint
///
/// `GET /api/v1/payments/options`
///
/// No authentication and no side effects; the storefront uses this to
/// render the checkout form.
///
/// # Response (200)
///
/// ```json
/// {
///   "gateways": ["pagseguro", "mercadopago", "stripe", "paypal"],
///   "card_brands": ["visa", "mastercard", "elo", "amex", "hipercard"],
///   "methods": ["card", "pix"]
/// }
/// ```
pub async fn payment_options() -> Json<PaymentOptionsResponse> {
    Json(PaymentOptionsResponse {
        gateways: &["pagseguro", "mercadopago", "stripe", "paypal"],
        card_brands: &["visa", "mastercard", "elo", "amex", "hipercard"],
        methods: &["card", "pix"],
    })
}

/// Create a payment.
///
/// # Endpoint
///
/// `POST /api/v1/payments`
///
/// # Behavior
///
/// - `method = "pix"`: a BR Code is generated and the payment waits in
///   `pending` until confirmed; the response carries the `pix` block with
///   the code, a QR rendering URL, and the expiry (30 minutes out)
/// - `method = "card"`: the authorization is simulated and the payment is
///   `approved` immediately, no `pix` block
///
/// # Responses
///
/// - **201 Created**: payment stored, body is a `PaymentResponse`
/// - **422**: method is card but no card details were sent
/// - **400**: invalid amount, currency, customer, items, or card shape
/// - **401**: missing identity headers
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<PaymentCreateRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    let response = payment_service::create_payment(&state.ledger, &state.config, &auth, request)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Confirm a pending PIX payment.
///
/// # Endpoint
///
/// `POST /api/v1/payments/{transaction_id}/confirm`
///
/// # Authorization
///
/// Only the payment's owner, or a caller with the `admin` or `seller`
/// role, may confirm it.
///
/// # Responses
///
/// - **200 OK**: payment approved (idempotent — confirming an already
///   approved payment also returns 200 with an informational message)
/// - **404**: unknown transaction id
/// - **403**: caller is neither the owner nor privileged
/// - **400**: payment is not PIX, or its code has expired
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(transaction_id): Path<String>,
) -> Result<Json<PaymentConfirmResponse>, AppError> {
    let response = payment_service::confirm_payment(&state.ledger, &transaction_id, &auth)?;
    Ok(Json(response))
}
