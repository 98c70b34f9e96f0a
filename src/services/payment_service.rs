//! Payment service - Core business logic for creating and confirming payments.
//!
//! This service handles:
//! - Request validation (amount, currency, customer, card shape)
//! - Transaction id generation
//! - BR Code generation for PIX payments
//! - Status transitions via the ledger
//!
//! No gateway or settlement network is ever called: card authorizations are
//! simulated (approved synchronously) and PIX payments wait for an explicit
//! confirmation request.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppError,
    ledger::PaymentLedger,
    middleware::auth::AuthContext,
    models::payment::{
        CardPaymentInput, PaymentConfirmResponse, PaymentCreateRequest, PaymentMethod,
        PaymentRecord, PaymentResponse, PaymentStatus, PixPaymentData,
    },
    services::pix,
};

/// PIX codes stop being confirmable this long after creation.
const PIX_EXPIRY_MINUTES: i64 = 30;

/// Create a payment and store it in the ledger.
///
/// # Process
///
/// 1. Validate the request (positive amount, 3-letter currency, customer
///    shape, card details when method is card)
/// 2. Generate a fresh opaque transaction id
/// 3. PIX: build the BR Code from the configured key and merchant identity,
///    derive the QR rendering URL, status starts `Pending` with a 30-minute
///    expiry
/// 4. Card: simulated authorization, status is `Approved` immediately
/// 5. Store the record with the caller as owner and return the response
///
/// # Errors
///
/// - `MissingCardDetails`: method is card but no card block was sent
/// - `InvalidRequest`: amount, currency, customer, items, or card shape invalid
pub fn create_payment(
    ledger: &PaymentLedger,
    config: &Config,
    auth: &AuthContext,
    request: PaymentCreateRequest,
) -> Result<PaymentResponse, AppError> {
    validate_request(&request)?;

    let currency = request.currency.to_uppercase();
    let transaction_id = new_transaction_id();
    let created_at = Utc::now();

    let record = match request.method {
        PaymentMethod::Pix => {
            let qr_code_text = pix::build_pix_code(
                &config.pix_key,
                &config.merchant_name,
                &config.merchant_city,
                request.amount,
            );
            let qr_code_url = pix::qr_code_url(&qr_code_text);

            PaymentRecord {
                transaction_id,
                status: PaymentStatus::Pending,
                gateway: request.gateway,
                method: request.method,
                amount: request.amount,
                currency,
                message: "PIX code generated. Awaiting payment confirmation.".to_string(),
                pix: Some(PixPaymentData {
                    pix_key: config.pix_key.clone(),
                    qr_code_text,
                    qr_code_url,
                    expires_at: created_at + Duration::minutes(PIX_EXPIRY_MINUTES),
                }),
                owner_email: auth.email.clone(),
                created_at,
            }
        }
        PaymentMethod::Card => PaymentRecord {
            transaction_id,
            status: PaymentStatus::Approved,
            gateway: request.gateway,
            method: request.method,
            amount: request.amount,
            currency,
            message: "Card payment approved.".to_string(),
            pix: None,
            owner_email: auth.email.clone(),
            created_at,
        },
    };

    tracing::info!(
        transaction_id = %record.transaction_id,
        method = ?record.method,
        status = ?record.status,
        amount = %record.amount,
        "payment created"
    );

    ledger.insert(record.clone());
    Ok(record.into())
}

/// Confirm a PIX payment on behalf of the caller.
///
/// Ownership and expiry checks, plus the status transition itself, happen
/// inside the ledger under a single lock. Confirming an already approved
/// payment is not an error; it returns success with an informational
/// message.
pub fn confirm_payment(
    ledger: &PaymentLedger,
    transaction_id: &str,
    auth: &AuthContext,
) -> Result<PaymentConfirmResponse, AppError> {
    let outcome = ledger.confirm_pix(
        transaction_id,
        &auth.email,
        auth.role.is_privileged(),
        Utc::now(),
    )?;

    let message = if outcome.already_confirmed {
        "PIX payment was already confirmed.".to_string()
    } else {
        tracing::info!(transaction_id, "PIX payment confirmed");
        outcome.record.message.clone()
    };

    Ok(PaymentConfirmResponse {
        transaction_id: outcome.record.transaction_id,
        status: outcome.record.status,
        message,
    })
}

/// Generate a fresh opaque transaction id: `txn_` plus 18 hex characters of
/// a v4 UUID. Collision-free per call, no shared counter.
fn new_transaction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("txn_{}", &hex[..18])
}

fn validate_request(request: &PaymentCreateRequest) -> Result<(), AppError> {
    if request.amount <= Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "Amount must be positive".to_string(),
        ));
    }

    if request.currency.len() != 3 || !request.currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::InvalidRequest(
            "Currency must be a 3-letter code".to_string(),
        ));
    }

    if request.customer.name.trim().len() < 2 {
        return Err(AppError::InvalidRequest(
            "Customer name must have at least 2 characters".to_string(),
        ));
    }

    if !request.customer.email.contains('@') {
        return Err(AppError::InvalidRequest(
            "Customer email is invalid".to_string(),
        ));
    }

    for item in &request.items {
        if item.quantity == 0 {
            return Err(AppError::InvalidRequest(format!(
                "Item {} must have a quantity of at least 1",
                item.id
            )));
        }
        if item.unit_price <= Decimal::ZERO {
            return Err(AppError::InvalidRequest(format!(
                "Item {} must have a positive unit price",
                item.id
            )));
        }
    }

    if request.method == PaymentMethod::Card {
        match &request.card {
            None => return Err(AppError::MissingCardDetails),
            Some(card) => validate_card(card)?,
        }
    }

    Ok(())
}

fn validate_card(card: &CardPaymentInput) -> Result<(), AppError> {
    if card.holder_name.trim().len() < 2 {
        return Err(AppError::InvalidRequest(
            "Card holder name must have at least 2 characters".to_string(),
        ));
    }

    let digits = card.number.chars().filter(|c| c.is_ascii_digit()).count();
    if !(13..=19).contains(&digits) {
        return Err(AppError::InvalidRequest(
            "Card number is invalid".to_string(),
        ));
    }

    if !(4..=5).contains(&card.expiry.len()) {
        return Err(AppError::InvalidRequest(
            "Card expiry is invalid".to_string(),
        ));
    }

    if !(3..=4).contains(&card.cvv.len()) || !card.cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidRequest(
            "CVV must contain only digits".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::UserRole;
    use crate::models::payment::{CardBrand, CartItemInput, CustomerInput, PaymentGateway};

    fn test_config() -> Config {
        Config {
            pix_key: "6841c4e9-5744-434c-81d0-821b48846b22".to_string(),
            server_port: 3000,
            merchant_name: "COMPIA STORE".to_string(),
            merchant_city: "SAO PAULO".to_string(),
        }
    }

    fn customer() -> AuthContext {
        AuthContext {
            email: "ana@example.com".to_string(),
            role: UserRole::Customer,
        }
    }

    fn card_input() -> CardPaymentInput {
        CardPaymentInput {
            holder_name: "ANA SOUZA".to_string(),
            number: "4111 1111 1111 1111".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
            brand: CardBrand::Visa,
        }
    }

    fn request(method: PaymentMethod, card: Option<CardPaymentInput>) -> PaymentCreateRequest {
        PaymentCreateRequest {
            order_id: Some("ord_1".to_string()),
            gateway: PaymentGateway::Mercadopago,
            method,
            amount: "149.90".parse().unwrap(),
            currency: "brl".to_string(),
            items: vec![CartItemInput {
                id: "p1".to_string(),
                title: "Keyboard".to_string(),
                quantity: 1,
                unit_price: "149.90".parse().unwrap(),
            }],
            customer: CustomerInput {
                name: "Ana Souza".to_string(),
                email: "ana@example.com".to_string(),
            },
            card,
        }
    }

    #[test]
    fn card_payment_is_approved_synchronously() {
        let ledger = PaymentLedger::new();
        let response = create_payment(
            &ledger,
            &test_config(),
            &customer(),
            request(PaymentMethod::Card, Some(card_input())),
        )
        .unwrap();

        assert_eq!(response.status, PaymentStatus::Approved);
        assert!(response.pix.is_none());
        assert_eq!(response.currency, "BRL");
        assert!(response.transaction_id.starts_with("txn_"));
    }

    #[test]
    fn card_payment_without_card_details_is_rejected() {
        let ledger = PaymentLedger::new();
        let result = create_payment(
            &ledger,
            &test_config(),
            &customer(),
            request(PaymentMethod::Card, None),
        );
        assert!(matches!(result, Err(AppError::MissingCardDetails)));
    }

    #[test]
    fn pix_payment_starts_pending_with_pix_data() {
        let ledger = PaymentLedger::new();
        let response = create_payment(
            &ledger,
            &test_config(),
            &customer(),
            request(PaymentMethod::Pix, None),
        )
        .unwrap();

        assert_eq!(response.status, PaymentStatus::Pending);
        let pix = response.pix.expect("pix block must be present");
        assert_eq!(pix.pix_key, test_config().pix_key);
        assert!(pix.qr_code_text.starts_with("000201"));
        assert!(pix.qr_code_url.contains("create-qr-code"));

        // Expiry is 30 minutes out
        let stored = ledger.get(&response.transaction_id).unwrap();
        let expires_at = stored.pix.unwrap().expires_at;
        assert_eq!(expires_at - stored.created_at, Duration::minutes(30));
    }

    #[test]
    fn pix_code_embeds_the_requested_amount() {
        let ledger = PaymentLedger::new();
        let response = create_payment(
            &ledger,
            &test_config(),
            &customer(),
            request(PaymentMethod::Pix, None),
        )
        .unwrap();

        let pix = response.pix.unwrap();
        assert!(pix.qr_code_text.contains("5406149.90"));
    }

    #[test]
    fn transaction_ids_are_unique_per_payment() {
        let ledger = PaymentLedger::new();
        let config = test_config();
        let first = create_payment(
            &ledger,
            &config,
            &customer(),
            request(PaymentMethod::Pix, None),
        )
        .unwrap();
        let second = create_payment(
            &ledger,
            &config,
            &customer(),
            request(PaymentMethod::Pix, None),
        )
        .unwrap();

        assert_ne!(first.transaction_id, second.transaction_id);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let ledger = PaymentLedger::new();
        let mut req = request(PaymentMethod::Pix, None);
        req.amount = Decimal::ZERO;
        let result = create_payment(&ledger, &test_config(), &customer(), req);
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn malformed_currency_is_rejected() {
        let ledger = PaymentLedger::new();
        let mut req = request(PaymentMethod::Pix, None);
        req.currency = "REAL".to_string();
        let result = create_payment(&ledger, &test_config(), &customer(), req);
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn card_number_with_too_few_digits_is_rejected() {
        let ledger = PaymentLedger::new();
        let mut card = card_input();
        card.number = "4111".to_string();
        let result = create_payment(
            &ledger,
            &test_config(),
            &customer(),
            request(PaymentMethod::Card, Some(card)),
        );
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn owner_confirms_their_own_pix_payment() {
        let ledger = PaymentLedger::new();
        let auth = customer();
        let created = create_payment(
            &ledger,
            &test_config(),
            &auth,
            request(PaymentMethod::Pix, None),
        )
        .unwrap();

        let confirmed = confirm_payment(&ledger, &created.transaction_id, &auth).unwrap();
        assert_eq!(confirmed.status, PaymentStatus::Approved);
        assert_eq!(confirmed.message, "PIX payment confirmed.");

        // Repeat confirmation succeeds with the informational message
        let repeat = confirm_payment(&ledger, &created.transaction_id, &auth).unwrap();
        assert_eq!(repeat.status, PaymentStatus::Approved);
        assert_eq!(repeat.message, "PIX payment was already confirmed.");
    }

    #[test]
    fn seller_may_confirm_a_customer_payment() {
        let ledger = PaymentLedger::new();
        let created = create_payment(
            &ledger,
            &test_config(),
            &customer(),
            request(PaymentMethod::Pix, None),
        )
        .unwrap();

        let seller = AuthContext {
            email: "seller@example.com".to_string(),
            role: UserRole::Seller,
        };
        let confirmed = confirm_payment(&ledger, &created.transaction_id, &seller).unwrap();
        assert_eq!(confirmed.status, PaymentStatus::Approved);
    }

    #[test]
    fn stranger_cannot_confirm_someone_elses_payment() {
        let ledger = PaymentLedger::new();
        let created = create_payment(
            &ledger,
            &test_config(),
            &customer(),
            request(PaymentMethod::Pix, None),
        )
        .unwrap();

        let stranger = AuthContext {
            email: "other@example.com".to_string(),
            role: UserRole::Customer,
        };
        let result = confirm_payment(&ledger, &created.transaction_id, &stranger);
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
