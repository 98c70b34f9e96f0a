//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Identity Errors**: Missing or unparseable identity headers
/// - **Authorization Errors**: Caller lacks ownership or a privileged role
/// - **Resource Errors**: Requested transaction not found
/// - **Validation Errors**: Invalid or incomplete request data
///
/// All failures are synchronous and local: no external payment network is
/// ever called, so there is no retry or reconciliation path.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Identity headers are missing or malformed.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Missing or invalid identity headers")]
    InvalidIdentity,

    /// Caller is neither the owner of the transaction nor privileged.
    ///
    /// Returns HTTP 403 Forbidden. The message deliberately reveals nothing
    /// about the record's contents.
    #[error("Not allowed to confirm this payment")]
    Forbidden,

    /// No ledger entry exists for the requested transaction id.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// A card payment was requested without card details.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Card details are required for card payments")]
    MissingCardDetails,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidIdentity` → 401 Unauthorized
/// - `Forbidden` → 403 Forbidden
/// - `TransactionNotFound` → 404 Not Found
/// - `MissingCardDetails` → 422 Unprocessable Entity
/// - `InvalidRequest` → 400 Bad Request
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidIdentity => (
                StatusCode::UNAUTHORIZED,
                "invalid_identity",
                self.to_string(),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            AppError::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                "transaction_not_found",
                self.to_string(),
            ),
            AppError::MissingCardDetails => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing_card_details",
                self.to_string(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
