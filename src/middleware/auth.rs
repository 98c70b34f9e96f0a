//! Header-based identity middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the caller's email and role from identity headers
//! 2. Inject an authentication context into the request
//! 3. Reject requests without an identity with HTTP 401
//!
//! Authentication is deliberately simplified: the caller asserts who they
//! are via headers and no credential is verified. Resolving a real identity
//! (sessions, tokens) is a collaborator concern outside this service.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;

/// Role attached to a caller's identity.
///
/// Admins and sellers are privileged: they may confirm payments owned by
/// other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Seller,
    Customer,
}

impl UserRole {
    /// Parse the wire value of the `X-User-Role` header.
    fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "seller" => Some(Self::Seller),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }

    /// Whether this role may act on payments it does not own.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Admin | Self::Seller)
    }
}

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Email identifying the caller; recorded as payment owner on creation
    pub email: String,

    /// Role claimed by the caller
    pub role: UserRole,
}

/// Identity middleware function.
///
/// # Headers
///
/// - `X-User-Email` (required): the caller's email
/// - `X-User-Role` (optional): `admin`, `seller`, or `customer`; defaults
///   to `customer` when absent
///
/// # Returns
///
/// - `Ok(Response)` when an identity is present (calls the next handler)
/// - `Err(AppError::InvalidIdentity)` when the email header is missing or
///   malformed, or the role is unrecognized (returns 401)
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let email = request
        .headers()
        .get("X-User-Email")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|email| email.contains('@'))
        .map(str::to_string)
        .ok_or(AppError::InvalidIdentity)?;

    let role = match request.headers().get("X-User-Role") {
        Some(value) => {
            let value = value.to_str().map_err(|_| AppError::InvalidIdentity)?;
            UserRole::parse(value).ok_or(AppError::InvalidIdentity)?
        }
        None => UserRole::Customer,
    };

    // Handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(AuthContext { email, role });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_from_wire_values() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("seller"), Some(UserRole::Seller));
        assert_eq!(UserRole::parse("customer"), Some(UserRole::Customer));
        assert_eq!(UserRole::parse("root"), None);
    }

    #[test]
    fn only_admin_and_seller_are_privileged() {
        assert!(UserRole::Admin.is_privileged());
        assert!(UserRole::Seller.is_privileged());
        assert!(!UserRole::Customer.is_privileged());
    }
}
