//! HTTP request handlers organized by resource.

/// Health check endpoint
pub mod health;
/// Payment creation and confirmation endpoints
pub mod payments;
