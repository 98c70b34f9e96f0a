//! Data models for the payment engine.

/// Payment records, enums, and API request/response types
pub mod payment;
