//! HTTP middleware layers.

/// Header-based identity middleware
pub mod auth;
