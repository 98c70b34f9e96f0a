//! Business logic services.

/// Payment creation, validation, and confirmation
pub mod payment_service;
/// PIX BR Code generation (EMV TLV + CRC16)
pub mod pix;
