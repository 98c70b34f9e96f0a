//! PIX BR Code generation.
//!
//! Builds the static PIX "Copy & Paste" payment string defined by the
//! Brazilian central bank's adoption of the EMV QR Code specification:
//! a sequence of tag-length-value fields followed by a CRC16-CCITT
//! checksum. Any standards-compliant reader (bank app, QR scanner) must
//! be able to parse the TLV structure and validate the checksum, so the
//! encoding here is bit-exact, not approximate.

use rust_decimal::Decimal;

/// EMV merchant account GUI for PIX.
const PIX_GUI: &str = "BR.GOV.BCB.PIX";

/// Maximum lengths for merchant identity fields per the EMV spec.
const MERCHANT_NAME_MAX: usize = 25;
const MERCHANT_CITY_MAX: usize = 15;

/// Encode one EMV TLV field: 2-character id, 2-digit zero-padded decimal
/// length, then the value itself.
///
/// The value must fit in a 2-digit length (0-99 characters). Longer values
/// are a contract violation; callers truncate beforehand (see
/// [`build_pix_code`] for merchant name/city).
pub fn emv_field(id: &str, value: &str) -> String {
    debug_assert!(id.len() == 2, "EMV field id must be 2 characters");
    debug_assert!(
        value.len() <= 99,
        "EMV field value does not fit a 2-digit length"
    );
    format!("{id}{:02}{value}", value.len())
}

/// Compute the CRC-16/CCITT-FALSE checksum of a payload.
///
/// Initial register `0xFFFF`, polynomial `0x1021`, processed byte by byte
/// MSB-first. Returns the result as 4 uppercase zero-padded hex digits,
/// exactly as appended to the BR Code.
pub fn crc16_ccitt(payload: &str) -> String {
    const POLYNOMIAL: u16 = 0x1021;
    let mut crc: u16 = 0xFFFF;

    for byte in payload.bytes() {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }

    format!("{crc:04X}")
}

/// Build a complete static PIX BR Code.
///
/// Deterministic: the same `(pix_key, merchant_name, merchant_city, amount)`
/// always produces byte-identical output, so a stored code stays valid if
/// regenerated.
///
/// # Field Layout
///
/// | Field | Content |
/// |-------|---------|
/// | 00    | payload format indicator `01` |
/// | 01    | point of initiation `12` (static, reusable) |
/// | 26    | merchant account info: `00` = `BR.GOV.BCB.PIX`, `01` = pix key |
/// | 52    | merchant category code `0000` |
/// | 53    | currency `986` (BRL) |
/// | 54    | amount with exactly 2 decimal digits |
/// | 58    | country code `BR` |
/// | 59    | merchant name, truncated to 25 characters |
/// | 60    | merchant city, truncated to 15 characters |
/// | 62    | additional data: `05` = `***` (no reference label) |
/// | 63    | CRC16-CCITT over everything before it, including `6304` |
pub fn build_pix_code(
    pix_key: &str,
    merchant_name: &str,
    merchant_city: &str,
    amount: Decimal,
) -> String {
    let merchant_account = format!(
        "{}{}",
        emv_field("00", PIX_GUI),
        emv_field("01", pix_key)
    );
    let name = truncate_chars(merchant_name, MERCHANT_NAME_MAX);
    let city = truncate_chars(merchant_city, MERCHANT_CITY_MAX);
    let additional_data = emv_field("05", "***");

    let mut payload = String::new();
    payload.push_str(&emv_field("00", "01"));
    payload.push_str(&emv_field("01", "12"));
    payload.push_str(&emv_field("26", &merchant_account));
    payload.push_str(&emv_field("52", "0000"));
    payload.push_str(&emv_field("53", "986"));
    payload.push_str(&emv_field("54", &format!("{amount:.2}")));
    payload.push_str(&emv_field("58", "BR"));
    payload.push_str(&emv_field("59", &name));
    payload.push_str(&emv_field("60", &city));
    payload.push_str(&emv_field("62", &additional_data));

    // Field 63 header goes into the checksummed region; the CRC itself follows.
    payload.push_str("6304");
    let crc = crc16_ccitt(&payload);
    payload.push_str(&crc);

    payload
}

/// Derive the external QR rendering URL for a BR Code.
///
/// The image is produced by a thin third-party renderer; the code text is
/// the actual wire artifact.
pub fn qr_code_url(code: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(code.as_bytes()).collect();
    format!("https://api.qrserver.com/v1/create-qr-code/?size=280x280&data={encoded}")
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
