//! Serial number parsing and canonical keys.
//!
//! Serials may be supplied as `:` or `-` separated hex bytes (`1a:2b:3c`), or
//! as a plain number that is decimal unless prefixed with `0x` (hex) or `0`
//! (octal). Whatever the input form, the index key is the decimal string.

use x509_parser::num_bigint::BigUint;

use super::errors::{CrlError, CrlResult};

/// Parse a serial number string in any of the accepted encodings
pub fn parse_serial(input: &str) -> CrlResult<BigUint> {
    let parsed = if input.contains(':') {
        parse_hex_formatted(input, ':')
    } else if input.contains('-') {
        parse_hex_formatted(input, '-')
    } else {
        parse_prefixed(input)
    };

    parsed.ok_or_else(|| CrlError::InvalidSerial(input.to_string()))
}

/// Render the key under which a serial is indexed
pub fn canonical_serial(serial: &BigUint) -> String {
    serial.to_str_radix(10)
}

fn parse_hex_formatted(input: &str, separator: char) -> Option<BigUint> {
    let mut bytes = Vec::new();
    for group in input.split(separator) {
        if group.is_empty() || group.len() > 2 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        bytes.push(u8::from_str_radix(group, 16).ok()?);
    }
    Some(BigUint::from_bytes_be(&bytes))
}

fn parse_prefixed(input: &str) -> Option<BigUint> {
    let (digits, radix) = if let Some(rest) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        (rest, 16)
    } else if input.len() > 1 && input.starts_with('0') {
        (&input[1..], 8)
    } else {
        (input, 10)
    };

    // num-bigint tolerates '+' and '_', serials must not
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    BigUint::parse_bytes(digits.as_bytes(), radix)
}
