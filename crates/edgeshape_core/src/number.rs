//! Numeric literals of the edge format
//!
//! Coordinates are stored in twentieths of a unit (twips). Two spellings
//! exist: plain decimals (`-12.5`) and signed 32-bit fixed-point hex with an
//! 8-bit fraction (`#1A4.80`).

use crate::error::EdgeError;

/// The fixed coordinate scale of the edge format
pub const UNITS_PER_POINT: f64 = 20.0;

/// Fractional scale of the hex fixed-point form
const HEX_FRACTION_SCALE: f64 = 256.0;

const HEX_INT_DIGITS: usize = 6;
const HEX_FRAC_DIGITS: usize = 2;

/// Decode one numeric token into a coordinate
pub fn parse_number(token: &str) -> Result<f64, EdgeError> {
    match token.strip_prefix('#') {
        Some(hex) => parse_hex(hex).ok_or_else(|| EdgeError::malformed(token)),
        None => parse_decimal(token).ok_or_else(|| EdgeError::malformed(token)),
    }
}

/// `-?\d+(\.\d+)?`
fn parse_decimal(token: &str) -> Option<f64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int) || !frac.map_or(true, all_digits) {
        return None;
    }

    token.parse::<f64>().ok().map(|v| v / UNITS_PER_POINT)
}

/// `H{1,6}.H{1,2}`, read as a big-endian two's complement `i32`
fn parse_hex(body: &str) -> Option<f64> {
    let (int, frac) = body.split_once('.')?;

    let hex_run = |s: &str, max: usize| {
        !s.is_empty() && s.len() <= max && s.bytes().all(|b| b.is_ascii_hexdigit())
    };
    if !hex_run(int, HEX_INT_DIGITS) || !hex_run(frac, HEX_FRAC_DIGITS) {
        return None;
    }

    let padded = format!(
        "{:0>iw$}{:0<fw$}",
        int,
        frac,
        iw = HEX_INT_DIGITS,
        fw = HEX_FRAC_DIGITS
    );
    let raw = u32::from_str_radix(&padded, 16).ok()? as i32;

    Some(raw as f64 / HEX_FRACTION_SCALE / UNITS_PER_POINT)
}

/// Render a coordinate as a decimal token
pub fn encode_decimal(value: f64) -> String {
    let scaled = value * UNITS_PER_POINT;
    // f64 Display never uses exponent notation, which the grammar lacks
    if scaled == 0.0 {
        "0".to_string()
    } else {
        format!("{}", scaled)
    }
}

/// Render a coordinate as a hex fixed-point token
///
/// The value is rounded to the nearest 1/5120 of a unit; magnitudes outside
/// the `i32` range saturate.
pub fn encode_hex(value: f64) -> String {
    let raw = (value * UNITS_PER_POINT * HEX_FRACTION_SCALE).round() as i32;
    let bits = raw as u32;
    format!("#{:X}.{:02X}", bits >> 8, bits & 0xFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        assert_eq!(parse_number("200").unwrap(), 10.0);
        assert_eq!(parse_number("-30").unwrap(), -1.5);
        assert_eq!(parse_number("1.5").unwrap(), 0.075);
    }

    #[test]
    fn test_decimal_round_trip() {
        for v in [0.0, 12.5, -3.25, 0.05, 1234.56789, -0.001] {
            let decoded = parse_number(&encode_decimal(v)).unwrap();
            assert!((decoded - v).abs() < 1e-9, "{} -> {}", v, decoded);
        }
    }

    #[test]
    fn test_hex() {
        assert_eq!(parse_number("#3E8.00").unwrap(), 50.0);
        assert_eq!(parse_number("#000000.00").unwrap(), 0.0);
        assert!((parse_number("#004000.00").unwrap() - 819.2).abs() < 1e-9);
        assert_eq!(parse_number("#0.8").unwrap(), 0.025);
    }

    #[test]
    fn test_hex_negative() {
        // 0xFFFF8000 = -32768 -> -128 -> -6.4
        assert!((parse_number("#FFFF80.00").unwrap() + 6.4).abs() < 1e-12);
        assert!(parse_number("#FFFFFF.FF").unwrap() < 0.0);
    }

    #[test]
    fn test_hex_round_trip() {
        for v in [0.0, 50.0, -6.4, 123.456, -0.3] {
            let decoded = parse_number(&encode_hex(v)).unwrap();
            assert!((decoded - v).abs() <= 1.0 / 5120.0, "{} -> {}", v, decoded);
        }
    }

    #[test]
    fn test_malformed() {
        for token in ["", "-", "1.", ".5", "1e3", "#", "#12", "#1234567.00", "#12.345", "#G.0", "abc"] {
            assert!(
                matches!(parse_number(token), Err(EdgeError::MalformedNumber { .. })),
                "{:?} should be malformed",
                token
            );
        }
    }
}
