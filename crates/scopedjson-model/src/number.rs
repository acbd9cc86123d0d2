//! Integer and floating-point lexeme parsing for the permissive JSON dialect
//! and for UBJSON's high-precision decimal strings.
//!
//! Integers accept `0x`/`0o`/`0b` base prefixes and `_` as a digit-group
//! separator anywhere between digits. Floats accept the special literals
//! `NaN`, `Infinity`, `-Infinity`, `+Infinity` in addition to ordinary
//! decimal/scientific notation.

/// Strips `_` digit-group separators. Returns `None` if an underscore is
/// not between two digits (leading, trailing, or doubled).
fn strip_digit_separators(s: &str) -> Option<String> {
    if !s.contains('_') {
        return Some(s.to_string());
    }
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let prev_digit = i > 0 && bytes[i - 1].is_ascii_alphanumeric();
            let next_digit = i + 1 < bytes.len() && bytes[i + 1].is_ascii_alphanumeric();
            if !prev_digit || !next_digit {
                return None;
            }
            continue;
        }
        out.push(b as char);
    }
    Some(out)
}

/// Parses an integer lexeme, detecting `0x`/`0o`/`0b` prefixes (with or
/// without a leading `-`), and accepting `_` digit-group separators.
/// Returns `None` on overflow or malformed input.
pub fn parse_integer(lexeme: &str) -> Option<i128> {
    let trimmed = strip_digit_separators(lexeme)?;
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, trimmed.strip_prefix('+').unwrap_or(&trimmed)),
    };

    let (radix, digits) = if let Some(d) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, d)
    } else if let Some(d) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8, d)
    } else if let Some(d) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2, d)
    } else {
        (10, rest)
    };

    if digits.is_empty() {
        return None;
    }

    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a floating-point lexeme, accepting the special tokens `NaN`,
/// `Infinity`, `-Infinity`, `+Infinity` in addition to ordinary decimal and
/// scientific notation. Returns `None` on malformed input.
pub fn parse_float(lexeme: &str) -> Option<f64> {
    match lexeme {
        "NaN" => return Some(f64::NAN),
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    let stripped = strip_digit_separators(lexeme)?;
    stripped.parse::<f64>().ok()
}

/// Parses a UBJSON high-precision number (passed through as a decimal
/// string) into an `f64`. No arbitrary-precision arithmetic is performed;
/// callers that need exact precision should keep the original string.
pub fn parse_high_precision(lexeme: &str) -> Option<f64> {
    parse_float(lexeme)
}
