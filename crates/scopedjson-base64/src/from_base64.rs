//! Standard base64 decoding function.

use crate::create_from_base64;
use crate::Base64Error;

/// Decodes a standard base64 string to bytes.
///
/// # Example
///
/// ```
/// use scopedjson_base64::from_base64;
///
/// assert_eq!(from_base64("aGVsbG8=").unwrap(), b"hello");
/// ```
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, Base64Error> {
    let decoder = create_from_base64(None, false)?;
    decoder(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        assert_eq!(from_base64("Zm9vYmFy").unwrap(), b"foobar");
    }

    #[test]
    fn test_empty() {
        assert_eq!(from_base64("").unwrap(), b"");
    }

    #[test]
    fn test_invalid_length() {
        assert!(from_base64("abc").is_err());
    }
}
