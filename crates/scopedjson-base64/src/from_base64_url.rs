//! URL-safe base64 decoding function.

use crate::create_from_base64;
use crate::Base64Error;

const ALPHABET_URL: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Decodes a URL-safe, unpadded base64 string to bytes.
///
/// # Example
///
/// ```
/// use scopedjson_base64::from_base64_url;
///
/// assert_eq!(from_base64_url("aGVsbG8gd29ybGQ").unwrap(), b"hello world");
/// ```
pub fn from_base64_url(encoded: &str) -> Result<Vec<u8>, Base64Error> {
    let decoder = create_from_base64(Some(ALPHABET_URL), true)?;
    decoder(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        assert_eq!(from_base64_url("aGVsbG8").unwrap(), b"hello");
    }
}
