//! Factory function for creating base64 string encoders with custom alphabets.

use crate::constants::ALPHABET;
use crate::Base64Error;

/// Creates a base64 string encoder function with a custom alphabet.
///
/// # Arguments
///
/// * `chars` - A 64-character string representing the base64 alphabet. Defaults to standard base64.
/// * `pad` - The padding string. Defaults to "=". Use an empty string for no padding.
///
/// # Errors
///
/// Returns an error if `chars` is not exactly 64 characters long.
///
/// # Example
///
/// ```
/// use scopedjson_base64::create_to_base64;
///
/// let encode = create_to_base64(None, None).unwrap();
/// assert_eq!(encode(b"hello", 5), "aGVsbG8=");
/// ```
pub fn create_to_base64(
    chars: Option<&str>,
    pad: Option<&str>,
) -> Result<impl Fn(&[u8], usize) -> String, Base64Error> {
    let chars = chars.unwrap_or(ALPHABET);
    let pad = pad.unwrap_or("=").to_string();

    if chars.len() != 64 {
        return Err(Base64Error::InvalidCharSetLength);
    }

    let table: Vec<u8> = chars.bytes().collect();

    Ok(move |uint8: &[u8], length: usize| -> String {
        let length = length.min(uint8.len());
        let mut out = String::with_capacity((length * 4 / 3) + 4);

        let extra_length = length % 3;
        let base_length = length - extra_length;

        let mut i = 0;
        while i < base_length {
            let o1 = uint8[i];
            let o2 = uint8[i + 1];
            let o3 = uint8[i + 2];
            let v1 = ((o1 as usize) << 4) | ((o2 as usize) >> 4);
            let v2 = (((o2 & 0b1111) as usize) << 8) | (o3 as usize);

            out.push(table[v1 >> 6] as char);
            out.push(table[v1 & 0x3f] as char);
            out.push(table[v2 >> 6] as char);
            out.push(table[v2 & 0x3f] as char);
            i += 3;
        }

        if extra_length == 1 {
            let o1 = uint8[base_length];
            let v1 = (o1 as usize) << 4;
            out.push(table[v1 >> 6] as char);
            out.push(table[v1 & 0x3f] as char);
            out.push_str(&pad);
            out.push_str(&pad);
        } else if extra_length == 2 {
            let o1 = uint8[base_length];
            let o2 = uint8[base_length + 1];
            let v1 = ((o1 as usize) << 4) | ((o2 as usize) >> 4);
            let v2 = ((o2 & 0b1111) as usize) << 2;

            out.push(table[v1 >> 6] as char);
            out.push(table[v1 & 0x3f] as char);
            out.push(table[v2] as char);
            out.push_str(&pad);
        }

        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet() {
        let encode = create_to_base64(None, None).unwrap();
        assert_eq!(encode(b"foobar", 6), "Zm9vYmFy");
    }

    #[test]
    fn test_no_padding() {
        let encode = create_to_base64(None, Some("")).unwrap();
        assert_eq!(encode(b"fo", 2), "Zm8");
    }

    #[test]
    fn test_invalid_alphabet_length() {
        assert_eq!(
            create_to_base64(Some("abc"), None).err(),
            Some(Base64Error::InvalidCharSetLength)
        );
    }
}
