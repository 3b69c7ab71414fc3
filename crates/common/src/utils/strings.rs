use eyre::{bail, eyre, Result};

use crate::constants::LINK_PLACEHOLDER_REGEX;

/// Decodes a hex string into a vector of bytes
///
/// ```
/// use forseti_common::utils::strings::decode_hex;
///
/// let hex = "0x6080604052"; // PUSH1 0x80 PUSH1 0x40 MSTORE
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![0x60, 0x80, 0x60, 0x40, 0x52]);
/// ```
pub fn decode_hex(mut s: &str) -> Result<Vec<u8>> {
    // normalize
    s = s.trim();
    s = s.strip_prefix("0x").unwrap_or(s);

    if s.is_empty() {
        return Ok(vec![]);
    }

    if s.len() % 2 != 0 {
        bail!("invalid hex string: odd number of digits ({})", s.len());
    }

    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| eyre!("invalid hex string: {}", s))
}

/// Decodes an unlinked solc bytecode object. Library placeholders (`__$...$__` and the legacy
/// `__Name___` form) are replaced with zero bytes, so the result lines up with the offsets in the
/// compiler's link reference table.
///
/// ```
/// use forseti_common::utils::strings::decode_unlinked_hex;
///
/// let object = "73__$5e1d4a34ad2a6bf1e61e4d3bf36c2bd4b2$__3014";
/// let bytes = decode_unlinked_hex(object).expect("should decode object");
/// assert_eq!(bytes.len(), 23);
/// assert_eq!(&bytes[1..21], &[0u8; 20]);
/// ```
pub fn decode_unlinked_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if !s.contains('_') {
        return decode_hex(s);
    }

    let mut linked = String::with_capacity(s.len());
    let mut last = 0;
    for placeholder in LINK_PLACEHOLDER_REGEX.find_iter(s) {
        let placeholder =
            placeholder.map_err(|e| eyre!("failed to scan for link placeholders: {}", e))?;
        linked.push_str(&s[last..placeholder.start()]);
        linked.push_str(&"0".repeat(placeholder.end() - placeholder.start()));
        last = placeholder.end();
    }
    linked.push_str(&s[last..]);

    decode_hex(&linked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_with_prefix() {
        assert_eq!(decode_hex("0x00ff").expect("should decode"), vec![0x00, 0xff]);
    }

    #[test]
    fn test_decode_hex_empty() {
        assert!(decode_hex("0x").expect("should decode").is_empty());
        assert!(decode_hex("").expect("should decode").is_empty());
    }

    #[test]
    fn test_decode_hex_odd_length() {
        assert!(decode_hex("0x123").is_err());
    }

    #[test]
    fn test_decode_hex_invalid_digit() {
        assert!(decode_hex("zz").is_err());
    }

    #[test]
    fn test_decode_unlinked_hex_legacy_placeholder() {
        let object = format!("60{}00", "__contracts/Math.sol:Math_______________");
        let bytes = decode_unlinked_hex(&object).expect("should decode");

        assert_eq!(bytes.len(), 22);
        assert_eq!(bytes[0], 0x60);
        assert!(bytes[1..21].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_decode_unlinked_hex_multiple_placeholders() {
        let placeholder = "__$5e1d4a34ad2a6bf1e61e4d3bf36c2bd4b2$__";
        let object = format!("73{placeholder}6073{placeholder}");
        let bytes = decode_unlinked_hex(&object).expect("should decode");

        assert_eq!(bytes.len(), 43);
        assert_eq!(bytes[21], 0x60);
        assert_eq!(bytes[22], 0x73);
    }
}
