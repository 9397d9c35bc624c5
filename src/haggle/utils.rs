//! Address helpers shared across the messaging core.

/// Normalizes an EVM-style account address to lowercase hex form.
///
/// Returns `None` when the value does not have the `0x` + 40 hex chars shape.
pub(crate) fn normalize_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex_part = trimmed.strip_prefix("0x")?;
    if hex_part.len() != 40 || hex::decode(hex_part).is_err() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Splits an address in half for two-line display.
///
/// Addresses should not be truncated where a transaction is about to be
/// consummated or where the current user is being identified; this form is
/// for lists where several addresses appear close to each other.
pub fn truncate_address(address: &str) -> (String, String) {
    let mut mid = address.len() / 2;
    while mid > 0 && !address.is_char_boundary(mid) {
        mid -= 1;
    }
    let (head, tail) = address.split_at(mid);
    (head.to_string(), tail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address_lowercases() {
        let raw = "0xAbCd000000000000000000000000000000001234";
        assert_eq!(
            normalize_address(raw),
            Some("0xabcd000000000000000000000000000000001234".to_string())
        );
    }

    #[test]
    fn test_normalize_address_trims_whitespace() {
        let raw = "  0xabcd000000000000000000000000000000001234 ";
        assert_eq!(
            normalize_address(raw),
            Some("0xabcd000000000000000000000000000000001234".to_string())
        );
    }

    #[test]
    fn test_normalize_address_rejects_bad_shapes() {
        assert_eq!(normalize_address(""), None);
        assert_eq!(normalize_address("abcd"), None);
        assert_eq!(normalize_address("0x1234"), None); // too short
        assert_eq!(
            normalize_address("0xzzzz000000000000000000000000000000001234"),
            None
        );
    }

    #[test]
    fn test_truncate_address_splits_in_half() {
        let (head, tail) = truncate_address("0xabcd000000000000000000000000000000001234");
        assert_eq!(head, "0xabcd0000000000000000");
        assert_eq!(tail, "00000000000000001234");
    }

    #[test]
    fn test_truncate_address_empty() {
        let (head, tail) = truncate_address("");
        assert_eq!(head, "");
        assert_eq!(tail, "");
    }
}
