//! Program-text token parsing for externally supplied instruction words.
//!
//! The presentation layer feeds raw text lines here and keeps only the lines
//! that yield a word; malformed lines are skipped, never fatal.

/// Parses one line of program text into a 32-bit instruction word.
///
/// Accepted encodings, tried in order:
/// 1. A case-insensitive `0x` prefix parses the remainder as base-16.
/// 2. Exactly 32 characters of `0`/`1` parse as base-2.
/// 3. Anything else is attempted as bare base-16.
///
/// Blank/whitespace-only lines, unparseable text, and values that do not fit
/// in 32 bits all yield `None`.
#[must_use]
pub fn parse_word(line: &str) -> Option<u32> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u32::from_str_radix(digits, 16).ok();
    }

    if text.len() == 32 && text.bytes().all(|byte| byte == b'0' || byte == b'1') {
        return u32::from_str_radix(text, 2).ok();
    }

    u32::from_str_radix(text, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::parse_word;

    #[test]
    fn prefixed_hex_parses() {
        assert_eq!(parse_word("0x00400000"), Some(0x0040_0000));
        assert_eq!(parse_word("0XDEADBEEF"), Some(0xDEAD_BEEF));
        assert_eq!(parse_word("  0x2009000a  "), Some(0x2009_000A));
    }

    #[test]
    fn bare_hex_parses() {
        assert_eq!(parse_word("012A4020"), Some(0x012A_4020));
        assert_eq!(parse_word("ffffffff"), Some(0xFFFF_FFFF));
    }

    #[test]
    fn full_width_binary_parses() {
        assert_eq!(
            parse_word("00000001001010100010000000100000"),
            Some(0x012A_2020)
        );
        assert_eq!(parse_word(&"1".repeat(32)), Some(u32::MAX));
    }

    #[test]
    fn short_binary_falls_back_to_hex() {
        // 31 binary digits is not a binary token; it still reads as hex.
        assert_eq!(parse_word("0000000000000000000000000000001"), Some(0x1));
        assert_eq!(parse_word("1010"), Some(0x1010));
    }

    #[test]
    fn blank_and_whitespace_yield_none() {
        assert_eq!(parse_word(""), None);
        assert_eq!(parse_word("   "), None);
        assert_eq!(parse_word("\t\n"), None);
    }

    #[test]
    fn malformed_text_yields_none() {
        assert_eq!(parse_word("addi $t0, $zero, 1"), None);
        assert_eq!(parse_word("0xZZZZ"), None);
        assert_eq!(parse_word("0x"), None);
        assert_eq!(parse_word("-1"), None);
    }

    #[test]
    fn values_past_32_bits_yield_none() {
        assert_eq!(parse_word("0x100000000"), None);
        assert_eq!(parse_word("123456789AB"), None);
    }
}
