//! Printable rendering of binary keys for diagnostics.

use std::fmt::Write;

/// Render bytes with printable ASCII kept verbatim and everything else
/// escaped as `\xNN` (upper-case hex).
pub fn to_string_binary(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (b' '..=b'~').contains(&b) && b != b'\\' {
            out.push(b as char);
        } else {
            // Writing to a String cannot fail.
            let _ = write!(out, "\\x{b:02X}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_passthrough() {
        assert_eq!(to_string_binary(b"row-001"), "row-001");
    }

    #[test]
    fn test_escapes_control_and_high_bytes() {
        assert_eq!(to_string_binary(&[b'a', 0x00, 0xFF, b'\n']), "a\\x00\\xFF\\x0A");
    }

    #[test]
    fn test_escapes_backslash() {
        assert_eq!(to_string_binary(b"a\\b"), "a\\x5Cb");
    }
}
