/// Decode a fixed-width field as Latin-1, stopping at the first NUL byte.
pub(crate) fn latin1_until_nul(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect()
}

/// Trim trailing padding (spaces, tabs, stray NULs) from a decoded field.
pub(crate) fn trim_padding(value: &str) -> String {
    value
        .trim_end_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{latin1_until_nul, trim_padding};

    #[test]
    fn latin1_until_nul_empty_when_first_byte_is_nul() {
        assert_eq!(latin1_until_nul(&[0, b'a']), "");
    }

    #[test]
    fn latin1_until_nul_keeps_all_bytes_without_terminator() {
        assert_eq!(latin1_until_nul(b"mm/s"), "mm/s");
    }

    #[test]
    fn trim_padding_only_touches_the_end() {
        assert_eq!(trim_padding("  Time   "), "  Time");
        assert_eq!(trim_padding("sec\0\0"), "sec");
    }
}
