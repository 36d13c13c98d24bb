//! Text helpers for report markup and label matching.

use encoding_rs::Encoding;
use encoding_rs::UTF_8;

/// Decodes report bytes into text.
/// A byte order mark selects UTF-8 or UTF-16 (LE/BE); without one the bytes are
/// read as UTF-8 and malformed sequences are dropped.
pub fn decode_markup(bytes: &[u8]) -> String {
    let (encoding, bom_length) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
    if had_errors {
        text.replace(char::REPLACEMENT_CHARACTER, "")
    } else {
        text.into_owned()
    }
}

/// Removes every `.` and trims surrounding whitespace.
pub(crate) fn strip_periods(value: &str) -> String {
    value.replace('.', "").trim().to_owned()
}

/// Label normal form used by the template scan: lower case, trimmed,
/// one trailing colon removed.
pub(crate) fn normalize_label(value: &str) -> String {
    let lower = value.trim().to_lowercase();
    match lower.strip_suffix(':') {
        Some(stripped) => stripped.to_owned(),
        None => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_utf8() {
        assert_eq!(decode_markup("<td>CSName</td>".as_bytes()), "<td>CSName</td>");
    }

    #[test]
    fn decode_drops_malformed_bytes() {
        assert_eq!(decode_markup(b"PC\xFF-01"), "PC-01");
    }

    #[test]
    fn decode_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<td>A</td>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_markup(&bytes), "<td>A</td>");
    }

    #[test]
    fn strip_periods_and_whitespace() {
        assert_eq!(strip_periods(" PC.-CORP.-0007 "), "PC-CORP-0007");
    }

    #[test]
    fn normalize_label_strips_one_colon() {
        assert_eq!(normalize_label("  HD SN: "), "hd sn");
        assert_eq!(normalize_label("Ram 1 sn::"), "ram 1 sn:");
    }
}
