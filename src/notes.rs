//! Accessory serial numbers recovered from free-text registry notes.
//!
//! Notes are typed by hand, e.g. `"Mouse Brand/SN: MS-1234 Lock: LK99-88"`.
//! Each accessory has a keyword anchor; the serial is the first serial-shaped
//! word shortly after an anchor.

use crate::fields::CanonicalField;
use crate::fields::FieldSet;
use regex::Regex;
use std::sync::OnceLock;

/// Words examined after each anchor occurrence.
const MAX_WORDS_AFTER_ANCHOR: usize = 3;

static ANCHORS: OnceLock<Vec<(CanonicalField, Regex)>> = OnceLock::new();
static SERIAL_TOKEN: OnceLock<Regex> = OnceLock::new();

fn anchors() -> &'static [(CanonicalField, Regex)] {
    ANCHORS.get_or_init(|| {
        [
            (CanonicalField::MouseSerial, r"(?i)mouse"),
            (CanonicalField::LockSerial, r"(?i)lock"),
            (CanonicalField::Rj45Serial, r"(?i)rj45"),
            (CanonicalField::PowerAdaptorSerial, r"(?i)adapt[eo]r"),
        ]
        .into_iter()
        .map(|(field, pattern)| (field, Regex::new(pattern).expect("Hardcode regex pattern")))
        .collect()
    })
}

fn is_serial(word: &str) -> bool {
    SERIAL_TOKEN
        .get_or_init(|| Regex::new(r"^[A-Z0-9.\-]{3,}$").expect("Hardcode regex pattern"))
        .is_match(word)
        && word.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Trims each line, drops blank lines and joins the rest with single spaces.
fn collapse(note: &str) -> String {
    note.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First serial-shaped word in the few words following an anchor.
///
/// Label words such as `Brand/SN:` are skipped. Once a word closing the label
/// (trailing `:` or a bare `:`/`-`) has been seen, only the next word counts.
/// Bare separator words (`:`, `-`, `/`) are passed over without counting.
fn serial_after(rest: &str) -> Option<&str> {
    let mut label_closed = false;
    let mut examined = 0;
    for word in rest.split_whitespace() {
        if word.chars().all(|c| matches!(c, ':' | '-' | '/')) {
            label_closed |= word.contains([':', '-']);
            continue;
        }
        if examined == MAX_WORDS_AFTER_ANCHOR {
            break;
        }
        examined += 1;
        let token = word
            .trim_start_matches([':', '-'])
            .trim_end_matches([':', ',', ';']);
        if is_serial(token) {
            return Some(token);
        }
        if label_closed {
            return None;
        }
        label_closed = word.ends_with(':');
    }
    None
}

/// Parses the accessory serials out of a registry note.
///
/// Only Mouse S/N, Lock S/N, USB-C to RJ45 Gigabit S/N and Power Adaptor S/N
/// can be set; every other field of the result is empty.
pub fn parse_note(note: Option<&str>) -> FieldSet {
    let mut fields = FieldSet::new();
    let Some(note) = note.filter(|note| !note.trim().is_empty()) else {
        return fields;
    };
    let text = collapse(note);
    for (field, anchor) in anchors() {
        let serial = anchor
            .find_iter(&text)
            .find_map(|found| serial_after(&text[found.end()..]));
        if let Some(serial) = serial {
            fields.set(*field, serial);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accessories(note: &str) -> [String; 4] {
        let fields = parse_note(Some(note));
        CanonicalField::ACCESSORIES.map(|field| fields.get(field).to_owned())
    }

    #[test]
    fn absent_or_blank_notes_are_empty() {
        assert!(parse_note(None).is_empty());
        assert!(parse_note(Some("")).is_empty());
        assert!(parse_note(Some(" \n\t ")).is_empty());
    }

    #[test]
    fn mouse_and_lock_from_labelled_note() {
        let fields = parse_note(Some("Mouse Brand/SN: MS-1234 Lock: LK99-88"));
        assert_eq!(fields.get(CanonicalField::MouseSerial), "MS-1234");
        assert_eq!(fields.get(CanonicalField::LockSerial), "LK99-88");
        assert_eq!(fields.get(CanonicalField::Rj45Serial), "");
        assert_eq!(fields.get(CanonicalField::ComputerName), "");
    }

    #[test]
    fn multi_line_note_with_all_accessories() {
        let note = "  Mouse: MX-001\n\n NOTEBOOK LOCK Brand/SN: KL-7.7 \nUSB-C to RJ45 Gigabit/SN: RJ-5555,\nPower Adapter SN: PA2024;";
        assert_eq!(accessories(note), ["MX-001", "KL-7.7", "RJ-5555", "PA2024"]);
    }

    #[test]
    fn adaptor_spelling_and_attached_separators() {
        assert_eq!(accessories("adaptor:AD-900")[3], "AD-900");
        assert_eq!(accessories("Adapter - 65W1")[3], "65W1");
    }

    #[test]
    fn anchor_without_serial_tries_next_occurrence() {
        let note = "Lock: missing, returned later. Spare lock: LK-42";
        assert_eq!(accessories(note)[1], "LK-42");
    }

    #[test]
    fn separator_runs_before_the_serial() {
        assert_eq!(accessories("Mouse: - MS-1234")[0], "MS-1234");
        assert_eq!(accessories("Mouse S/N: - MS-1234")[0], "MS-1234");
        assert_eq!(accessories("Mouse Brand / SN: MS-1234")[0], "MS-1234");
        assert_eq!(accessories("Lock -- : LK-77")[1], "LK-77");
    }

    #[test]
    fn words_after_a_closed_label_must_be_serials() {
        assert_eq!(accessories("Mouse: Logitech MS-1234")[0], "");
        assert_eq!(accessories("Mouse: ...")[0], "");
        assert_eq!(accessories("mousepad cleaned")[0], "");
    }
}
