//! Joins extracted hardware fields to the registry record of the same asset.

use crate::fields::CanonicalField;
use crate::fields::FieldSet;
use crate::notes::parse_note;
use crate::registry::Registry;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static TRAILING_ID: OnceLock<Regex> = OnceLock::new();

/// Asset id of a computer name: its trailing run of four digits.
///
/// `"LAPTOP-0452"` gives `"0452"`; `"LAPTOP-45"` gives `None`.
pub fn correlation_id(computer_name: &str) -> Option<&str> {
    TRAILING_ID
        .get_or_init(|| Regex::new(r"(\d{4})$").expect("Hardcode regex pattern"))
        .captures(computer_name)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Writes registry data of the asset into `fields`.
///
/// Unknown or missing ids leave the fields untouched. User, department, region
/// and section come straight from the record; accessory serials parsed from the
/// note are written only when found, so they never erase extracted data.
pub fn correlate(mut fields: FieldSet, registry: &Registry) -> FieldSet {
    let Some(id) = correlation_id(fields.get(CanonicalField::ComputerName)).map(str::to_owned) else {
        debug!("computer name carries no asset id");
        return fields;
    };
    let Some(record) = registry.get(&id) else {
        debug!(id = id.as_str(), "asset id not in registry");
        return fields;
    };

    fields.set(CanonicalField::UserName, record.user.as_str());
    fields.set(CanonicalField::Department, record.department.as_str());
    fields.set(CanonicalField::Region, record.region.as_str());
    fields.set(CanonicalField::SectionDivision, record.section.as_str());
    fields.set(CanonicalField::LocationDivision, record.section.as_str());
    if !record.note.is_empty() {
        let serials = parse_note(Some(&record.note));
        for field in CanonicalField::ACCESSORIES {
            fields.overlay(field, serials.get(field));
        }
    }
    debug!(id = id.as_str(), "correlated with registry record");
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AssetRecord;
    use pretty_assertions::assert_eq;

    fn registry() -> Registry {
        let mut registry = Registry::default();
        registry.insert(
            "0007",
            AssetRecord {
                note: "Mouse Brand/SN: MS-1234".to_string(),
                department: "Finance".to_string(),
                section: "HQ".to_string(),
                user: "J.Doe".to_string(),
                region: String::new(),
            },
        );
        registry
    }

    fn fields(computer_name: &str) -> FieldSet {
        let mut fields = FieldSet::new();
        fields.set(CanonicalField::ComputerName, computer_name);
        fields.set(CanonicalField::Region, "North");
        fields.set(CanonicalField::LockSerial, "LK-1");
        fields
    }

    #[test]
    fn ids_are_the_trailing_four_digits() {
        assert_eq!(correlation_id("LAPTOP-0452"), Some("0452"));
        assert_eq!(correlation_id("PC12345"), Some("2345"));
        assert_eq!(correlation_id("LAPTOP-452"), None);
        assert_eq!(correlation_id("0452-LAPTOP"), None);
        assert_eq!(correlation_id(""), None);
    }

    #[test]
    fn writes_registry_record_and_note_serials() {
        let result = correlate(fields("PC-CORP-0007"), &registry());
        assert_eq!(result.get(CanonicalField::Department), "Finance");
        assert_eq!(result.get(CanonicalField::UserName), "J.Doe");
        assert_eq!(result.get(CanonicalField::SectionDivision), "HQ");
        assert_eq!(result.get(CanonicalField::LocationDivision), "HQ");
        assert_eq!(result.get(CanonicalField::MouseSerial), "MS-1234");
        assert_eq!(result.get(CanonicalField::Region), "");
        // A serial missing from the note keeps the extracted one.
        assert_eq!(result.get(CanonicalField::LockSerial), "LK-1");
    }

    #[test]
    fn unknown_or_missing_ids_change_nothing() {
        let input = fields("PC-CORP-0008");
        assert_eq!(correlate(input.clone(), &registry()), input);
        let input = fields("PC-CORP");
        assert_eq!(correlate(input.clone(), &registry()), input);
    }
}
