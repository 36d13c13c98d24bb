//! Locates where each canonical field goes in the configuration-form template.
//!
//! Locations come from a fixed manual table first; the remaining fields are
//! discovered by scanning the top-left corner of the template for label cells
//! and taking the cell immediately to the right.

use crate::fields::CanonicalField;
use crate::helpers::text::normalize_label;
use crate::spreadsheet::CellAddress;
use crate::spreadsheet::TabularDocument;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Template knowledge: fixed cell addresses, label aliases and scan bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    pub manual: BTreeMap<CanonicalField, CellAddress>,
    pub aliases: BTreeMap<CanonicalField, Vec<String>>,
    pub scan_rows: usize,
    pub scan_columns: usize,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        let manual = [
            (CanonicalField::Region, "C3"),
            (CanonicalField::LocationDivision, "C4"),
            (CanonicalField::ComputerName, "F10"),
            (CanonicalField::PcSerial, "C6"),
            (CanonicalField::HdSerial, "C12"),
            (CanonicalField::Ram1Serial, "C21"),
            (CanonicalField::WirelessAddress, "F21"),
            (CanonicalField::UserName, "F6"),
            (CanonicalField::MouseSerial, "C18"),
            (CanonicalField::LockSerial, "C15"),
            (CanonicalField::Rj45Serial, "C16"),
            (CanonicalField::PowerAdaptorSerial, "F26"),
            (CanonicalField::OssmTicket, "F3"),
            (CanonicalField::DeliveryNote, "F4"),
        ]
        .into_iter()
        .filter_map(|(field, reference)| Some((field, reference.parse().ok()?)))
        .collect();
        let aliases = CanonicalField::ALL
            .into_iter()
            .filter(|field| !field.aliases().is_empty())
            .map(|field| (field, field.aliases().iter().map(|alias| alias.to_string()).collect()))
            .collect();
        TemplateLayout {
            manual,
            aliases,
            scan_rows: 50,
            scan_columns: 20,
        }
    }
}

/// Where a location came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Manual,
    Discovered,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLocation {
    pub address: CellAddress,
    pub source: LocationSource,
}

/// Target cell of each located field; unlocated fields are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldLocations {
    entries: BTreeMap<CanonicalField, FieldLocation>,
}

impl FieldLocations {
    /// Records a location unless the field is already resolved.
    fn resolve(&mut self, field: CanonicalField, address: CellAddress, source: LocationSource) -> bool {
        if self.entries.contains_key(&field) {
            return false;
        }
        self.entries.insert(field, FieldLocation { address, source });
        true
    }

    pub fn get(&self, field: CanonicalField) -> Option<CellAddress> {
        self.entries.get(&field).map(|location| location.address)
    }

    pub fn location(&self, field: CanonicalField) -> Option<&FieldLocation> {
        self.entries.get(&field)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &FieldLocation)> {
        self.entries.iter().map(|(field, location)| (*field, location))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the field location map of a template document.
pub fn locate_fields<D: TabularDocument + ?Sized>(document: &D, layout: &TemplateLayout) -> FieldLocations {
    let mut locations = FieldLocations::default();
    for (field, address) in &layout.manual {
        locations.resolve(*field, *address, LocationSource::Manual);
    }

    let aliases: Vec<(CanonicalField, Vec<String>)> = layout
        .aliases
        .iter()
        .map(|(field, aliases)| (*field, aliases.iter().map(|alias| normalize_label(alias)).collect()))
        .collect();

    let max_row = layout.scan_rows.min(document.max_row());
    let max_column = layout.scan_columns.min(document.max_column());
    for row in 1..=max_row {
        for column in 1..=max_column {
            let address = CellAddress::new(row, column);
            let Some(label) = document.value(address).map(normalize_label) else {
                continue;
            };
            if label.is_empty() {
                continue;
            }
            for (field, aliases) in &aliases {
                if !locations.contains(*field) && aliases.contains(&label) {
                    locations.resolve(*field, address.right(), LocationSource::Discovered);
                    debug!(field = field.label(), label = %address, target = %address.right(), "discovered template label");
                }
            }
        }
    }
    locations
}
