//! Canonical field vocabulary shared by extraction, correlation and template mapping.

use serde::ser::SerializeMap;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use std::fmt;

/// One asset attribute that extraction and the configuration form agree on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "Computer Name")]
    ComputerName,
    #[serde(rename = "User Name")]
    UserName,
    #[serde(rename = "Department")]
    Department,
    #[serde(rename = "Section/Division")]
    SectionDivision,
    #[serde(rename = "Location/Division")]
    LocationDivision,
    #[serde(rename = "Region")]
    Region,
    #[serde(rename = "PC/Laptop SN")]
    PcSerial,
    #[serde(rename = "HD SN")]
    HdSerial,
    #[serde(rename = "RAM1 SN")]
    Ram1Serial,
    #[serde(rename = "RAM Type / Capacity")]
    RamTypeCapacity,
    #[serde(rename = "Wireless Ethernet Address")]
    WirelessAddress,
    #[serde(rename = "Mouse S/N")]
    MouseSerial,
    #[serde(rename = "Lock S/N")]
    LockSerial,
    #[serde(rename = "USB-C to RJ45 Gigabit S/N")]
    Rj45Serial,
    #[serde(rename = "Power Adaptor S/N")]
    PowerAdaptorSerial,
    #[serde(rename = "OSSM Ticket No")]
    OssmTicket,
    #[serde(rename = "Delivery Note No")]
    DeliveryNote,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 17] = [
        CanonicalField::ComputerName,
        CanonicalField::UserName,
        CanonicalField::Department,
        CanonicalField::SectionDivision,
        CanonicalField::LocationDivision,
        CanonicalField::Region,
        CanonicalField::PcSerial,
        CanonicalField::HdSerial,
        CanonicalField::Ram1Serial,
        CanonicalField::RamTypeCapacity,
        CanonicalField::WirelessAddress,
        CanonicalField::MouseSerial,
        CanonicalField::LockSerial,
        CanonicalField::Rj45Serial,
        CanonicalField::PowerAdaptorSerial,
        CanonicalField::OssmTicket,
        CanonicalField::DeliveryNote,
    ];

    /// The four accessory serials that can be recovered from registry notes.
    pub const ACCESSORIES: [CanonicalField; 4] = [
        CanonicalField::MouseSerial,
        CanonicalField::LockSerial,
        CanonicalField::Rj45Serial,
        CanonicalField::PowerAdaptorSerial,
    ];

    /// Display label, as written on the configuration form.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalField::ComputerName => "Computer Name",
            CanonicalField::UserName => "User Name",
            CanonicalField::Department => "Department",
            CanonicalField::SectionDivision => "Section/Division",
            CanonicalField::LocationDivision => "Location/Division",
            CanonicalField::Region => "Region",
            CanonicalField::PcSerial => "PC/Laptop SN",
            CanonicalField::HdSerial => "HD SN",
            CanonicalField::Ram1Serial => "RAM1 SN",
            CanonicalField::RamTypeCapacity => "RAM Type / Capacity",
            CanonicalField::WirelessAddress => "Wireless Ethernet Address",
            CanonicalField::MouseSerial => "Mouse S/N",
            CanonicalField::LockSerial => "Lock S/N",
            CanonicalField::Rj45Serial => "USB-C to RJ45 Gigabit S/N",
            CanonicalField::PowerAdaptorSerial => "Power Adaptor S/N",
            CanonicalField::OssmTicket => "OSSM Ticket No",
            CanonicalField::DeliveryNote => "Delivery Note No",
        }
    }

    /// Template label texts that announce this field in the cell to their right.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::ComputerName => &["Computer Name"],
            CanonicalField::UserName => &["user name", "username"],
            CanonicalField::Department => &["department"],
            CanonicalField::SectionDivision => &["section", "division"],
            CanonicalField::PcSerial => &["PC/Laptop SN:"],
            CanonicalField::HdSerial => &["HD sn"],
            CanonicalField::Ram1Serial => &["Ram 1 sn:"],
            CanonicalField::WirelessAddress => &["Wireless Ethernet Address"],
            CanonicalField::MouseSerial => &["Mouse Brand/SN:"],
            CanonicalField::LockSerial => &["Notebook Lock Brand/SN:"],
            CanonicalField::Rj45Serial => &["USB-C to RJ45 Gigabit/SN:"],
            CanonicalField::PowerAdaptorSerial => &["Power Adaptor SN:"],
            CanonicalField::LocationDivision
            | CanonicalField::Region
            | CanonicalField::RamTypeCapacity
            | CanonicalField::OssmTicket
            | CanonicalField::DeliveryNote => &[],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Value of every canonical field; an empty string means "not found".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: [String; CanonicalField::ALL.len()],
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        &self.values[field.index()]
    }

    pub fn set<S: Into<String>>(&mut self, field: CanonicalField, value: S) {
        self.values[field.index()] = value.into();
    }

    /// Sets the field only when `value` is non-empty, so a known value is never erased.
    pub fn overlay(&mut self, field: CanonicalField, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        self.set(field, value);
        true
    }

    /// All fields in vocabulary order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> + '_ {
        CanonicalField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.label(), value)?;
        }
        map.end()
    }
}
