//! Per-field extraction strategies over a parsed inventory report.
//!
//! Each canonical field owns an ordered list of strategies; the first one that
//! yields a non-empty value wins. Strategies are plain functions so they can be
//! exercised one by one.

use crate::fields::CanonicalField;
use crate::fields::FieldSet;
use crate::helpers::text::strip_periods;
use crate::report::table::build_from_clean;
use crate::report::table::clean_markup;
use crate::report::table::Table;
use crate::report::table::TableModel;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Cleaned report markup together with its table model.
#[derive(Clone, Debug)]
pub struct HardwareReport {
    /// Markup with noise spans removed; regex strategies search this text
    pub markup: String,
    pub model: TableModel,
}

impl HardwareReport {
    pub fn parse(markup: &str) -> Self {
        let markup = clean_markup(markup);
        let model = build_from_clean(&markup);
        debug!(tables = model.len(), "parsed hardware report");
        HardwareReport { markup, model }
    }
}

type Strategy = fn(&HardwareReport) -> Option<String>;

static STRATEGIES: &[(CanonicalField, &[Strategy])] = &[
    (CanonicalField::ComputerName, &[computer_name_from_cells, computer_name_from_markup]),
    (CanonicalField::WirelessAddress, &[wifi_address_from_cells, wifi_address_from_tables]),
    (CanonicalField::HdSerial, &[hd_serial_from_tables]),
    (CanonicalField::RamTypeCapacity, &[ram_type_from_tables]),
    (CanonicalField::Ram1Serial, &[ram_serial_from_tables]),
    (CanonicalField::PcSerial, &[pc_serial_from_markup]),
];

/// Parses the markup and extracts every hardware field.
pub fn extract_hardware(markup: &str) -> FieldSet {
    extract_fields(&HardwareReport::parse(markup))
}

/// Runs the strategies of each field; unresolved fields stay empty.
pub fn extract_fields(report: &HardwareReport) -> FieldSet {
    let mut fields = FieldSet::new();
    for (field, strategies) in STRATEGIES {
        let found = strategies.iter().enumerate().find_map(|(index, strategy)| {
            strategy(report)
                .filter(|value| !value.is_empty())
                .map(|value| (index, value))
        });
        if let Some((index, value)) = found {
            debug!(field = field.label(), strategy = index, value = value.as_str(), "extracted field");
            fields.set(*field, value);
        }
    }
    fields
}

static CSNAME_CELL: OnceLock<Regex> = OnceLock::new();
static MAC_ADDRESS: OnceLock<Regex> = OnceLock::new();
static BIOS_SERIAL: OnceLock<Regex> = OnceLock::new();

const WIFI_ADAPTER_PREFIX: &str = "intel(r) wi-fi";

/// Value of the cell right after the first cell satisfying `label`.
fn value_after(report: &HardwareReport, label: impl Fn(&str) -> bool, value: impl Fn(&str) -> bool) -> Option<String> {
    report
        .model
        .rows()
        .flat_map(|row| row.windows(2))
        .find(|pair| label(pair[0].as_str()) && value(pair[1].as_str()))
        .map(|pair| pair[1].to_owned())
}

/// Cell of `row` at `column`, when the row is long enough.
fn cell(row: &[String], column: usize) -> Option<&str> {
    row.get(column).map(String::as_str)
}

fn computer_name_from_cells(report: &HardwareReport) -> Option<String> {
    value_after(report, |label| label.eq_ignore_ascii_case("CSName"), |value| !value.is_empty())
        .map(|name| strip_periods(&name))
}

fn computer_name_from_markup(report: &HardwareReport) -> Option<String> {
    let pattern = CSNAME_CELL
        .get_or_init(|| Regex::new(r"(?i)<td>CSName</td>\s*<td>([^<]+)").expect("Hardcode regex pattern"));
    pattern
        .captures(&report.markup)
        .map(|captures| strip_periods(&captures[1]))
}

fn is_mac_address(value: &str) -> bool {
    MAC_ADDRESS
        .get_or_init(|| Regex::new(r"(?i)^([0-9A-F]{2}:){5}[0-9A-F]{2}$").expect("Hardcode regex pattern"))
        .is_match(value)
}

fn wifi_address_from_cells(report: &HardwareReport) -> Option<String> {
    value_after(
        report,
        |label| label.to_lowercase().starts_with(WIFI_ADAPTER_PREFIX),
        is_mac_address,
    )
}

fn wifi_address_from_tables(report: &HardwareReport) -> Option<String> {
    report
        .model
        .iter()
        .filter(|table| {
            let text = table.text();
            text.contains("intel") && text.contains("wi-fi")
        })
        .find_map(|table| {
            let address = table.column("macaddress")?;
            let description = table.column("description")?;
            table.data_rows().iter().find_map(|row| {
                if !cell(row, description)?.to_lowercase().contains("intel") {
                    return None;
                }
                Some(strip_periods(cell(row, address)?)).filter(|value| !value.is_empty())
            })
        })
}

/// Serial of the first qualifying row of a `physicaldrive0` table, or `None`.
fn drive_serial(table: &Table) -> Option<String> {
    let serial = table.column("serialnumber")?;
    let tag = table.column("tag");
    let row = table.data_rows().iter().find(|row| match tag {
        Some(tag) => cell(row, tag).is_some_and(|value| value.to_uppercase().contains("PHYSICALDRIVE0")),
        None => true,
    })?;
    let raw = cell(row, serial)?.trim();
    let prefix = raw.split('.').next().unwrap_or_default();
    Some(strip_periods(prefix)).filter(|value| !value.is_empty())
}

fn hd_serial_from_tables(report: &HardwareReport) -> Option<String> {
    report
        .model
        .iter()
        .filter(|table| table.text().contains("physicaldrive0"))
        .find_map(drive_serial)
}

/// Manufacturer, part number and serial of the first listed memory module.
fn memory_module(report: &HardwareReport) -> Option<(String, String, String)> {
    let table = report.model.iter().find(|table| {
        table
            .header()
            .iter()
            .any(|cell| cell.to_lowercase().contains("manufacturer"))
    })?;
    let manufacturer = table.column("manufacturer")?;
    let part_number = table.column("partnumber")?;
    let serial = table.column("serialnumber")?;
    let row = table.rows.get(1)?;
    Some((
        cell(row, manufacturer)?.to_owned(),
        cell(row, part_number)?.to_owned(),
        cell(row, serial)?.to_owned(),
    ))
}

fn ram_type_from_tables(report: &HardwareReport) -> Option<String> {
    memory_module(report).map(|(manufacturer, part_number, _)| format!("{manufacturer} - {part_number}"))
}

fn ram_serial_from_tables(report: &HardwareReport) -> Option<String> {
    memory_module(report).map(|(_, _, serial)| serial)
}

fn pc_serial_from_markup(report: &HardwareReport) -> Option<String> {
    let pattern = BIOS_SERIAL.get_or_init(|| {
        Regex::new(r"(?is)Win32_BIOS.*?SerialNumber.*?<td[^>]*>([^<]+)</td>").expect("Hardcode regex pattern")
    });
    pattern
        .captures(&report.markup)
        .map(|captures| strip_periods(&captures[1]))
}
