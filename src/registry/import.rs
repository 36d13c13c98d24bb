//! Builds a [`Registry`] from the registry worksheet.
//!
//! Row 1 holds the headers. Each following row with an id in the id column
//! becomes one [`AssetRecord`]; the note is the first comment found on the
//! row's leading cells.

use crate::error::AssetSheetError;
use crate::error::ResultMessage;
use crate::registry::AssetRecord;
use crate::registry::Registry;
use crate::spreadsheet::CellAddress;
use crate::spreadsheet::SheetSelector;
use crate::spreadsheet::TabularDocument;
use crate::spreadsheet::XlsxWorkbook;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

/// Column layout of the registry worksheet. Columns are 1-based.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryLayout {
    /// Worksheet name patterns tried before falling back to the active sheet
    pub sheet_patterns: Vec<String>,
    pub id_column: usize,
    pub region_column: usize,
    /// Columns beyond this one are never read
    pub max_columns: usize,
    /// Leading cells searched for the note comment
    pub note_columns: usize,
    pub department_keywords: Vec<String>,
    pub section_keywords: Vec<String>,
    pub user_keywords: Vec<String>,
}

impl Default for RegistryLayout {
    fn default() -> Self {
        let words = |words: &[&str]| words.iter().map(|word| word.to_string()).collect();
        RegistryLayout {
            sheet_patterns: words(&["2021 NEW"]),
            id_column: 2,
            region_column: 11,
            max_columns: 20,
            note_columns: 3,
            department_keywords: words(&["department", "dept"]),
            section_keywords: words(&["section", "division", "sect", "location"]),
            user_keywords: words(&["user"]),
        }
    }
}

/// Normalises a raw id cell: trimmed, float suffix `.0` removed, zero-padded to 4.
fn normalize_id(raw: &str) -> Option<String> {
    let id = raw.trim();
    let id = id.strip_suffix(".0").unwrap_or(id).trim();
    if id.is_empty() {
        return None;
    }
    Some(format!("{id:0>4}"))
}

/// First header column whose lower-cased text contains one of `keywords`.
fn find_column(headers: &[Option<&str>], keywords: &[String]) -> Option<usize> {
    headers
        .iter()
        .position(|header| {
            header.is_some_and(|header| {
                let header = header.to_lowercase();
                keywords.iter().any(|keyword| header.contains(&keyword.to_lowercase()))
            })
        })
        .map(|index| index + 1)
}

/// Builds the registry of a worksheet. Rows without an id are skipped.
pub fn import_registry<D: TabularDocument + ?Sized>(document: &D, layout: &RegistryLayout) -> Registry {
    let max_columns = layout.max_columns.min(document.max_column());
    let headers = document.row(1, max_columns);
    let department = find_column(&headers, &layout.department_keywords);
    let section = find_column(&headers, &layout.section_keywords);
    let user = find_column(&headers, &layout.user_keywords);
    let region = Some(layout.region_column).filter(|column| *column <= layout.max_columns);
    debug!(?department, ?section, ?user, ?region, "registry columns");

    let text = |row: usize, column: Option<usize>| -> String {
        column
            .and_then(|column| document.value(CellAddress::new(row, column)))
            .map(|value| value.trim().to_owned())
            .unwrap_or_default()
    };

    let mut registry = Registry::default();
    for row in 2..=document.max_row() {
        let Some(id) = document
            .value(CellAddress::new(row, layout.id_column))
            .and_then(normalize_id)
        else {
            continue;
        };
        let note = (1..=layout.note_columns.min(layout.max_columns))
            .filter_map(|column| document.comment(CellAddress::new(row, column)))
            .map(str::trim)
            .find(|comment| !comment.is_empty())
            .unwrap_or_default()
            .to_owned();
        let record = AssetRecord {
            note,
            department: text(row, department),
            section: text(row, section),
            user: text(row, user),
            region: text(row, region),
        };
        registry.insert(id, record);
    }
    info!(assets = registry.len(), "imported registry sheet");
    registry
}

/// Reads the registry worksheet of a workbook and imports it.
pub fn import_workbook(workbook: &mut XlsxWorkbook, layout: &RegistryLayout) -> Result<Registry, AssetSheetError> {
    let selector = SheetSelector::from_patterns(&layout.sheet_patterns)?;
    let sheet = workbook
        .read_sheet(&selector)
        .with_prefix(&format!("Read registry workbook '{}'", workbook.name))?;
    debug!(sheet = sheet.name.as_str(), "registry worksheet selected");
    Ok(import_registry(&sheet, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::xlsx::tests::build_workbook;
    use crate::spreadsheet::xlsx::tests::TestSheet;
    use crate::spreadsheet::Sheet;
    use pretty_assertions::assert_eq;

    fn registry_sheet() -> Sheet {
        let mut header = vec![""; 12];
        header[0] = "No";
        header[1] = "Asset ID";
        header[2] = "User";
        header[3] = "Dept.";
        header[4] = "Location";
        header[5] = "Division";
        header[10] = "Region";
        let mut first = vec![""; 12];
        first[0] = "1";
        first[1] = "7.0";
        first[2] = " J.Doe ";
        first[3] = "Finance";
        first[4] = "HQ";
        first[5] = "Treasury";
        first[10] = "North";
        let mut second = vec![""; 12];
        second[1] = "452";
        second[2] = "A.Smith";
        let third = vec!["3", "", "Nobody"];
        let mut sheet = Sheet::from_rows("2021 NEW", vec![header, first, second, third]);
        sheet.set_comment(CellAddress::new(3, 2), "  ");
        sheet.set_comment(CellAddress::new(3, 3), "Mouse: MS-1");
        sheet.set_comment(CellAddress::new(2, 4), "outside the note columns");
        sheet
    }

    #[test]
    fn normalizes_ids() {
        assert_eq!(normalize_id("7.0").as_deref(), Some("0007"));
        assert_eq!(normalize_id(" 452 ").as_deref(), Some("0452"));
        assert_eq!(normalize_id("12345").as_deref(), Some("12345"));
        assert_eq!(normalize_id("10.05").as_deref(), Some("10.05"));
        assert_eq!(normalize_id(" "), None);
    }

    #[test]
    fn imports_rows_with_ids() {
        let registry = import_registry(&registry_sheet(), &RegistryLayout::default());
        assert_eq!(registry.len(), 2);

        let first = registry.get("0007").unwrap();
        assert_eq!(first.user, "J.Doe");
        assert_eq!(first.department, "Finance");
        assert_eq!(first.section, "HQ");
        assert_eq!(first.region, "North");
        assert_eq!(first.note, "");

        let second = registry.get("0452").unwrap();
        assert_eq!(second.user, "A.Smith");
        assert_eq!(second.department, "");
        assert_eq!(second.note, "Mouse: MS-1");
    }

    #[test]
    fn missing_header_columns_leave_values_empty() {
        let sheet = Sheet::from_rows("Sheet1", vec![vec!["No", "Id"], vec!["1", "15"]]);
        let registry = import_registry(&sheet, &RegistryLayout::default());
        assert_eq!(registry.get("0015"), Some(&AssetRecord::default()));
    }

    #[test]
    fn imports_registry_workbook() {
        let data = r#"<row r="1"><c r="A1" t="inlineStr"><is><t>No</t></is></c><c r="B1" t="inlineStr"><is><t>ID</t></is></c><c r="C1" t="inlineStr"><is><t>Department</t></is></c></row><row r="2"><c r="A2"><v>1</v></c><c r="B2"><v>7</v></c><c r="C2" t="inlineStr"><is><t>Finance</t></is></c></row>"#;
        let comments = r#"<comment ref="A2" authorId="0"><text><t>Lock: LK-7</t></text></comment>"#;
        let bytes = build_workbook(
            &[
                TestSheet { name: "Summary", data: "", comments: None },
                TestSheet { name: "2021 NEW", data, comments: Some(comments) },
            ],
            &[],
            0,
        );
        let mut workbook = XlsxWorkbook::from_bytes("registry.xlsx", bytes).unwrap();
        let registry = import_workbook(&mut workbook, &RegistryLayout::default()).unwrap();
        let record = registry.get("0007").unwrap();
        assert_eq!(record.department, "Finance");
        assert_eq!(record.note, "Lock: LK-7");
    }
}
