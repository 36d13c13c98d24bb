use asset_sheet::registry::import_registry;
use asset_sheet::registry::RegistryLayout;
use asset_sheet::report::extract_hardware;
use asset_sheet::spreadsheet::CellAddress;
use asset_sheet::spreadsheet::Sheet;
use asset_sheet::CanonicalField;
use asset_sheet::FormRequest;
use asset_sheet::RegistryStore;
use asset_sheet::TabularDocument;
use asset_sheet::TemplateLayout;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

const REPORT: &str = r#"<html><body>
<h2>Win32_ComputerSystem</h2>
<table><tr><td>Name</td><td>Value</td></tr><tr><td>CSName</td><td>PC-CORP<span>.</span>-0007</td></tr></table>
<h2>Win32_BIOS</h2>
<table><tr><td>SerialNumber</td><td>SN998877</td></tr></table>
</body></html>"#;

fn registry_sheet() -> Sheet {
    let mut sheet = Sheet::from_rows(
        "2021 NEW",
        vec![
            vec!["No", "Asset ID", "User", "Department", "Section"],
            vec!["1", "7", "J.Doe", "Finance", "HQ"],
            vec!["2", "452", "A.Smith", "IT", "Ops"],
        ],
    );
    sheet.set_comment(CellAddress::new(2, 1), "Mouse Brand/SN: MS-1234\nLock: LK99-88");
    sheet
}

fn template() -> Sheet {
    Sheet::from_rows(
        "Form",
        vec![
            vec!["", "", "", "", "", ""],
            vec!["", "", "", "", "", ""],
            vec!["Region", "", "", "", "OSSM Ticket", ""],
            vec!["", "", "", "", "", ""],
            vec!["", "", "", "", "", ""],
            vec!["", "", "", "", "", ""],
            vec!["Department:", ""],
            vec!["Section", ""],
        ],
    )
}

fn store(name: &str) -> (RegistryStore, PathBuf) {
    let path = std::env::temp_dir().join(format!("asset_sheet_it_{}_{name}.json", std::process::id()));
    let _ = fs::remove_file(&path);
    (RegistryStore::open(&path), path)
}

#[test]
fn extraction_and_correlation_end_to_end() {
    let (store, path) = store("end_to_end");
    store.replace(import_registry(&registry_sheet(), &RegistryLayout::default())).unwrap();

    let fields = store.correlate(extract_hardware(REPORT));
    assert_eq!(fields.get(CanonicalField::ComputerName), "PC-CORP-0007");
    assert_eq!(fields.get(CanonicalField::PcSerial), "SN998877");
    assert_eq!(fields.get(CanonicalField::Department), "Finance");
    assert_eq!(fields.get(CanonicalField::UserName), "J.Doe");
    assert_eq!(fields.get(CanonicalField::SectionDivision), "HQ");
    assert_eq!(fields.get(CanonicalField::LocationDivision), "HQ");
    assert_eq!(fields.get(CanonicalField::MouseSerial), "MS-1234");
    assert_eq!(fields.get(CanonicalField::LockSerial), "LK99-88");

    fs::remove_file(&path).unwrap();
}

#[test]
fn fill_form_writes_located_values() {
    let (store, path) = store("fill");
    store.replace(import_registry(&registry_sheet(), &RegistryLayout::default())).unwrap();

    let mut sheet = template();
    let request = FormRequest {
        ossm_ticket: " OSSM-1 ".to_string(),
        delivery_note: String::new(),
    };
    let output = asset_sheet::fill_form(REPORT, &request, &store, &mut sheet, &TemplateLayout::default());

    assert_eq!(output.file_name, "PC-CORP-0007_ConfigForm.xlsx");
    assert_eq!(output.fields.get(CanonicalField::OssmTicket), "OSSM-1");
    assert_eq!(sheet.value_at("F10").unwrap(), Some("PC-CORP-0007"));
    assert_eq!(sheet.value_at("C6").unwrap(), Some("SN998877"));
    assert_eq!(sheet.value_at("F6").unwrap(), Some("J.Doe"));
    assert_eq!(sheet.value_at("C4").unwrap(), Some("HQ"));
    assert_eq!(sheet.value_at("F3").unwrap(), Some("OSSM-1"));
    assert_eq!(sheet.value_at("B7").unwrap(), Some("Finance"));
    assert_eq!(sheet.value_at("B8").unwrap(), Some("HQ"));
    assert_eq!(sheet.value_at("C18").unwrap(), Some("MS-1234"));
    assert_eq!(sheet.value_at("F4").unwrap(), None);
    assert_eq!(sheet.value_at("C3").unwrap(), None);

    let written: Vec<String> = output.writes.iter().map(|write| write.address.to_string()).collect();
    assert_eq!(written, vec!["F10", "F6", "B7", "B8", "C4", "C6", "C18", "C15", "F3"]);

    fs::remove_file(&path).unwrap();
}

#[test]
fn unknown_asset_keeps_report_values() {
    let (store, _) = store("unknown");
    let report = REPORT.replace("0007", "0999");
    let fields = store.correlate(extract_hardware(&report));
    assert_eq!(fields.get(CanonicalField::ComputerName), "PC-CORP-0999");
    assert_eq!(fields.get(CanonicalField::Department), "");
}
