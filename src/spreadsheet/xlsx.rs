use crate::error::AssetSheetError;
use crate::error::ResultOptionChain;
use crate::helpers::reader::WorkbookSource;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::criteria::SheetSelector;
use crate::spreadsheet::excel;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::reference::CellAddress;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::SpreadsheetError;
use crate::spreadsheet::TabularDocument;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si"); // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh"); // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t"); // Text content within strings
const TAG_SHEET: QName = QName(b"sheet"); // Worksheet definition
const TAG_WORKBOOK_VIEW: QName = QName(b"workbookView"); // Holds the active tab
const TAG_ROW: QName = QName(b"row"); // Row in worksheet
const TAG_CELL: QName = QName(b"c"); // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is"); // Inline string value
const TAG_VALUE: QName = QName(b"v"); // Cell value content
const TAG_COMMENT: QName = QName(b"comment"); // Cell comment (legacy note)

/// Value encodings of the `t` attribute of a worksheet cell
#[derive(Copy, Clone, Debug, PartialEq)]
enum ValueKind {
    Number,
    SharedString,
    InlineString,
    Boolean,
    Error,
}

impl ValueKind {
    fn parse(kind: &str) -> Self {
        match kind {
            "s" => Self::SharedString,
            "inlineStr" | "str" => Self::InlineString,
            "b" => Self::Boolean,
            "e" => Self::Error,
            _ => Self::Number,
        }
    }
}

/// Read-only view of an `.xlsx` workbook that materialises worksheets as [`Sheet`]s
pub struct XlsxWorkbook {
    /// File name (or label) of the workbook
    pub name: String,
    /// ZIP archive containing the XLSX file contents
    zip: ZipArchive<WorkbookSource>,
    /// List of worksheets with (name, zip_path) pairs in workbook order
    sheets: Vec<(String, String)>,
    /// Index of the sheet that was active when the file was saved
    active: usize,
}

impl XlsxWorkbook {
    /// Opens an XLSX file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<XlsxWorkbook, AssetSheetError> {
        let name = path.as_ref().to_string_lossy().to_string();
        Self::from_source(&name, WorkbookSource::open(path)?)
    }

    /// Opens an XLSX document already held in memory
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<XlsxWorkbook, AssetSheetError> {
        Self::from_source(name, WorkbookSource::from_bytes(bytes))
    }

    fn from_source(name: &str, source: WorkbookSource) -> Result<XlsxWorkbook, AssetSheetError> {
        let mut zip = ZipArchive::new(source)?;
        let (sheets, active) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?
        }
        debug!(workbook = name, sheets = sheets.len(), "opened workbook");
        Ok(XlsxWorkbook {
            name: name.to_owned(),
            zip,
            sheets,
            active,
        })
    }

    /// Returns the names of all worksheets in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Reads the first worksheet accepted by `selector`, falling back to the active sheet
    pub fn read_sheet(&mut self, selector: &SheetSelector) -> Result<Sheet, AssetSheetError> {
        let matched: Result<Option<(String, String)>, AssetSheetError> =
            Ok(self.sheets.iter().find(|(name, _)| selector.accept(name)).cloned());
        let (sheet_name, zip_path) = matched
            .ok_none_else(|| Ok(self.sheets.get(self.active).or(self.sheets.first()).cloned()))?
            .ok_or_else(|| SpreadsheetError::SpreadsheetEmptyError(self.name.to_owned()))?;
        self.load_sheet(&sheet_name, &zip_path)
    }

    /// Reads a worksheet by exact name
    pub fn read_sheet_named(&mut self, sheet_name: &str) -> Result<Sheet, AssetSheetError> {
        let zip_path = self
            .sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, path)| path.to_owned())
            .ok_or_else(|| SpreadsheetError::SheetNotFound(sheet_name.to_owned()))?;
        self.load_sheet(sheet_name, &zip_path)
    }

    fn load_sheet(&mut self, sheet_name: &str, zip_path: &str) -> Result<Sheet, AssetSheetError> {
        let shared_strings = self.load_shared_strings()?;
        let mut sheet = Sheet::new(sheet_name);
        self.load_cells(&mut sheet, zip_path, &shared_strings)?;
        self.load_comments(&mut sheet, zip_path)?;
        debug!(sheet = sheet_name, rows = sheet.max_row(), "loaded worksheet");
        Ok(sheet)
    }

    /// Loads the shared string table; shared cells store an index into it
    fn load_shared_strings(&mut self) -> Result<Vec<String>, AssetSheetError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }

    /// Parses the worksheet part and pushes every cell that carries a value
    fn load_cells(&mut self, sheet: &mut Sheet, zip_path: &str, shared_strings: &[String]) -> Result<(), AssetSheetError> {
        let mut reader = self
            .zip
            .xml_reader(zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut address = CellAddress::new(1, 1);
        let mut kind = ValueKind::Number;
        let mut value = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                row_count = event.parse_attribute_value::<usize>("r")?.unwrap_or(row_count + 1);
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                address = event
                    .get_attribute_value("r")?
                    .and_then(|reference| reference.parse::<CellAddress>().ok())
                    .unwrap_or(CellAddress::new(row_count.max(1), col_count + 1));
                col_count = address.column;
                kind = event
                    .get_attribute_value("t")?
                    .map(|t| ValueKind::parse(&t))
                    .unwrap_or(ValueKind::Number);
                value.clear();
            }
            Event::Start(event) if event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.name() == TAG_CELL => {
                if !value.is_empty() {
                    let cell = match kind {
                        ValueKind::SharedString => {
                            let index = value.trim().parse::<usize>()?;
                            Cell::new(shared_strings.get(index).map(String::as_str).unwrap_or_default())
                        }
                        ValueKind::Boolean => Cell::boolean(&value),
                        ValueKind::Number | ValueKind::InlineString | ValueKind::Error => Cell::new(&value),
                    };
                    sheet.push(address, cell);
                }
                value.clear();
            }
        });
        Ok(())
    }

    /// Attaches comments from every comments part related to the worksheet
    fn load_comments(&mut self, sheet: &mut Sheet, zip_path: &str) -> Result<(), AssetSheetError> {
        let rels_path = excel::relationships_path(zip_path);
        let parts = load_relationships(&mut self.zip, &rels_path, excel::KIND_COMMENTS)?;
        let mut parts: Vec<String> = parts.into_values().collect();
        parts.sort();
        for part in parts {
            let Some(mut reader) = self.zip.xml_reader(&part)? else {
                continue;
            };
            match_xml_events!(reader => {
                Event::Start(event) if event.name() == TAG_COMMENT => {
                    let reference = event.get_attribute_value("ref")?.map(|it| it.to_string());
                    let text = read_string_value(&mut reader, TAG_COMMENT, false)?;
                    let text = text.trim();
                    if let Some(address) = reference.and_then(|it| it.parse::<CellAddress>().ok()) {
                        if !text.is_empty() {
                            sheet.set_comment(address, text);
                        }
                    }
                }
            });
        }
        Ok(())
    }
}

/// Loads worksheet names, their part paths and the active tab from `workbook.xml`
fn load_workbook(zip: &mut ZipArchive<WorkbookSource>) -> Result<(Vec<(String, String)>, usize), AssetSheetError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels", excel::KIND_WORKSHEET)?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut active = 0usize;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<String>;
            let mut id = None::<String>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?.to_string());
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?.to_string());
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id) {
                    sheets.push((name, path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_VIEW => {
            active = event.parse_attribute_value::<usize>("activeTab")?.unwrap_or(0);
        }
    });
    Ok((sheets, active))
}

/// Reads string value from XML content, handling text and CDATA sections
///
/// Skips phonetic annotations; outside a `<t>` element text only counts when
/// `is_text_content` is set (plain `<v>` values).
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, AssetSheetError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = is_text_content,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
