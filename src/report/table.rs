//! Turns inventory-report markup into an ordered list of tables.
//!
//! The scan is a small state machine over tokenizer events rather than an HTML
//! parser: only `table`, `tr` and `td` carry structure, everything else is
//! text or ignored. Header cells (`th`) are not cells, so a caption row made of
//! them stays empty and is dropped. Malformed markup never fails the build; the tables closed
//! before the first tokenizer error are kept.

use crate::error::AssetSheetError;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::match_xml_events;
use quick_xml::events::Event;
use regex::Captures;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// One table row: trimmed cell texts in source order.
pub type Row = Vec<String>;

/// A non-empty sequence of non-empty rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    /// First row, which inventory exports use as the column header.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Header cells lower-cased and trimmed, for exact column lookups.
    pub fn header_keys(&self) -> Vec<String> {
        self.header().iter().map(|cell| cell.trim().to_lowercase()).collect()
    }

    /// Position of the header column named `key` (lowercase exact match).
    pub fn column(&self, key: &str) -> Option<usize> {
        self.header_keys().iter().position(|name| name == key)
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// All cell texts concatenated and lower-cased.
    pub fn text(&self) -> String {
        self.rows.iter().flatten().map(|cell| cell.to_lowercase()).collect()
    }
}

/// Every table of a report, in the order the tables close.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableModel {
    pub tables: Vec<Table>,
}

impl TableModel {
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// All rows of all tables, in model order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.tables.iter().flat_map(|table| table.rows.iter())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

static NOISE_SPAN: OnceLock<Regex> = OnceLock::new();
static SCRIPT_BLOCK: OnceLock<Regex> = OnceLock::new();
static AMPERSAND: OnceLock<Regex> = OnceLock::new();

/// Removes the single-period filler spans the report injects between characters.
pub fn clean_markup(markup: &str) -> String {
    let noise = NOISE_SPAN.get_or_init(|| Regex::new(r"<span[^>]*>\.</span>").expect("Hardcode regex pattern"));
    noise.replace_all(markup, "").into_owned()
}

/// Drops script and style blocks and escapes `&` that does not start an entity.
fn prepare_for_tokenizer(markup: &str) -> String {
    let script = SCRIPT_BLOCK.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").expect("Hardcode regex pattern")
    });
    let ampersand = AMPERSAND.get_or_init(|| {
        Regex::new(r"&(#[0-9]+;|#[xX][0-9a-fA-F]+;|[A-Za-z][A-Za-z0-9]*;)?").expect("Hardcode regex pattern")
    });
    let markup = script.replace_all(markup, "");
    ampersand
        .replace_all(&markup, |captures: &Captures| match captures.get(1) {
            Some(_) => captures[0].to_string(),
            None => "&amp;".to_string(),
        })
        .into_owned()
}

/// Builds the table model of raw (uncleaned) markup.
pub fn build_table_model(markup: &str) -> TableModel {
    build_from_clean(&clean_markup(markup))
}

/// Builds the table model of markup that already went through [`clean_markup`].
pub(crate) fn build_from_clean(markup: &str) -> TableModel {
    let prepared = prepare_for_tokenizer(markup);
    let mut builder = TableBuilder::default();
    if let Err(error) = builder.scan(&prepared) {
        warn!(tables = builder.tables.len(), "markup scan stopped early: {error}");
    }
    TableModel { tables: builder.tables }
}

/// An open `table` element: its finished rows plus the row and cell being filled.
#[derive(Default)]
struct Frame {
    rows: Vec<Row>,
    row: Option<Row>,
    cell: Option<String>,
}

impl Frame {
    fn close_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            if let Some(row) = self.row.as_mut() {
                row.push(cell.trim().to_string());
            }
        }
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            if !row.is_empty() {
                self.rows.push(row);
            }
        }
    }
}

#[derive(Default)]
struct TableBuilder {
    frames: Vec<Frame>,
    tables: Vec<Table>,
}

impl TableBuilder {
    fn scan(&mut self, markup: &str) -> Result<(), AssetSheetError> {
        let mut reader = XmlReader::lenient(markup.as_bytes());
        match_xml_events!(reader => {
            Event::Start(event) => self.start(&event.name().as_ref().to_ascii_lowercase()),
            Event::End(event) => self.end(&event.name().as_ref().to_ascii_lowercase()),
            Event::Text(event) => {
                if let Some(cell) = self.open_cell() {
                    cell.push_bytes_text(&event)?;
                }
            }
            Event::GeneralRef(event) => {
                if let Some(cell) = self.open_cell() {
                    cell.push_markup_ref(&event)?;
                }
            }
            Event::CData(event) => {
                if let Some(cell) = self.open_cell() {
                    cell.push_str(&event.xml_content()?);
                }
            }
        });
        Ok(())
    }

    fn start(&mut self, name: &[u8]) {
        match name {
            b"table" => self.frames.push(Frame::default()),
            b"tr" => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.close_row();
                    frame.row = Some(Row::new());
                }
            }
            b"td" => {
                if let Some(frame) = self.frames.last_mut() {
                    if frame.row.is_some() {
                        frame.close_cell();
                        frame.cell = Some(String::new());
                    }
                }
            }
            _ => (),
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"table" => {
                if let Some(mut frame) = self.frames.pop() {
                    frame.close_row();
                    if !frame.rows.is_empty() {
                        self.tables.push(Table { rows: frame.rows });
                    }
                }
            }
            b"tr" => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.close_row();
                }
            }
            b"td" => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.close_cell();
                }
            }
            _ => (),
        }
    }

    /// Innermost cell currently accumulating text.
    fn open_cell(&mut self) -> Option<&mut String> {
        self.frames.iter_mut().rev().find_map(|frame| frame.cell.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(model: &TableModel) -> Vec<Vec<Vec<&str>>> {
        model
            .iter()
            .map(|table| table.rows.iter().map(|row| row.iter().map(String::as_str).collect()).collect())
            .collect()
    }

    #[test]
    fn builds_rows_and_cells_in_order() {
        let markup = r#"<html><body><h1>Report</h1>
            <table border=1>
              <tr><td>Name</td><td>Value</td></tr>
              <tr><td> CSName </td><td>PC-CORP-0007</td></tr>
            </table></body></html>"#;
        let model = build_table_model(markup);
        assert_eq!(
            rows(&model),
            vec![vec![vec!["Name", "Value"], vec!["CSName", "PC-CORP-0007"]]]
        );
    }

    #[test]
    fn caption_rows_of_header_cells_are_dropped() {
        let markup = "<table><tr><th colspan=3>Win32_PhysicalMemory</th></tr>\
            <tr><td>Manufacturer</td><td>PartNumber</td><td>SerialNumber</td></tr>\
            <tr><td>Samsung</td><td>M471</td><td>3A1B</td></tr></table>";
        let model = build_table_model(markup);
        assert_eq!(
            rows(&model),
            vec![vec![
                vec!["Manufacturer", "PartNumber", "SerialNumber"],
                vec!["Samsung", "M471", "3A1B"]
            ]]
        );
        assert_eq!(model.tables[0].column("serialnumber"), Some(2));
    }

    #[test]
    fn drops_empty_rows_and_tables() {
        let markup = "<table></table><table><tr></tr><tr><td>a</td></tr></table><table><tr></tr></table>";
        let model = build_table_model(markup);
        assert_eq!(rows(&model), vec![vec![vec!["a"]]]);
        assert!(model.iter().all(|table| !table.rows.is_empty()));
        assert!(model.rows().all(|row| !row.is_empty()));
    }

    #[test]
    fn strips_noise_spans_before_parsing() {
        let markup = r#"<table><tr><td>PC<span style="font-size:0">.</span>-CORP</td></tr></table>"#;
        assert_eq!(rows(&build_table_model(markup)), vec![vec![vec!["PC-CORP"]]]);
    }

    #[test]
    fn resolves_entities_and_bare_ampersands() {
        let markup = "<table><tr><td>R&amp;D&nbsp;Lab</td><td>A & B</td><td>&#65;&copy;</td></tr></table>";
        assert_eq!(rows(&build_table_model(markup)), vec![vec![vec!["R&D Lab", "A & B", "A&copy;"]]]);
    }

    #[test]
    fn nested_tables_close_in_order() {
        let markup = "<table><tr><td>outer<table><tr><td>inner</td></tr></table></td><td>x</td></tr></table>";
        assert_eq!(
            rows(&build_table_model(markup)),
            vec![vec![vec!["inner"]], vec![vec!["outer", "x"]]]
        );
    }

    #[test]
    fn tolerates_unbalanced_markup() {
        let markup = "</td></tr></table><table><tr><td>a<br><td>b</tr><tr><td>c</table><p>";
        assert_eq!(rows(&build_table_model(markup)), vec![vec![vec!["a", "b"], vec!["c"]]]);
    }

    #[test]
    fn ignores_scripts_and_cells_outside_rows() {
        let markup = "<script>if (a < b && c) {}</script><table><td>loose</td><tr><td>kept</td></tr></table>";
        assert_eq!(rows(&build_table_model(markup)), vec![vec![vec!["kept"]]]);
    }

    #[test]
    fn keeps_tables_closed_before_a_tokenizer_error() {
        let markup = "<table><tr><td>a</td></tr></table><table><tr><td>b<!-- never closed";
        assert_eq!(rows(&build_table_model(markup)), vec![vec![vec!["a"]]]);
    }

    #[test]
    fn empty_markup_has_no_tables() {
        assert!(build_table_model("").is_empty());
    }

    #[test]
    fn table_header_helpers() {
        let model = build_table_model(
            "<table><tr><td> MACAddress </td><td>Description</td></tr><tr><td>AA</td><td>Intel</td></tr></table>",
        );
        let table = &model.tables[0];
        assert_eq!(table.header_keys(), vec!["macaddress", "description"]);
        assert_eq!(table.column("description"), Some(1));
        assert_eq!(table.column("tag"), None);
        assert_eq!(table.data_rows().len(), 1);
        assert_eq!(table.text(), "macaddressdescriptionaaintel");
    }
}
