//! # Tabular Document Module
//!
//! The engine reads and writes spreadsheets only through [`TabularDocument`]:
//! 1-based cell addressing, cell values, cell comments and cell writes.
//! [`Sheet`] is the in-memory implementation; [`XlsxWorkbook`] materialises a
//! worksheet of an `.xlsx` file as a `Sheet`.
pub mod cell;
pub mod criteria;
pub(crate) mod excel;
pub mod reference;
pub mod sheet;
pub mod xlsx;

pub use cell::Cell;
pub use criteria::SheetSelector;
pub use reference::CellAddress;
pub use sheet::Sheet;
pub use xlsx::XlsxWorkbook;

use thiserror::Error;

/// Errors raised while opening workbooks or addressing cells.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Invalid cell reference '{0}'")]
    InvalidReference(String),

    #[error("Workbook part '{0}' not found")]
    FileError(String),

    #[error("Workbook '{0}' contains no worksheet")]
    SpreadsheetEmptyError(String),

    #[error("Worksheet '{0}' not found")]
    SheetNotFound(String),
}

/// A grid of addressable cells, the only view of a spreadsheet the engine needs.
pub trait TabularDocument {
    /// Last used row (1-based), 0 when the document is empty.
    fn max_row(&self) -> usize;

    /// Last used column (1-based), 0 when the document is empty.
    fn max_column(&self) -> usize;

    /// Value of the cell, `None` when the cell is empty.
    fn value(&self, address: CellAddress) -> Option<&str>;

    /// Free-text comment attached to the cell, if any.
    fn comment(&self, address: CellAddress) -> Option<&str>;

    /// Overwrites the cell value.
    fn set_value(&mut self, address: CellAddress, value: &str);

    /// Reads a cell by A1 reference.
    fn value_at(&self, reference: &str) -> Result<Option<&str>, SpreadsheetError> {
        let address = reference.parse::<CellAddress>()?;
        Ok(self.value(address))
    }

    /// Writes a cell by A1 reference.
    fn set_value_at(&mut self, reference: &str, value: &str) -> Result<(), SpreadsheetError> {
        let address = reference.parse::<CellAddress>()?;
        self.set_value(address, value);
        Ok(())
    }

    /// Values of columns `1..=max_column` of one row.
    fn row(&self, row: usize, max_column: usize) -> Vec<Option<&str>> {
        (1..=max_column)
            .map(|column| self.value(CellAddress::new(row, column)))
            .collect()
    }
}
