use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::reference::CellAddress;
use crate::spreadsheet::TabularDocument;
use std::collections::HashMap;

/// In-memory worksheet: sparse cells keyed by address plus the used bounds.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    cells: HashMap<CellAddress, Cell>,
    row_upper_bound: usize,
    col_upper_bound: usize,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    /// Builds a sheet from row-major values starting at `A1`; empty strings stay empty.
    pub fn from_rows<R, S>(name: &str, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sheet = Self::new(name);
        for (row_index, row) in rows.into_iter().enumerate() {
            for (col_index, value) in row.into_iter().enumerate() {
                let value = value.as_ref();
                if !value.is_empty() {
                    sheet.set_value(CellAddress::new(row_index + 1, col_index + 1), value);
                }
            }
        }
        sheet
    }

    /// Returns true if the sheet contains no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, address: CellAddress) -> Option<&Cell> {
        self.cells.get(&address)
    }

    /// Adds or replaces a cell, updating the used bounds.
    pub fn push(&mut self, address: CellAddress, cell: Cell) {
        if cell.is_blank() {
            self.cells.remove(&address);
            return;
        }
        self.update_bound(address);
        self.cells.insert(address, cell);
    }

    /// Attaches a comment to a cell, creating the cell if needed.
    pub fn set_comment(&mut self, address: CellAddress, comment: &str) {
        self.update_bound(address);
        self.cells.entry(address).or_default().comment = Some(comment.to_owned());
    }

    fn update_bound(&mut self, address: CellAddress) {
        self.row_upper_bound = self.row_upper_bound.max(address.row);
        self.col_upper_bound = self.col_upper_bound.max(address.column);
    }
}

impl TabularDocument for Sheet {
    fn max_row(&self) -> usize {
        self.row_upper_bound
    }

    fn max_column(&self) -> usize {
        self.col_upper_bound
    }

    fn value(&self, address: CellAddress) -> Option<&str> {
        self.cells
            .get(&address)
            .map(|cell| cell.value.as_str())
            .filter(|value| !value.is_empty())
    }

    fn comment(&self, address: CellAddress) -> Option<&str> {
        self.cells.get(&address).and_then(|cell| cell.comment.as_deref())
    }

    fn set_value(&mut self, address: CellAddress, value: &str) {
        match self.cells.get_mut(&address) {
            Some(cell) => {
                cell.value = value.to_owned();
                if cell.is_blank() {
                    self.cells.remove(&address);
                }
            }
            None if !value.is_empty() => {
                self.update_bound(address);
                self.cells.insert(address, Cell::new(value));
            }
            None => (),
        }
    }
}
