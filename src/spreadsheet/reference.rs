//! A1-style cell references.

use crate::spreadsheet::SpreadsheetError;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// A cell coordinate, 1-based on both axes (`A1` is row 1, column 1).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellAddress {
    pub row: usize,
    pub column: usize,
}

impl CellAddress {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The cell immediately to the right.
    pub fn right(&self) -> Self {
        Self::new(self.row, self.column + 1)
    }
}

/// Converts a 1-based column number to its letters (1 → "A", 27 → "AA").
pub fn column_to_letters(column: usize) -> String {
    let mut column = column;
    let mut letters = String::new();
    while column > 0 {
        column -= 1;
        letters.insert(0, char::from(b'A' + (column % 26) as u8));
        column /= 26;
    }
    letters
}

/// Converts column letters to a 1-based column number ("A" → 1).
pub fn letters_to_column(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0usize, |column, letter| {
        if !letter.is_ascii_alphabetic() {
            return None;
        }
        column
            .checked_mul(26)?
            .checked_add(letter.to_ascii_uppercase() as usize - 'A' as usize + 1)
    })
}

impl Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", column_to_letters(self.column), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = SpreadsheetError;

    /// Parses references such as `C3` or `$AB$12` (case-insensitive).
    fn from_str(reference: &str) -> Result<Self, Self::Err> {
        let invalid = || SpreadsheetError::InvalidReference(reference.to_owned());
        let trimmed = reference.trim().replace('$', "");
        let split = trimmed
            .find(|character: char| character.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);
        let column = letters_to_column(letters).ok_or_else(invalid)?;
        let row = digits.parse::<usize>().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        Ok(Self::new(row, column))
    }
}

impl TryFrom<String> for CellAddress {
    type Error = SpreadsheetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellAddress> for String {
    fn from(address: CellAddress) -> Self {
        address.to_string()
    }
}
