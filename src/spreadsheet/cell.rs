/// Represents one non-empty cell: its display value and an optional comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Cell value as text (numbers as written in the file, booleans as `TRUE`/`FALSE`)
    pub value: String,
    /// Comment (note) attached to the cell
    pub comment: Option<String>,
}

impl Cell {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
            comment: None,
        }
    }

    /// Converts the OOXML boolean encoding (`1`/`0`) to text.
    pub(crate) fn boolean(raw: &str) -> Self {
        Self::new(if raw.trim() == "1" { "TRUE" } else { "FALSE" })
    }

    /// A cell without value nor comment carries nothing worth storing.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.comment.is_none()
    }
}
