use crate::error::AssetSheetError;
use glob::Pattern;

/// Chooses which worksheet of a workbook to read.
/// The first sheet matching any pattern wins; without a match (or without
/// patterns) the workbook's active sheet is used.
#[derive(Clone, Debug, Default)]
pub struct SheetSelector {
    /// Sheet name patterns, e.g. `2021 NEW` or `Asset*`.
    pub sheet_name_patterns: Option<Vec<Pattern>>,
}

impl SheetSelector {
    /// Selector that always falls back to the active sheet.
    pub fn active() -> Self {
        Self::default()
    }

    /// Compiles glob patterns; an empty list behaves like [`SheetSelector::active`].
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, AssetSheetError> {
        if patterns.is_empty() {
            return Ok(Self::active());
        }
        let patterns = patterns
            .iter()
            .map(|pattern| Pattern::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sheet_name_patterns: Some(patterns),
        })
    }

    /// Checks if a sheet name matches the patterns.
    /// Returns false when no patterns are specified.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        self.sheet_name_patterns
            .as_ref()
            .map(|patterns| patterns.iter().any(|pattern| pattern.matches(sheet_name)))
            .unwrap_or(false)
    }
}
