use thiserror::Error;

/// Main error type for the asset sheet engine.
/// Aggregates errors from the standard library, dependencies and internal modules.
///
/// Only the collaborators (workbook reading, registry persistence, configuration)
/// return it; extraction and mapping never fail.
#[derive(Error, Debug)]
pub enum AssetSheetError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    // Third-party library errors
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),
}

pub(crate) trait ResultOptionChain {
    fn ok_none_else<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Self;
}

impl<T, E> ResultOptionChain for Result<Option<T>, E> {
    fn ok_none_else<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        match self {
            Ok(None) => f(),
            _ => self,
        }
    }
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, AssetSheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| AssetSheetError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_wraps_message() {
        let result: Result<(), AssetSheetError> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into());
        let error = result.with_prefix("Open registry").unwrap_err();
        assert_eq!(error.to_string(), "Open registry: missing");
    }

    #[test]
    fn ok_none_else_only_replaces_none() {
        let fallback = || Ok::<_, AssetSheetError>(Some(2));
        assert_eq!(Ok::<_, AssetSheetError>(None).ok_none_else(fallback).unwrap(), Some(2));
        assert_eq!(Ok::<_, AssetSheetError>(Some(1)).ok_none_else(fallback).unwrap(), Some(1));
    }
}
