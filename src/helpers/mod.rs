//! Low-level helpers shared by the report and workbook readers.

pub(crate) mod reader;
pub mod text;
pub(crate) mod xml;
pub(crate) mod zip;
