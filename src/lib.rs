//! # Asset Sheet
//!
//! Turns a hardware-inventory HTML report and an asset registry spreadsheet into
//! the values of an asset configuration form.
//!
//! ## Pipeline
//!
//! - **Report modelling**: markup is scanned into tables of rows of cell texts
//!   ([`report::build_table_model`])
//! - **Hardware extraction**: ordered per-field strategies over the table model
//!   and the raw markup ([`report::extract_hardware`])
//! - **Note parsing**: accessory serials from free-text registry notes
//!   ([`notes::parse_note`])
//! - **Correlation**: registry data joined through the asset id at the end of
//!   the computer name ([`correlate::correlate`])
//! - **Template location**: target cells from a manual table plus label
//!   discovery ([`template::locate_fields`])
//!
//! Extraction, parsing, correlation and location never fail; a value that
//! cannot be found is an empty string or an absent location. Only the
//! collaborators that touch files (workbooks, the registry store and the
//! configuration) return [`AssetSheetError`].
pub mod config;
pub mod correlate;
pub mod error;
pub mod fields;
pub mod form;
pub mod helpers;
pub mod notes;
pub mod registry;
pub mod report;
pub mod spreadsheet;
pub mod template;

pub use config::Config;
pub use correlate::correlate;
pub use correlate::correlation_id;
pub use error::AssetSheetError;
pub use fields::CanonicalField;
pub use fields::FieldSet;
pub use form::fill_form;
pub use form::FormOutput;
pub use form::FormRequest;
pub use helpers::text::decode_markup;
pub use notes::parse_note;
pub use registry::AssetRecord;
pub use registry::Registry;
pub use registry::RegistryStore;
pub use spreadsheet::TabularDocument;
pub use template::locate_fields;
pub use template::FieldLocations;
pub use template::TemplateLayout;
