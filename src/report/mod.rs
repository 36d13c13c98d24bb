//! Hardware inventory report processing: markup → [`TableModel`] → [`FieldSet`](crate::fields::FieldSet).
pub mod extract;
pub mod table;

pub use extract::extract_fields;
pub use extract::extract_hardware;
pub use extract::HardwareReport;
pub use table::build_table_model;
pub use table::clean_markup;
pub use table::Row;
pub use table::Table;
pub use table::TableModel;
