//! Fills the configuration form: extract, correlate, locate, write.

use crate::fields::CanonicalField;
use crate::fields::FieldSet;
use crate::registry::RegistryStore;
use crate::report::extract_hardware;
use crate::spreadsheet::CellAddress;
use crate::spreadsheet::TabularDocument;
use crate::template::locate_fields;
use crate::template::FieldLocations;
use crate::template::TemplateLayout;
use serde::Serialize;
use tracing::debug;
use tracing::info;

/// Values supplied by the operator rather than found in any document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormRequest {
    pub ossm_ticket: String,
    pub delivery_note: String,
}

/// One value to be written into the form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellWrite {
    pub field: CanonicalField,
    pub address: CellAddress,
    pub value: String,
}

/// Everything the form writer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormOutput {
    pub fields: FieldSet,
    pub locations: FieldLocations,
    /// Writes in vocabulary order; only fields with a value and a location
    pub writes: Vec<CellWrite>,
    pub file_name: String,
}

/// Suggested name of the filled form, `{Computer Name}_ConfigForm.xlsx`.
pub fn output_file_name(fields: &FieldSet) -> String {
    let name = fields.get(CanonicalField::ComputerName);
    let name = if name.is_empty() { "Unknown" } else { name };
    format!("{name}_ConfigForm.xlsx")
}

/// Pairs each non-empty field with its target cell.
pub fn plan_writes(fields: &FieldSet, locations: &FieldLocations) -> Vec<CellWrite> {
    fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(field, value)| {
            let address = locations.get(field)?;
            Some(CellWrite {
                field,
                address,
                value: value.to_owned(),
            })
        })
        .collect()
}

/// Runs the whole pipeline for one report and applies the writes to `template`.
pub fn fill_form<D: TabularDocument + ?Sized>(
    markup: &str,
    request: &FormRequest,
    store: &RegistryStore,
    template: &mut D,
    layout: &TemplateLayout,
) -> FormOutput {
    let mut fields = extract_hardware(markup);
    fields.set(CanonicalField::OssmTicket, request.ossm_ticket.trim());
    fields.set(CanonicalField::DeliveryNote, request.delivery_note.trim());
    let fields = store.correlate(fields);

    let locations = locate_fields(template, layout);
    let writes = plan_writes(&fields, &locations);
    for write in &writes {
        debug!(field = write.field.label(), address = %write.address, "writing form cell");
        template.set_value(write.address, &write.value);
    }

    let file_name = output_file_name(&fields);
    info!(file = file_name.as_str(), cells = writes.len(), "filled configuration form");
    FormOutput {
        fields,
        locations,
        writes,
        file_name,
    }
}
