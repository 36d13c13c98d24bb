//! Office Open XML package helpers: relationships and part paths.
use crate::error::AssetSheetError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

/// XML tag name for relationship elements
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Relationship type suffix of worksheet parts
pub(super) const KIND_WORKSHEET: &str = "/worksheet";
/// Relationship type suffix of legacy comment (note) parts
pub(super) const KIND_COMMENTS: &str = "/comments";

/// Loads relationships of one kind from a `.rels` part.
///
/// # Arguments
/// * `zip` - Zip archive handle
/// * `path` - Path to the relationships part within the archive
/// * `kind` - Suffix the relationship `Type` must end with
///
/// # Returns
/// Mapping of relationship IDs to archive paths; empty when the part is missing
pub(super) fn load_relationships<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    path: &str,
    kind: &str,
) -> Result<HashMap<String, String>, AssetSheetError> {
    let mut relationships: HashMap<String, String> = HashMap::new();
    let Some(mut reader) = zip.xml_reader(path)? else {
        return Ok(relationships);
    };
    let base = base_directory(path);
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let target = event.get_attribute_value("Target")?;
            let accepted = event
                .get_attribute_value("Type")?
                .map(|it| it.ends_with(kind))
                .unwrap_or(false);
            if accepted {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(&base, &target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Path of the `.rels` part describing `part` (`xl/worksheets/sheet1.xml` →
/// `xl/worksheets/_rels/sheet1.xml.rels`).
pub(super) fn relationships_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((directory, file)) => format!("{directory}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Directory that relative targets of a `.rels` part resolve against
/// (`xl/_rels/workbook.xml.rels` → `xl`).
fn base_directory(rels_path: &str) -> String {
    let directory = rels_path.rsplit_once('/').map(|(directory, _)| directory).unwrap_or("");
    directory
        .strip_suffix("_rels")
        .unwrap_or(directory)
        .trim_end_matches('/')
        .to_owned()
}

/// Resolves a relationship target to an archive path: absolute targets drop the
/// leading slash, relative ones are joined to `base` with `..` segments applied.
pub(crate) fn to_zip_path(base: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_owned();
    }
    let mut segments: Vec<&str> = base.split('/').filter(|segment| !segment.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => (),
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}
