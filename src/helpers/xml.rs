//! XML event helpers shared by the workbook reader and the report table builder.
//! Provides a reader wrapper with two configurations (strict-ish for OOXML parts,
//! lenient for report markup) and helper traits for attribute and text processing.

use crate::error::AssetSheetError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),

    #[error("Parse attribute value '{0}' failed")]
    ParseAttributeValueError(String),
}

/// XML reader wrapper holding its own event buffer
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    /// Creates a reader configured for workbook parts (sheets, shared strings, comments)
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        let buffer = Vec::with_capacity(1024);
        XmlReader { reader, buffer }
    }

    /// Creates a reader for HTML-ish report markup: end names are not checked,
    /// stray closing tags are accepted and `<td/>` is reported as start + end.
    pub(crate) fn lenient(buf_reader: R) -> XmlReader<R> {
        let mut xml = Self::new(buf_reader);
        xml.reader.config_mut().allow_unmatched_ends = true;
        xml
    }

    /// Reads the next XML event from the reader
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, AssetSheetError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(AssetSheetError::XmlError(error)),
        }
    }
}

/// Helper trait for XML attributes providing convenient value extraction and parsing
pub(crate) trait XmlAttributeHelper<'a> {
    /// Gets the unescaped attribute value as a string
    fn get_value(&self) -> Result<Cow<'a, str>, AssetSheetError>;

    /// Parses the attribute value to the specified type
    fn parse_value<T: FromStr>(&self) -> Result<T, AssetSheetError>;
}

impl<'a> XmlAttributeHelper<'a> for Attribute<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, AssetSheetError> {
        Ok(self.unescape_value()?)
    }

    fn parse_value<T: FromStr>(&self) -> Result<T, AssetSheetError> {
        let value = self.get_value()?;
        value
            .parse()
            .map_err(|_| XmlError::ParseAttributeValueError(value.to_string()).into())
    }
}

/// Helper trait for XML nodes providing attribute access methods
pub(crate) trait XmlNodeHelper<'a> {
    /// Gets an attribute value by name
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, AssetSheetError>;

    /// Parses an attribute value to the specified type
    fn parse_attribute_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, AssetSheetError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, AssetSheetError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.get_value())
            .transpose()
    }

    fn parse_attribute_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, AssetSheetError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.parse_value())
            .transpose()
    }
}

/// Helper trait for building text content from XML events
pub(crate) trait XmlTextContextHelper {
    /// Appends text content from BytesText event
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), AssetSheetError>;

    /// Appends text content from BytesRef event (handles entities and character references)
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), AssetSheetError>;

    /// Like `push_bytes_ref`, but for report markup: `&nbsp;` becomes a space and
    /// unknown named entities are kept verbatim instead of failing.
    fn push_markup_ref(&mut self, bytes: &BytesRef) -> Result<(), AssetSheetError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), AssetSheetError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), AssetSheetError> {
        let raw = bytes.xml_content()?;
        if let Some(character) = resolve_char_ref(&raw)? {
            self.push(character);
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::ParseEntityError(raw.to_string()))?;
        }
        Ok(())
    }

    fn push_markup_ref(&mut self, bytes: &BytesRef) -> Result<(), AssetSheetError> {
        let raw = bytes.xml_content()?;
        if raw.eq_ignore_ascii_case("nbsp") {
            self.push(' ');
        } else if let Some(character) = resolve_char_ref(&raw).ok().flatten() {
            self.push(character);
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            self.push('&');
            self.push_str(&raw);
            self.push(';');
        }
        Ok(())
    }
}

/// Resolves `#123` and `#x7B` character references; `None` for named entities.
fn resolve_char_ref(raw: &str) -> Result<Option<char>, AssetSheetError> {
    let Some(number) = raw.strip_prefix('#') else {
        return Ok(None);
    };
    let code = if let Some(hex) = number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
        u32::from_str_radix(hex, 16)?
    } else {
        number.parse::<u32>()?
    };
    Ok(std::char::from_u32(code))
}

#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}
