// crates/autosar-cfg-arxml/src/writer.rs

//! Serializes an [`Element`] tree into UTF-8 XML text.

use crate::error::ArxmlError;
use crate::tree::Element;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Renders `root` as a complete document with an XML declaration.
///
/// `pretty` only toggles two-space indentation; the element content is the
/// same either way. Text and attribute values are escaped by `quick-xml`.
///
/// # Errors
/// Returns `XmlWriting` if the underlying writer fails.
pub fn write_document(root: &Element, pretty: bool) -> Result<String, ArxmlError> {
    let mut writer = if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;

    let mut buffer = writer.into_inner();
    if pretty {
        buffer.push(b'\n');
    }
    Ok(String::from_utf8(buffer)?)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), ArxmlError> {
    let mut start = BytesStart::new(element.name());
    for attribute in element.attributes() {
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }

    let text = element.text();
    if text.is_none() && element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in element.children() {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}
