// crates/autosar-cfg-arxml/src/reader.rs

//! Parses XML text into an owned [`Element`] tree.
//!
//! `quick-xml`'s `NsReader` resolves every element's namespace while reading,
//! so the tree keeps both the name as written and the namespace URI it is
//! bound to. Comments, processing instructions and the doctype are dropped.

use crate::error::ArxmlError;
use crate::tree::{Attribute, Element};
use core::str;
use log::trace;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{Error as XmlError, NsReader};

/// Deepest element nesting accepted by [`parse_element`]. The root element is
/// at depth 1.
pub const MAX_DEPTH: usize = 1024;

/// Parses `content` and returns its root element.
///
/// The whole input is consumed before anything is returned, so a failure
/// never yields a partial tree.
///
/// # Errors
/// Returns `XmlParsing` for syntax errors reported by `quick-xml`
/// (unclosed tags, mismatched end tags, ...), `UnknownPrefix` for undeclared
/// namespace prefixes and `Malformed` when the input does not contain exactly
/// one root element or nests elements deeper than [`MAX_DEPTH`].
pub fn parse_element(content: &str) -> Result<Element, ArxmlError> {
    let mut reader = NsReader::from_str(content);

    // Open elements, innermost last.
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ArxmlError::Malformed {
                        reason: "document has more than one root element",
                    });
                }
                check_depth(&stack)?;
                stack.push(open_element(&resolved, &start)?);
            }
            Event::Empty(start) => {
                check_depth(&stack)?;
                let element = open_element(&resolved, &start)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(ArxmlError::Malformed {
                    reason: "closing tag without matching opening tag",
                })?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                // Entity references arrive as separate `GeneralRef` events,
                // so the raw bytes are the literal character data.
                append_text(&mut stack, str::from_utf8(&text)?)?;
            }
            Event::CData(data) => {
                append_text(&mut stack, str::from_utf8(&data)?)?;
            }
            Event::GeneralRef(reference) => {
                let resolved = resolve_reference(str::from_utf8(&reference)?)?;
                append_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ArxmlError::Malformed {
            reason: "unexpected end of input: unclosed element",
        });
    }
    root.ok_or(ArxmlError::Malformed {
        reason: "document has no root element",
    })
}

/// Fails when an element opened below `stack` would exceed [`MAX_DEPTH`].
fn check_depth(stack: &[Element]) -> Result<(), ArxmlError> {
    if stack.len() >= MAX_DEPTH {
        return Err(ArxmlError::Malformed {
            reason: "element nesting too deep",
        });
    }
    Ok(())
}

/// Builds an element (without children) from a start tag.
fn open_element(resolved: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element, ArxmlError> {
    let qname = start.name();
    let mut element = Element::new(str::from_utf8(qname.as_ref())?);

    element.namespace = match resolved {
        ResolveResult::Bound(namespace) => Some(str::from_utf8(namespace.as_ref())?.to_string()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(ArxmlError::UnknownPrefix {
                prefix: String::from_utf8_lossy(prefix).into_owned(),
            });
        }
    };

    for attribute in start.attributes() {
        let attribute = attribute.map_err(XmlError::from)?;
        let key = str::from_utf8(attribute.key.as_ref())?;
        let raw_value = str::from_utf8(&attribute.value)?;
        element.attributes.push(Attribute {
            name: key.to_string(),
            value: unescape(raw_value)?.into_owned(),
        });
    }

    trace!("Opened <{}> (namespace {:?})", element.name, element.namespace);
    Ok(element)
}

/// Finalizes `element` and attaches it to its parent, or makes it the root.
fn close_element(
    stack: &mut [Element],
    root: &mut Option<Element>,
    mut element: Element,
) -> Result<(), ArxmlError> {
    // Character data is kept trimmed; whitespace-only text is formatting.
    if let Some(text) = element.text.take() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            element.text = Some(trimmed.to_string());
        }
    }

    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(ArxmlError::Malformed {
            reason: "document has more than one root element",
        }),
    }
}

fn append_text(stack: &mut [Element], text: &str) -> Result<(), ArxmlError> {
    match stack.last_mut() {
        Some(current) => {
            current
                .text
                .get_or_insert_with(String::new)
                .push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ArxmlError::Malformed {
            reason: "text content outside of the root element",
        }),
    }
}

/// Resolves the name of a `&name;` reference: the five predefined entities
/// and decimal or hexadecimal character references.
fn resolve_reference(name: &str) -> Result<String, ArxmlError> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        return value
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or(ArxmlError::Malformed {
                reason: "invalid character reference",
            });
    }

    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| ArxmlError::UnknownEntity {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://autosar.org/schema/r4.0";

    #[test]
    fn test_parses_namespaces_attributes_and_text() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<AUTOSAR xmlns="http://autosar.org/schema/r4.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <AR-PACKAGES>
    <AR-PACKAGE>
      <SHORT-NAME> CanConfiguration </SHORT-NAME>
    </AR-PACKAGE>
  </AR-PACKAGES>
</AUTOSAR>"#;
        let root = parse_element(xml).unwrap();
        assert_eq!(root.name(), "AUTOSAR");
        assert_eq!(root.namespace(), Some(NS));
        assert_eq!(root.attribute("xmlns"), Some(NS));
        assert_eq!(root.text(), None, "formatting whitespace must be dropped");

        let package = root.descendants_named("AR-PACKAGE").next().unwrap();
        assert_eq!(package.namespace(), Some(NS));
        assert_eq!(package.short_name(), Some("CanConfiguration"));
    }

    #[test]
    fn test_prefixed_and_unbound_elements() {
        let xml = r#"<ar:AUTOSAR xmlns:ar="http://autosar.org/schema/r4.0"><ar:AR-PACKAGES/><PLAIN/></ar:AUTOSAR>"#;
        let root = parse_element(xml).unwrap();
        assert_eq!(root.local_name(), "AUTOSAR");
        assert!(root.children()[0].is("AR-PACKAGES", Some(NS)));
        assert!(root.children()[1].is("PLAIN", None));
    }

    #[test]
    fn test_entities_are_resolved() {
        let xml = r#"<A note="x &lt; y"><B>B&amp;R &#65;&#x42;</B></A>"#;
        let root = parse_element(xml).unwrap();
        assert_eq!(root.attribute("note"), Some("x < y"));
        assert_eq!(root.children()[0].text(), Some("B&R AB"));
    }

    #[test]
    fn test_cdata_is_text() {
        let root = parse_element("<A><![CDATA[1 < 2]]></A>").unwrap();
        assert_eq!(root.text(), Some("1 < 2"));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            parse_element("<not-xml"),
            Err(ArxmlError::XmlParsing(_))
        ));
        assert!(matches!(
            parse_element("<A><B></A>"),
            Err(ArxmlError::XmlParsing(_))
        ));
    }

    #[test]
    fn test_document_shape_errors() {
        assert!(matches!(parse_element(""), Err(ArxmlError::Malformed { .. })));
        assert!(parse_element("<A><B>").is_err());
        assert!(matches!(
            parse_element("<A/><B/>"),
            Err(ArxmlError::Malformed { .. })
        ));
        assert!(matches!(
            parse_element("just text"),
            Err(ArxmlError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unknown_prefix_and_entity() {
        assert!(matches!(
            parse_element("<x:A/>"),
            Err(ArxmlError::UnknownPrefix { .. })
        ));
        assert!(matches!(
            parse_element("<A>&nbsp;</A>"),
            Err(ArxmlError::UnknownEntity { .. })
        ));
    }

    fn nested(depth: usize) -> String {
        format!("{}<A/>{}", "<A>".repeat(depth - 1), "</A>".repeat(depth - 1))
    }

    #[test]
    fn test_nesting_depth_is_limited() {
        let root = parse_element(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(root.descendant_count(), MAX_DEPTH - 1);

        let err = parse_element(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(
            matches!(err, ArxmlError::Malformed { reason: "element nesting too deep" }),
            "unexpected error: {}",
            err
        );
        let unclosed = "<A>".repeat(MAX_DEPTH + 1);
        assert!(matches!(
            parse_element(&unclosed),
            Err(ArxmlError::Malformed { reason: "element nesting too deep" })
        ));
    }
}
