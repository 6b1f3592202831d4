use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::str;

use crate::errors::{Result, WebDavError};
use crate::models::{PropertyNode, XmlElement, XmlNode, XmlTree};

pub const DAV_NAMESPACE: &str = "DAV:";

/// Deepest element nesting accepted from a server. Property conversion and
/// descendant lookups recurse over the tree, so deeper documents are refused.
pub const MAX_NESTING_DEPTH: usize = 256;

/// One `response` block of a multi-status document
#[derive(Debug, Clone, PartialEq)]
pub struct PropfindEntry {
    /// Raw href with a single trailing slash removed
    pub href: String,
    /// The parsed `propstat/prop` mapping
    pub properties: PropertyNode,
    /// The `propstat/status` line, e.g. `HTTP/1.1 200 OK`
    pub status: Option<String>,
    pub is_collection: bool,
}

/// Parses an XML document into its root element.
///
/// The declaration, comments, processing instructions and whitespace-only
/// text around the root are skipped.
pub fn parse_document(xml_text: &str) -> Result<XmlElement> {
    let mut reader = NsReader::from_str(xml_text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
            _ => None,
        };

        match event {
            Event::Start(e) => {
                check_depth(&stack)?;
                stack.push(XmlElement::new(get_local_name(&e)?, namespace));
            }
            Event::Empty(e) => {
                check_depth(&stack)?;
                let element = XmlElement::new(get_local_name(&e)?, namespace);
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| WebDavError::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = e.unescape()?;
                    if !text.is_empty() {
                        parent.nodes.push(XmlNode::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.nodes.push(XmlNode::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(WebDavError::Xml("unexpected end of document".to_string()));
    }

    root.ok_or_else(|| WebDavError::Xml("document has no root element".to_string()))
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.nodes.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn check_depth(stack: &[XmlElement]) -> Result<()> {
    if stack.len() >= MAX_NESTING_DEPTH {
        return Err(WebDavError::Xml(format!(
            "element nesting deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }
    Ok(())
}

fn get_local_name(e: &BytesStart<'_>) -> Result<String> {
    let local = e.local_name();
    let name = str::from_utf8(local.as_ref())
        .map_err(|e| WebDavError::Xml(format!("Invalid UTF-8 in element name: {}", e)))?;
    Ok(name.to_string())
}

/// Walks a multi-status root and returns one entry per `response`, in
/// document order. The first entry (the collection itself) is skipped.
///
/// Fails with `NoSuchDirectory` when the root has no child elements at all.
pub fn parse_multistatus<T: XmlTree>(root: &T, url: &str) -> Result<Vec<PropfindEntry>> {
    if root.elements().next().is_none() {
        return Err(WebDavError::no_such_directory(url));
    }

    root.elements().skip(1).map(parse_response_entry).collect()
}

/// Converts one `response` element into an entry
pub fn parse_response_entry<T: XmlTree>(response: &T) -> Result<PropfindEntry> {
    let href = response
        .find_descendant(DAV_NAMESPACE, "href")
        .and_then(|href| href.leading_text())
        .ok_or_else(|| WebDavError::Xml("response entry without href".to_string()))?;
    let href = href.strip_suffix('/').unwrap_or(href).to_string();

    let propstat = response
        .find_descendant(DAV_NAMESPACE, "propstat")
        .map(PropertyNode::from_element)
        .unwrap_or(PropertyNode::Empty);

    let properties = propstat.get("prop").cloned().unwrap_or_default();
    let status = propstat.text("status").map(str::to_string);
    let is_collection = properties.is_collection();

    Ok(PropfindEntry {
        href,
        properties,
        status,
        is_collection,
    })
}
