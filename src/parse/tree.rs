//! Minimal owned XML element tree built from quick-xml events.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of this element and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Depth-first search for descendants with the given name.
    pub fn descendants_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in self.elements() {
            if child.name == name {
                out.push(child);
            } else {
                child.descendants_named(name, out);
            }
        }
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

/// Parse a document into its root element.
pub fn parse_document(content: &str) -> Result<Element> {
    let mut reader = Reader::from_str(content);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(start_element(&e)?),
            Ok(Event::Empty(e)) => {
                let element = start_element(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| Error::MalformedInput("unexpected closing tag".into()))?;
                trim_boundaries(&mut element);
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                push_text(&mut stack, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) => {
                push_text(&mut stack, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    push_text(&mut stack, &resolved);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedInput(format!(
                    "XML error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::MalformedInput(format!(
            "unclosed element <{}>",
            stack.last().map(|e| e.name.as_str()).unwrap_or_default()
        )));
    }

    root.ok_or_else(|| Error::MalformedInput("document has no root element".into()))
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(local_name(e.name().as_ref())).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::MalformedInput(err.to_string()))?;
        let key = String::from_utf8_lossy(local_name(attr.key.as_ref())).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        attrs.push((key, value));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::MalformedInput("multiple root elements".into())),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if let Some(Node::Text(existing)) = parent.children.last_mut() {
        existing.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}

/// XML whitespace only; U+3000 is content in statute text.
fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Drop indentation between elements and trim text at the element's edges.
///
/// Text is kept whole across entity references, so only the outer edges
/// are trimmed.
fn trim_boundaries(element: &mut Element) {
    element
        .children
        .retain(|n| !matches!(n, Node::Text(t) if t.chars().all(is_xml_space)));
    if let Some(Node::Text(first)) = element.children.first_mut() {
        *first = first.trim_start_matches(is_xml_space).to_string();
    }
    if let Some(Node::Text(last)) = element.children.last_mut() {
        *last = last.trim_end_matches(is_xml_space).to_string();
    }
}

/// Extract local name from namespaced XML name (e.g., "dc:title" -> "title").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code).map(|c| c.to_string())
}
