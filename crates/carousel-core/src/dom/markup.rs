use quick_xml::escape::{escape, partial_escape, resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Document, NodeId};
use crate::{Error, Result};

/// Elements that never have children or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Named entities beyond the XML predefined set that show up in authored content
fn resolve_entity(entity: &str) -> Option<&'static str> {
    resolve_predefined_entity(entity).or(match entity {
        "nbsp" => Some("\u{a0}"),
        "copy" => Some("\u{a9}"),
        "reg" => Some("\u{ae}"),
        "hellip" => Some("\u{2026}"),
        "mdash" => Some("\u{2014}"),
        "ndash" => Some("\u{2013}"),
        "lsaquo" => Some("\u{2039}"),
        "rsaquo" => Some("\u{203a}"),
        "laquo" => Some("\u{ab}"),
        "raquo" => Some("\u{bb}"),
        _ => None,
    })
}

fn decode(raw: &[u8]) -> String {
    let raw = String::from_utf8_lossy(raw);
    match unescape_with(&raw, resolve_entity) {
        Ok(text) => text.into_owned(),
        // Unknown entity: keep the source text as-is
        Err(_) => raw.into_owned(),
    }
}

fn create_element(doc: &mut Document, start: &BytesStart) -> (NodeId, String) {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    let node = doc.create_element(&tag);

    let mut attributes = start.html_attributes();
    attributes.with_checks(false);
    for attr in attributes.flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = decode(&attr.value);
        doc.set_attr(node, &key, &value);
    }

    (node, tag)
}

/// Parse an HTML fragment and append the resulting nodes to `parent`
///
/// Tolerates HTML void elements without a closing slash, unmatched end tags
/// and the common named entities.
pub(super) fn parse_into(doc: &mut Document, parent: NodeId, html: &str) -> Result<()> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    // Open elements; the bottom entry is the fragment parent
    let mut stack: Vec<(NodeId, String)> = vec![(parent, String::new())];

    loop {
        let top = stack.last().map(|(n, _)| *n).unwrap_or(parent);
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let (node, tag) = create_element(doc, &e);
                doc.append_child(top, node);
                if !is_void(&tag) {
                    stack.push((node, tag));
                }
            }
            Ok(Event::Empty(e)) => {
                let (node, _) = create_element(doc, &e);
                doc.append_child(top, node);
            }
            Ok(Event::End(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                // Close up to the matching open element; ignore strays like </img>
                if let Some(pos) = stack.iter().skip(1).rposition(|(_, t)| *t == tag) {
                    stack.truncate(pos + 1);
                }
            }
            Ok(Event::Text(e)) => {
                let text = decode(&e);
                if !text.is_empty() {
                    let node = doc.create_text(&text);
                    doc.append_child(top, node);
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                let node = doc.create_text(&text);
                doc.append_child(top, node);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Markup(format!(
                    "Failed to parse markup at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            // Comments, doctype, declarations and processing instructions
            _ => {}
        }
    }

    Ok(())
}

/// Serialize `node` and its subtree as HTML
pub(super) fn serialize(doc: &Document, node: NodeId, out: &mut String) {
    if let Some(text) = doc.text(node) {
        out.push_str(&partial_escape(text));
        return;
    }

    let Some(tag) = doc.tag(node) else {
        return;
    };

    out.push('<');
    out.push_str(tag);
    for (key, value) in doc.attrs(node) {
        out.push(' ');
        out.push_str(key);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
    }
    out.push('>');

    if is_void(tag) {
        return;
    }

    for &child in doc.children(node) {
        serialize(doc, child, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
