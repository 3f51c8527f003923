//! XML dump of a node list for visual inspection.
//!
//! One element per node, named after the node kind, with the defining fields
//! as attributes followed by the node's own debug attributes. Boxes nest their
//! sublist. The walk uses an explicit stack, so nesting depth is only bounded
//! by memory.

use crate::list::{NodeArena, NodeRef};
use crate::node::{Node, NodeKind};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebugError {
    #[error("XML write error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("debug output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn attributes(arena: &NodeArena, node: &Node) -> Vec<(&'static str, String)> {
    let id = node.id.to_string();
    match &node.kind {
        NodeKind::Glyph(g) => vec![
            ("id", id),
            ("components", g.components.clone()),
            ("wd", g.width.to_string()),
            ("ht", g.height.to_string()),
            ("dp", g.depth.to_string()),
            ("codepoint", g.codepoint.to_string()),
            ("face", g.font.as_ref().map_or(0, |f| f.face.id).to_string()),
        ],
        NodeKind::Glue(g) => vec![
            ("id", id),
            ("wd", g.width.to_string()),
            ("stretch", g.stretch.to_string()),
            ("stretchorder", g.stretch_order.to_string()),
            ("shrink", g.shrink.to_string()),
            ("shrinkorder", g.shrink_order.to_string()),
            ("subtype", g.subtype.to_string()),
        ],
        NodeKind::Kern(k) => vec![("id", id), ("kern", k.kern.to_string())],
        NodeKind::Rule(r) => vec![
            ("id", id),
            ("wd", r.width.to_string()),
            ("ht", r.height.to_string()),
            ("dp", r.depth.to_string()),
        ],
        NodeKind::Disc(_) => vec![("id", id)],
        NodeKind::Penalty(p) => vec![
            ("id", id),
            ("penalty", p.penalty.to_string()),
            ("width", p.width.to_string()),
        ],
        NodeKind::StartStop(s) => {
            let start = s
                .start
                .map_or_else(|| "-".to_string(), |r| arena.get(r).id.to_string());
            let mut attrs = vec![("id", id), ("action", s.action.to_string()), ("start", start)];
            if let Some(link) = &s.value {
                attrs.push(("value", link.destination().to_string()));
            }
            attrs
        }
        NodeKind::HList(h) => vec![
            ("id", id),
            ("wd", h.width.to_string()),
            ("ht", h.height.to_string()),
            ("dp", h.depth.to_string()),
            ("r", h.glue_set.to_string()),
        ],
        NodeKind::VList(v) => vec![
            ("id", id),
            ("wd", v.width.to_string()),
            ("ht", v.height.to_string()),
            ("dp", v.depth.to_string()),
        ],
    }
}

struct Frame {
    cur: Option<NodeRef>,
    close: Option<&'static str>,
}

fn xml<E: std::fmt::Display>(e: E) -> DebugError {
    DebugError::Xml(e.to_string())
}

fn write_list<W: Write>(
    arena: &NodeArena,
    head: Option<NodeRef>,
    writer: &mut Writer<W>,
) -> Result<(), DebugError> {
    let mut stack = vec![Frame { cur: head, close: None }];

    while let Some(top) = stack.len().checked_sub(1) {
        let Some(r) = stack[top].cur else {
            if let Some(name) = stack[top].close {
                writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml)?;
            }
            stack.pop();
            continue;
        };
        stack[top].cur = arena.next(r);

        let node = arena.get(r);
        let mut elt = BytesStart::new(node.name());
        for (key, value) in attributes(arena, node) {
            elt.push_attribute((key, value.as_str()));
        }
        for (key, value) in &node.attributes {
            elt.push_attribute((key.as_str(), value.as_str()));
        }

        match node.kind.sublist() {
            Some(Some(child)) => {
                writer.write_event(Event::Start(elt)).map_err(xml)?;
                stack.push(Frame {
                    cur: Some(child),
                    close: Some(node.name()),
                });
            }
            _ => writer.write_event(Event::Empty(elt)).map_err(xml)?,
        }
    }
    Ok(())
}

/// Renders the list starting at `head` as indented XML.
pub fn debug_to_string(arena: &NodeArena, head: Option<NodeRef>) -> Result<String, DebugError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    write_list(arena, head, &mut writer)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Writes the XML dump of the list starting at `head` to `path`.
pub fn debug_to_file(
    arena: &NodeArena,
    head: Option<NodeRef>,
    path: impl AsRef<Path>,
) -> Result<(), DebugError> {
    let path = path.as_ref();
    log::debug!("writing node list dump to {}", path.display());
    let file = BufWriter::new(File::create(path)?);
    let mut writer = Writer::new_with_indent(file, b' ', 4);
    write_list(arena, head, &mut writer)?;
    writer.into_inner().flush()?;
    Ok(())
}
