//! The node list: the flat, ordered sequence of typographic primitives the
//! rich-text compiler produces and the line breaker consumes.
//!
//! Nodes live in a [`NodeArena`] and are addressed by [`NodeRef`]. Lists are
//! threaded through the arena with next/prev links, so a stop marker can refer
//! back to its start marker by index without any ownership cycle.

pub mod debug;
pub mod linebreak;
pub mod list;
pub mod node;
pub mod pack;

pub use debug::{debug_to_file, debug_to_string, DebugError};
pub use linebreak::{Breakpoint, LineBreaker, LinebreakSettings};
pub use list::{ListIter, NodeArena, NodeRef};
pub use node::{
    ActionType, Disc, Glue, GlueOrder, GlueSubtype, Glyph, HList, Kern, Node, NodeId, NodeKind,
    PageCallback, Penalty, Rule, StartStop, VList,
};
pub use pack::{append_line_end_after, hpack, hpack_to, node_width, vpack};
