//! Rich-text to node-list compiler for a box-and-glue typesetter.
//!
//! This crate re-exports the workspace: lengths and colors from
//! `quire-types`, the settings cascade from `quire-style`, the collaborator
//! seams from `quire-traits`, the node list from `quire-node`, the rich-text
//! tree from `quire-idf` and the compiler from `quire-layout`.

pub use quire_idf::{Item, RichText};
pub use quire_layout::{
    FilesystemFaceLoader, FontCache, FontFamily, LayoutError, ParagraphOptions, RustybuzzShaper,
    Typesetter, TypesetterConfig,
};
pub use quire_node::{
    append_line_end_after, debug_to_file, debug_to_string, hpack, hpack_to, node_width, vpack,
    Breakpoint, DebugError, Disc, Glue, GlueOrder, GlueSubtype, Glyph, HList, Kern, LineBreaker,
    LinebreakSettings, Node, NodeArena, NodeId, NodeKind, NodeRef, Penalty, Rule, StartStop, VList,
};
pub use quire_style::{
    FontFamilyId, FontStyle, FontWeight, HorizontalAlignment, Hyperlink, OpenTypeFeature,
    SettingKind, TypesettingSettings,
};
pub use quire_traits::{
    Atom, ColorTable, Face, FaceLoader, Font, FontError, FontSource, InMemoryColorTable,
    InMemoryFaceLoader, Shaper,
};
pub use quire_types::{must_sp, sp, Color, ScaledPoint, UnitError};

