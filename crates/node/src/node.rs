use crate::list::NodeRef;
use quire_style::Hyperlink;
use quire_traits::Font;
use quire_types::ScaledPoint;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-wide node number. Strictly increasing in creation order and never
/// reused. Only meant for debugging and cross-references in debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single visible entity such as a letter or a ligature.
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    /// The font specific glyph id.
    pub codepoint: u32,
    /// A glyph can stand for more than one character, e.g. the fi ligature.
    pub components: String,
    pub font: Option<Arc<Font>>,
    pub width: ScaledPoint,
    pub height: ScaledPoint,
    pub depth: ScaledPoint,
    pub yoffset: ScaledPoint,
    pub hyphenate: bool,
}

/// Stretch and shrink orders. A higher order absorbs the whole adjustment of
/// a line before any lower order is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum GlueOrder {
    #[default]
    Normal = 0,
    Fil = 1,
    Fill = 2,
    Filll = 3,
}

impl fmt::Display for GlueOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlueSubtype {
    #[default]
    Normal,
    LineStart,
    LineEnd,
}

impl fmt::Display for GlueSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GlueSubtype::Normal => "normal",
            GlueSubtype::LineStart => "linestart",
            GlueSubtype::LineEnd => "lineend",
        })
    }
}

/// Stretchable and shrinkable space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Glue {
    pub width: ScaledPoint,
    pub stretch: ScaledPoint,
    pub shrink: ScaledPoint,
    pub stretch_order: GlueOrder,
    pub shrink_order: GlueOrder,
    pub subtype: GlueSubtype,
}

impl Glue {
    /// Infinitely stretchable glue used to fill the start or end of a line.
    pub fn fill(subtype: GlueSubtype) -> Self {
        Glue {
            stretch: ScaledPoint::ONE_PT,
            stretch_order: GlueOrder::Filll,
            subtype,
            ..Default::default()
        }
    }
}

/// A fixed adjustment between two glyphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kern {
    pub kern: ScaledPoint,
}

/// A solid box of fixed size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    pub width: ScaledPoint,
    pub height: ScaledPoint,
    pub depth: ScaledPoint,
}

/// A hyphenation point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Disc;

/// The cost of breaking a line here. 10000 forbids, -10000 forces a break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Penalty {
    pub penalty: i32,
    pub width: ScaledPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionType {
    #[default]
    None,
    Hyperlink,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionType::None => "none",
            ActionType::Hyperlink => "hyperlink",
        })
    }
}

/// Produces PDF content for the page a start/stop node ends up on. Runs when
/// the enclosing box is shipped out, never while compiling.
#[derive(Clone)]
pub struct PageCallback(Arc<dyn Fn() -> String + Send + Sync>);

impl PageCallback {
    pub fn new(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        PageCallback(Arc::new(f))
    }

    pub fn call(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for PageCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PageCallback")
    }
}

/// One end of a region such as a hyperlink or a color span. A stop node
/// refers back to its start node through `start`.
#[derive(Debug, Clone, Default)]
pub struct StartStop {
    pub action: ActionType,
    pub value: Option<Hyperlink>,
    pub callback: Option<PageCallback>,
    /// Set on stop nodes only.
    pub start: Option<NodeRef>,
}

impl StartStop {
    pub fn hyperlink(link: Hyperlink) -> Self {
        StartStop {
            action: ActionType::Hyperlink,
            value: Some(link),
            ..Default::default()
        }
    }

    pub fn stop(start: NodeRef) -> Self {
        StartStop {
            start: Some(start),
            ..Default::default()
        }
    }

    pub fn with_callback(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        StartStop {
            callback: Some(PageCallback::new(f)),
            ..Default::default()
        }
    }

    pub fn is_stop(&self) -> bool {
        self.start.is_some()
    }
}

/// A horizontal box.
#[derive(Debug, Clone, Default)]
pub struct HList {
    pub list: Option<NodeRef>,
    pub width: ScaledPoint,
    pub height: ScaledPoint,
    pub depth: ScaledPoint,
    /// Glue ratio achieved when the box was set to its width.
    pub glue_set: f64,
}

/// A vertical box.
#[derive(Debug, Clone, Default)]
pub struct VList {
    pub list: Option<NodeRef>,
    pub width: ScaledPoint,
    pub height: ScaledPoint,
    pub depth: ScaledPoint,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Glyph(Glyph),
    Glue(Glue),
    Kern(Kern),
    Rule(Rule),
    Disc(Disc),
    Penalty(Penalty),
    StartStop(StartStop),
    HList(HList),
    VList(VList),
}

impl NodeKind {
    /// The element name used in debug output.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Glyph(_) => "glyph",
            NodeKind::Glue(_) => "glue",
            NodeKind::Kern(_) => "kern",
            NodeKind::Rule(_) => "rule",
            NodeKind::Disc(_) => "disc",
            NodeKind::Penalty(_) => "penalty",
            NodeKind::StartStop(_) => "startstop",
            NodeKind::HList(_) => "hlist",
            NodeKind::VList(_) => "vlist",
        }
    }

    /// The head of the nested list for boxes, `None` for everything else.
    pub fn sublist(&self) -> Option<Option<NodeRef>> {
        match self {
            NodeKind::HList(h) => Some(h.list),
            NodeKind::VList(v) => Some(v.list),
            _ => None,
        }
    }
}

macro_rules! impl_from_kind {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for NodeKind {
                fn from(n: $ty) -> Self {
                    NodeKind::$ty(n)
                }
            }
        )*
    };
}

impl_from_kind!(Glyph, Glue, Kern, Rule, Disc, Penalty, StartStop, HList, VList);

/// A node: its identity, free-form debug attributes and the variant data.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub attributes: BTreeMap<String, String>,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Node {
            id: NodeId::next(),
            attributes: BTreeMap::new(),
            kind: kind.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn as_glyph(&self) -> Option<&Glyph> {
        match &self.kind {
            NodeKind::Glyph(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_glue(&self) -> Option<&Glue> {
        match &self.kind {
            NodeKind::Glue(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_start_stop(&self) -> Option<&StartStop> {
        match &self.kind {
            NodeKind::StartStop(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match &self.kind {
            NodeKind::Rule(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_penalty(&self) -> Option<&Penalty> {
        match &self.kind {
            NodeKind::Penalty(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hlist(&self) -> Option<&HList> {
        match &self.kind {
            NodeKind::HList(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_vlist(&self) -> Option<&VList> {
        match &self.kind {
            NodeKind::VList(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let a = Node::new(Disc);
        let b = Node::new(Kern::default());
        let c = Node::new(Disc);
        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..1000).map(|_| NodeId::next()).collect::<Vec<_>>()))
            .collect();
        let mut all: Vec<NodeId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_glue_orders_rank() {
        assert!(GlueOrder::Filll > GlueOrder::Fill);
        assert!(GlueOrder::Fil > GlueOrder::Normal);
        assert_eq!(GlueOrder::Filll.to_string(), "3");
    }

    #[test]
    fn test_page_callback() {
        let ss = StartStop::with_callback(|| "1 0 0 rg".to_string());
        assert_eq!(ss.callback.unwrap().call(), "1 0 0 rg");
    }
}
