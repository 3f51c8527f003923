use crate::list::{NodeArena, NodeRef};
use crate::node::{Glue, GlueSubtype, HList, NodeKind, Penalty, VList};
use quire_types::ScaledPoint;

/// The horizontal extent a node contributes to an hlist. Penalties only take
/// up room when a line is broken at them, so they count as zero here.
pub fn node_width(kind: &NodeKind) -> ScaledPoint {
    match kind {
        NodeKind::Glyph(g) => g.width,
        NodeKind::Glue(g) => g.width,
        NodeKind::Kern(k) => k.kern,
        NodeKind::Rule(r) => r.width,
        NodeKind::HList(h) => h.width,
        NodeKind::VList(v) => v.width,
        NodeKind::Penalty(_) | NodeKind::Disc(_) | NodeKind::StartStop(_) => ScaledPoint::ZERO,
    }
}

fn node_height_depth(kind: &NodeKind) -> (ScaledPoint, ScaledPoint) {
    match kind {
        NodeKind::Glyph(g) => (g.height + g.yoffset, g.depth - g.yoffset),
        NodeKind::Rule(r) => (r.height, r.depth),
        NodeKind::HList(h) => (h.height, h.depth),
        NodeKind::VList(v) => (v.height, v.depth),
        _ => (ScaledPoint::ZERO, ScaledPoint::ZERO),
    }
}

/// Packs the list starting at `head` into an hlist of its natural width.
pub fn hpack(arena: &mut NodeArena, head: Option<NodeRef>) -> NodeRef {
    let mut hl = HList {
        list: head,
        ..Default::default()
    };
    for r in arena.iter(head) {
        let kind = &arena.get(r).kind;
        hl.width += node_width(kind);
        let (ht, dp) = node_height_depth(kind);
        hl.height = hl.height.max(ht);
        hl.depth = hl.depth.max(dp);
    }
    arena.alloc(hl)
}

/// Packs the list starting at `head` into an hlist of exactly `width`.
///
/// The difference to the natural width is distributed over the glue of the
/// highest stretch (or shrink) order present and recorded as the glue set
/// ratio of the box.
pub fn hpack_to(arena: &mut NodeArena, head: Option<NodeRef>, width: ScaledPoint) -> NodeRef {
    let mut natural = ScaledPoint::ZERO;
    let mut height = ScaledPoint::ZERO;
    let mut depth = ScaledPoint::ZERO;
    let mut stretch = [ScaledPoint::ZERO; 4];
    let mut shrink = [ScaledPoint::ZERO; 4];

    for r in arena.iter(head) {
        let kind = &arena.get(r).kind;
        natural += node_width(kind);
        let (ht, dp) = node_height_depth(kind);
        height = height.max(ht);
        depth = depth.max(dp);
        if let NodeKind::Glue(g) = kind {
            stretch[g.stretch_order as usize] += g.stretch;
            shrink[g.shrink_order as usize] += g.shrink;
        }
    }

    let delta = width - natural;
    let totals = if delta.0 >= 0 { &stretch } else { &shrink };
    let glue_set = match totals.iter().rev().find(|t| !t.is_zero()) {
        Some(total) => delta.0 as f64 / total.0 as f64,
        None => 0.0,
    };

    arena.alloc(HList {
        list: head,
        width,
        height,
        depth,
        glue_set,
    })
}

/// Stacks the list starting at `head` vertically. The box's depth is the
/// depth of its last item, everything above adds to its height.
pub fn vpack(arena: &mut NodeArena, head: Option<NodeRef>) -> NodeRef {
    let mut vl = VList {
        list: head,
        ..Default::default()
    };
    let mut pending_depth = ScaledPoint::ZERO;
    for r in arena.iter(head) {
        match &arena.get(r).kind {
            NodeKind::Glue(g) => {
                vl.height += pending_depth + g.width;
                pending_depth = ScaledPoint::ZERO;
            }
            NodeKind::Kern(k) => {
                vl.height += pending_depth + k.kern;
                pending_depth = ScaledPoint::ZERO;
            }
            kind => {
                let (ht, dp) = node_height_depth(kind);
                vl.height += pending_depth + ht;
                pending_depth = dp;
                vl.width = vl.width.max(node_width(kind));
            }
        }
    }
    vl.depth = pending_depth;
    arena.alloc(vl)
}

/// Appends the paragraph end sequence after `cur`: a penalty forbidding a
/// break, an infinitely stretchable line-end glue and a forced break.
///
/// Returns the head and tail of the resulting list.
pub fn append_line_end_after(
    arena: &mut NodeArena,
    head: Option<NodeRef>,
    cur: Option<NodeRef>,
) -> (NodeRef, NodeRef) {
    let keep = arena.alloc(Penalty {
        penalty: 10000,
        ..Default::default()
    });
    let fill = arena.alloc(Glue::fill(GlueSubtype::LineEnd));
    let force = arena.alloc(Penalty {
        penalty: -10000,
        ..Default::default()
    });
    arena.link(&[keep, fill, force]);
    let head = arena.insert_after(head, cur, keep);
    (head, force)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{GlueOrder, Kern, Rule};
    use quire_types::sp;

    fn rule(arena: &mut NodeArena, wd: &str, ht: &str, dp: &str) -> NodeRef {
        arena.alloc(Rule {
            width: sp(wd).unwrap(),
            height: sp(ht).unwrap(),
            depth: sp(dp).unwrap(),
        })
    }

    #[test]
    fn test_hpack_natural_size() {
        let mut arena = NodeArena::new();
        let a = rule(&mut arena, "10pt", "8pt", "2pt");
        let k = arena.alloc(Kern { kern: sp("1pt").unwrap() });
        let b = rule(&mut arena, "5pt", "9pt", "1pt");
        let head = arena.link(&[a, k, b]);
        let hl = hpack(&mut arena, head);
        let hl = arena.get(hl).as_hlist().unwrap();
        assert_eq!(hl.width, sp("16pt").unwrap());
        assert_eq!(hl.height, sp("9pt").unwrap());
        assert_eq!(hl.depth, sp("2pt").unwrap());
        assert_eq!(hl.list, Some(a));
    }

    #[test]
    fn test_hpack_to_prefers_infinite_glue() {
        let mut arena = NodeArena::new();
        let a = rule(&mut arena, "10pt", "8pt", "0pt");
        let g = arena.alloc(Glue {
            width: sp("2pt").unwrap(),
            stretch: sp("1pt").unwrap(),
            ..Default::default()
        });
        let fill = arena.alloc(Glue::fill(GlueSubtype::LineEnd));
        let head = arena.link(&[a, g, fill]);
        let hl = hpack_to(&mut arena, head, sp("20pt").unwrap());
        let hl = arena.get(hl).as_hlist().unwrap();
        assert_eq!(hl.width, sp("20pt").unwrap());
        assert!((hl.glue_set - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_vpack_stacks_lines() {
        let mut arena = NodeArena::new();
        let a = rule(&mut arena, "10pt", "8pt", "2pt");
        let g = arena.alloc(Glue {
            width: sp("4pt").unwrap(),
            ..Default::default()
        });
        let b = rule(&mut arena, "30pt", "7pt", "3pt");
        let head = arena.link(&[a, g, b]);
        let vl = vpack(&mut arena, head);
        let vl = arena.get(vl).as_vlist().unwrap();
        assert_eq!(vl.height, sp("21pt").unwrap());
        assert_eq!(vl.depth, sp("3pt").unwrap());
        assert_eq!(vl.width, sp("30pt").unwrap());
    }

    #[test]
    fn test_vpack_single_glue() {
        let mut arena = NodeArena::new();
        let g = arena.alloc(Glue::default());
        let vl = vpack(&mut arena, Some(g));
        assert_eq!(arena.get(vl).as_vlist().unwrap().list, Some(g));
    }

    #[test]
    fn test_append_line_end_after_tail() {
        let mut arena = NodeArena::new();
        let a = rule(&mut arena, "1pt", "1pt", "0pt");
        let (head, tail) = append_line_end_after(&mut arena, Some(a), Some(a));
        assert_eq!(head, a);
        let kinds: Vec<_> = arena.iter(Some(head)).map(|r| arena.get(r).name()).collect();
        assert_eq!(kinds, vec!["rule", "penalty", "glue", "penalty"]);
        assert_eq!(arena.get(tail).as_penalty().unwrap().penalty, -10000);
        let fill = arena.next(arena.next(a).unwrap()).unwrap();
        let fill = arena.get(fill).as_glue().unwrap();
        assert_eq!(fill.subtype, GlueSubtype::LineEnd);
        assert_eq!(fill.stretch_order, GlueOrder::Filll);
    }

    #[test]
    fn test_append_line_end_to_empty_list() {
        let mut arena = NodeArena::new();
        let (head, tail) = append_line_end_after(&mut arena, None, None);
        assert_eq!(arena.list_len(Some(head)), 3);
        assert_eq!(arena.tail(head), tail);
    }
}
