#![allow(dead_code)]

use quire::{
    hpack_to, node_width, vpack, Atom, Breakpoint, Face, Font, FontError, FontSource, FontStyle,
    FontWeight, InMemoryFaceLoader, LineBreaker, LinebreakSettings, NodeArena, NodeKind,
    NodeRef, OpenTypeFeature, RichText, ScaledPoint, Shaper, Typesetter, TypesettingSettings,
};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One atom per character: 500 units wide, 700 high, whitespace marked as
/// space.
#[derive(Debug, Default)]
pub struct FixedPitchShaper;

impl Shaper for FixedPitchShaper {
    fn shape(
        &self,
        font: &Font,
        text: &str,
        _features: &[OpenTypeFeature],
    ) -> Result<Vec<Atom>, FontError> {
        Ok(text
            .chars()
            .map(|c| Atom {
                is_space: c.is_whitespace(),
                components: c.to_string(),
                codepoint: c as u32,
                advance: font.scale(500),
                height: font.scale(700),
                depth: ScaledPoint::ZERO,
                kern_after: ScaledPoint::ZERO,
                hyphenate: c.is_alphabetic(),
            })
            .collect())
    }
}

fn width_of(arena: &NodeArena, nodes: &[NodeRef]) -> ScaledPoint {
    nodes.iter().map(|&n| node_width(&arena.get(n).kind)).sum()
}

/// Greedy line breaking: a line ends at the last glue that still fits or at
/// a forced penalty. Lines are stacked without interline glue.
#[derive(Debug, Default)]
pub struct GreedyBreaker;

impl LineBreaker for GreedyBreaker {
    fn linebreak(
        &self,
        arena: &mut NodeArena,
        head: NodeRef,
        settings: &LinebreakSettings,
    ) -> (NodeRef, Vec<Breakpoint>) {
        let nodes: Vec<NodeRef> = arena.iter(Some(head)).collect();
        let mut lines: Vec<(usize, usize, Option<NodeRef>)> = Vec::new();
        let mut start = 0;
        let mut width = ScaledPoint::ZERO;
        let mut last_glue: Option<usize> = None;

        for (i, &r) in nodes.iter().enumerate() {
            match &arena.get(r).kind {
                NodeKind::Penalty(p) if p.penalty <= -10000 => {
                    lines.push((start, i, Some(r)));
                    start = i + 1;
                    width = ScaledPoint::ZERO;
                    last_glue = None;
                    continue;
                }
                NodeKind::Glue(_) => {
                    if let (true, Some(g)) = (width > settings.hsize, last_glue) {
                        lines.push((start, g, Some(nodes[g])));
                        start = g + 1;
                        width = width_of(arena, &nodes[start..i]);
                    }
                    last_glue = Some(i);
                }
                _ => {}
            }
            width += node_width(&arena.get(r).kind);
        }
        if start < nodes.len() {
            lines.push((start, nodes.len(), None));
        }

        let mut boxes = Vec::with_capacity(lines.len());
        let mut breaks = Vec::with_capacity(lines.len());
        for (line, (from, to, position)) in lines.into_iter().enumerate() {
            let natural_width = width_of(arena, &nodes[from..to]);
            let list = arena.link(&nodes[from..to]);
            let hlist = hpack_to(arena, list, settings.hsize);
            let ratio = arena.get(hlist).as_hlist().map_or(0.0, |h| h.glue_set);
            boxes.push(hlist);
            breaks.push(Breakpoint {
                line,
                position,
                natural_width,
                ratio,
            });
        }
        let list = arena.link(&boxes);
        (vpack(arena, list), breaks)
    }
}

/// A document with one family "Serif" declaring regular (400) and bold
/// (700) upright faces.
pub fn document() -> Result<(Typesetter, Arc<InMemoryFaceLoader>), Box<dyn std::error::Error>> {
    init_logger();
    let loader = Arc::new(InMemoryFaceLoader::new());
    loader.add_face("serif-regular.ttf", Face::new("Serif-Regular", 1000, 250))?;
    loader.add_face("serif-bold.ttf", Face::new("Serif-Bold", 1000, 280))?;

    let mut ts = Typesetter::new(loader.clone(), Arc::new(FixedPitchShaper));
    ts.new_font_family("Serif")
        .add_member(
            FontSource::new("Serif Regular", "serif-regular.ttf"),
            FontWeight::NORMAL,
            FontStyle::Normal,
        )
        .add_member(
            FontSource::new("Serif Bold", "serif-bold.ttf"),
            FontWeight::BOLD,
            FontStyle::Normal,
        );
    Ok((ts, loader))
}

/// Compiles `tree` without inherited settings. An empty list is an error.
pub fn compile(
    ts: &Typesetter,
    arena: &mut NodeArena,
    tree: &RichText,
) -> Result<(NodeRef, NodeRef), Box<dyn std::error::Error>> {
    Ok(ts.compile(arena, tree, &TypesettingSettings::new())?.ok_or("empty list")?)
}

/// Node kind names of the list starting at `head`.
pub fn kinds(arena: &NodeArena, head: Option<NodeRef>) -> Vec<&'static str> {
    arena.iter(head).map(|r| arena.get(r).name()).collect()
}

/// The text of the glyphs in the list starting at `head`.
pub fn glyph_text(arena: &NodeArena, head: Option<NodeRef>) -> String {
    arena
        .iter(head)
        .filter_map(|r| arena.get(r).as_glyph().map(|g| g.components.clone()))
        .collect()
}
