use crate::LayoutError;
use crate::config::TypesetterConfig;
use crate::fonts::{FontCache, FontFamily};
use quire_idf::{Item, RichText};
use quire_node::{
    append_line_end_after, Glue, Glyph, Kern, NodeArena, NodeKind, NodeRef, Rule, StartStop,
};
use quire_style::{
    parse_feature_list, ColorSetting, FontFamilyId, FontStyle, FontWeight, Hyperlink,
    OpenTypeFeature, TypesettingSettings,
};
use quire_traits::{ColorTable, FaceLoader, Font, FontSource, InMemoryColorTable, Shaper};
use quire_types::{Color, ScaledPoint};
use std::sync::Arc;

/// A node list under construction.
struct ListBuilder<'a> {
    arena: &'a mut NodeArena,
    head: Option<NodeRef>,
    tail: Option<NodeRef>,
}

impl<'a> ListBuilder<'a> {
    fn new(arena: &'a mut NodeArena) -> Self {
        Self {
            arena,
            head: None,
            tail: None,
        }
    }

    fn push(&mut self, kind: impl Into<NodeKind>) -> NodeRef {
        let r = self.arena.alloc(kind);
        self.splice(r, r);
        r
    }

    /// Appends the list `head..=tail`.
    fn splice(&mut self, head: NodeRef, tail: NodeRef) {
        self.head = Some(self.arena.insert_after(self.head, self.tail, head));
        self.tail = Some(tail);
    }

    fn line_end(&mut self) {
        let (head, tail) = append_line_end_after(self.arena, self.head, self.tail);
        self.head = Some(head);
        self.tail = Some(tail);
    }

    fn finish(self) -> Option<(NodeRef, NodeRef)> {
        self.head.zip(self.tail)
    }
}

/// An open hyperlink region: its start node and destination.
struct OpenRegion {
    start: NodeRef,
    destination: String,
}

/// Makes `link` the open region: keeps a region with the same destination,
/// otherwise closes it and opens one for `link`, if any.
fn switch_region(
    list: &mut ListBuilder<'_>,
    open: &mut Option<OpenRegion>,
    link: Option<&Hyperlink>,
) {
    let continues = match (open.as_ref(), link) {
        (Some(region), Some(link)) => region.destination == link.destination(),
        _ => false,
    };
    if continues {
        return;
    }
    if let Some(region) = open.take() {
        log::debug!("hyperlink region to {} ends", region.destination);
        list.push(StartStop::stop(region.start));
    }
    if let Some(link) = link {
        let start = list.push(StartStop::hyperlink(link.clone()));
        *open = Some(OpenRegion {
            start,
            destination: link.destination().to_string(),
        });
    }
}

/// Compiles rich text into node lists.
///
/// Owns the document's font families, the font cache and the collaborators
/// for face loading, shaping and color lookup.
#[derive(Debug)]
pub struct Typesetter {
    families: Vec<FontFamily>,
    fonts: FontCache,
    shaper: Arc<dyn Shaper>,
    colors: Arc<dyn ColorTable>,
    config: TypesetterConfig,
    default_features: Vec<OpenTypeFeature>,
}

fn parse_features(list: &[String]) -> Vec<OpenTypeFeature> {
    list.iter().flat_map(|entry| parse_feature_list(entry)).collect()
}

impl Typesetter {
    pub fn new(loader: Arc<dyn FaceLoader>, shaper: Arc<dyn Shaper>) -> Self {
        let config = TypesetterConfig::default();
        Self {
            families: Vec::new(),
            fonts: FontCache::new(loader),
            shaper,
            colors: Arc::new(InMemoryColorTable::default()),
            default_features: parse_features(&config.default_features),
            config,
        }
    }

    pub fn with_config(mut self, config: TypesetterConfig) -> Self {
        self.default_features = parse_features(&config.default_features);
        self.config = config;
        self
    }

    pub fn with_color_table(mut self, colors: Arc<dyn ColorTable>) -> Self {
        self.colors = colors;
        self
    }

    pub fn config(&self) -> &TypesetterConfig {
        &self.config
    }

    pub fn font_cache(&self) -> &FontCache {
        &self.fonts
    }

    /// Creates an empty font family. Its id is its position in the document.
    pub fn new_font_family(&mut self, name: impl Into<String>) -> &mut FontFamily {
        let idx = self.families.len();
        self.families.push(FontFamily::new(FontFamilyId(idx), name));
        &mut self.families[idx]
    }

    pub fn font_family(&self, id: FontFamilyId) -> Option<&FontFamily> {
        self.families.get(id.0)
    }

    pub fn font_family_mut(&mut self, id: FontFamilyId) -> Option<&mut FontFamily> {
        self.families.get_mut(id.0)
    }

    pub fn find_font_family(&self, name: &str) -> Option<&FontFamily> {
        self.families.iter().find(|f| f.name() == name)
    }

    /// Resolves the font source and the shared font instance for a text run.
    /// Without a family setting the first family of the document is used.
    pub fn resolve_font(
        &self,
        settings: &TypesettingSettings,
    ) -> Result<(Arc<FontSource>, Arc<Font>), LayoutError> {
        let id = settings.font_family.unwrap_or(FontFamilyId(0));
        let family = self.font_family(id).ok_or(LayoutError::UnknownFontFamily(id))?;
        let weight = settings.font_weight.unwrap_or(FontWeight::NORMAL);
        let style = settings.style.unwrap_or(FontStyle::Normal);
        let source = family.font_source(weight, style)?;
        let size = settings.size.unwrap_or(self.config.default_font_size);
        let font = self.fonts.instantiate(&source, size)?;
        Ok((source, font))
    }

    /// Document defaults, then the font source's features, then the run's
    /// own. Later entries are appended, never merged.
    fn features_for(
        &self,
        source: &FontSource,
        settings: &TypesettingSettings,
    ) -> Vec<OpenTypeFeature> {
        let mut features = self.default_features.clone();
        features.extend(parse_features(&source.features));
        if let Some(list) = &settings.opentype_features {
            features.extend(parse_features(list));
        }
        features
    }

    fn resolve_color(&self, color: &ColorSetting) -> Option<Color> {
        match color {
            ColorSetting::Value(c) => Some(c.clone()),
            ColorSetting::Named(name) => {
                let found = self.colors.lookup_color(name);
                if found.is_none() {
                    log::warn!("color {:?} is not defined, text stays uncolored", name);
                }
                found
            }
        }
    }

    /// Compiles `tree` with `inherited` as the settings of the enclosing
    /// scope. The tree's own settings win.
    ///
    /// Returns the head and tail of the new list, or `None` for a tree
    /// without items. On error the nodes allocated so far must be discarded.
    pub fn compile(
        &self,
        arena: &mut NodeArena,
        tree: &RichText,
        inherited: &TypesettingSettings,
    ) -> Result<Option<(NodeRef, NodeRef)>, LayoutError> {
        if tree.items.is_empty() {
            return Ok(None);
        }
        let working = tree.settings.inherit_from(inherited);
        self.compile_items(arena, &tree.items, &working)
    }

    /// Compiles `items` with fully resolved `settings`.
    ///
    /// Hyperlink regions never nest. A span whose destination differs from
    /// the open region closes it first, and the outer destination is reopened
    /// for text that follows the span. Node items are copied into the list,
    /// so a tree can be compiled more than once.
    pub fn compile_items(
        &self,
        arena: &mut NodeArena,
        items: &[Item],
        settings: &TypesettingSettings,
    ) -> Result<Option<(NodeRef, NodeRef)>, LayoutError> {
        let mut list = ListBuilder::new(arena);
        let mut open: Option<OpenRegion> = None;
        let mut plain = settings.clone();
        let link = plain.hyperlink.take();

        self.compile_level(&mut list, items, &plain, link.as_ref(), &mut open)?;

        if let Some(region) = open {
            list.push(StartStop::stop(region.start));
        }
        Ok(list.finish())
    }

    /// Compiles one tree level. `link` is the hyperlink covering the level's
    /// text, `open` the region currently open in `list`.
    fn compile_level(
        &self,
        list: &mut ListBuilder<'_>,
        items: &[Item],
        settings: &TypesettingSettings,
        link: Option<&Hyperlink>,
        open: &mut Option<OpenRegion>,
    ) -> Result<(), LayoutError> {
        for item in items {
            match item {
                Item::Text(text) => {
                    switch_region(list, open, link);
                    let run = self.build_nodelist_from_string(list.arena, settings, text)?;
                    if let Some((head, tail)) = run {
                        list.splice(head, tail);
                    }
                }
                Item::Span(child) => {
                    let child_link = child.settings.hyperlink.as_ref().or(link);
                    switch_region(list, open, child_link);
                    let child_settings = settings.for_child(&child.settings);
                    self.compile_level(list, &child.items, &child_settings, child_link, open)?;
                }
                Item::Node(node) => {
                    let (head, tail) = list.arena.copy_list(*node);
                    list.splice(head, tail);
                }
            }
        }
        Ok(())
    }

    /// Shapes one text run and translates the atoms into nodes.
    ///
    /// The run is wrapped in a hyperlink start/stop pair if `settings` carries
    /// a hyperlink and in a color start/stop pair if it carries a color.
    pub fn build_nodelist_from_string(
        &self,
        arena: &mut NodeArena,
        settings: &TypesettingSettings,
        text: &str,
    ) -> Result<Option<(NodeRef, NodeRef)>, LayoutError> {
        let (source, font) = self.resolve_font(settings)?;
        let features = self.features_for(&source, settings);
        let color = settings.color.as_ref().and_then(|c| self.resolve_color(c));
        let preserve_whitespace = settings.preserve_whitespace.unwrap_or(false);
        let yoffset = settings.yoffset.unwrap_or(ScaledPoint::ZERO);
        log::trace!("text run {:?} with {} in {}", text, settings, source);

        let mut list = ListBuilder::new(arena);
        let link_start = settings
            .hyperlink
            .as_ref()
            .map(|link| list.push(StartStop::hyperlink(link.clone())));
        let color_start = color.map(|color| {
            let set = color.pdf_string_non_stroking();
            list.push(StartStop::with_callback(move || format!("{} ", set)))
        });

        let mut atoms = self.shaper.shape(&font, text, &features)?.into_iter().peekable();
        let mut last_was_glue = false;
        while let Some(atom) = atoms.next() {
            if !atom.is_space {
                list.push(Glyph {
                    codepoint: atom.codepoint,
                    components: atom.components,
                    font: Some(font.clone()),
                    width: atom.advance,
                    height: atom.height,
                    depth: atom.depth,
                    yoffset,
                    hyphenate: atom.hyphenate,
                });
                last_was_glue = false;
                if !atom.kern_after.is_zero() {
                    list.push(Kern { kern: atom.kern_after });
                }
                continue;
            }

            if !preserve_whitespace {
                if !last_was_glue {
                    list.push(Glue {
                        width: font.space,
                        stretch: font.space_stretch,
                        shrink: font.space_shrink,
                        ..Default::default()
                    });
                    last_was_glue = true;
                }
                continue;
            }

            let space = Rule {
                width: font.space,
                ..Default::default()
            };
            match atom.components.as_str() {
                " " => {
                    list.push(space);
                }
                "\t" => {
                    for _ in 0..self.config.tab_width {
                        list.push(space.clone());
                    }
                }
                "\n" | "\r\n" => list.line_end(),
                // The newline that follows emits the line end.
                "\r" if atoms.peek().is_some_and(|next| next.components == "\n") => {}
                other => return Err(LayoutError::UnhandledWhitespace(other.to_string())),
            }
            last_was_glue = false;
        }

        if let Some(start) = color_start {
            list.push(StartStop {
                start: Some(start),
                ..StartStop::with_callback(|| format!("{} ", Color::pdf_reset()))
            });
        }
        if let Some(start) = link_start {
            list.push(StartStop::stop(start));
        }
        Ok(list.finish())
    }
}
