use crate::{LayoutError, Typesetter};
use quire_idf::RichText;
use quire_node::{
    append_line_end_after, vpack, Breakpoint, Glue, GlueSubtype, LineBreaker, LinebreakSettings,
    NodeArena, NodeRef,
};
use quire_style::{FontFamilyId, HorizontalAlignment, TypesettingSettings};
use quire_types::ScaledPoint;

/// Overrides for a single paragraph. Unset fields fall back to the text's
/// own settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphOptions {
    pub font_size: Option<ScaledPoint>,
    pub family: Option<FontFamilyId>,
    pub leading: Option<ScaledPoint>,
    /// Indent and indent rows.
    pub indent: Option<(ScaledPoint, i32)>,
    pub halign: Option<HorizontalAlignment>,
}

impl ParagraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size(mut self, size: ScaledPoint) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_family(mut self, family: FontFamilyId) -> Self {
        self.family = Some(family);
        self
    }

    pub fn with_leading(mut self, leading: ScaledPoint) -> Self {
        self.leading = Some(leading);
        self
    }

    pub fn with_indent(mut self, indent: ScaledPoint, rows: i32) -> Self {
        self.indent = Some((indent, rows));
        self
    }

    pub fn with_halign(mut self, halign: HorizontalAlignment) -> Self {
        self.halign = Some(halign);
        self
    }
}

impl Typesetter {
    /// Compiles `text` and breaks it into lines of width `hsize`.
    ///
    /// The compiled list is terminated with a forced line end before it is
    /// handed to `breaker`. Text without items yields a vertical list holding
    /// one empty glue and no breakpoints.
    pub fn format_paragraph(
        &self,
        arena: &mut NodeArena,
        text: &RichText,
        hsize: ScaledPoint,
        options: &ParagraphOptions,
        breaker: &dyn LineBreaker,
    ) -> Result<(NodeRef, Vec<Breakpoint>), LayoutError> {
        if text.is_empty() {
            let glue = arena.alloc(Glue::default());
            arena
                .get_mut(glue)
                .attributes
                .insert("origin".to_string(), "empty list in format_paragraph".to_string());
            return Ok((vpack(arena, Some(glue)), Vec::new()));
        }

        let mut settings = text.settings.clone();
        if let Some(size) = options.font_size {
            settings.size = Some(size);
        }
        if let Some(family) = options.family {
            settings.font_family = Some(family);
        }

        let list = self.compile_items(arena, &text.items, &settings)?;
        let (head, tail) = list.unzip();
        let (head, _) = append_line_end_after(arena, head, tail);

        let linebreak_settings = self.linebreak_settings(&settings, hsize, options);
        log::debug!(
            "format paragraph: hsize {} line height {} indent {} for {} rows",
            hsize,
            linebreak_settings.line_height,
            linebreak_settings.indent,
            linebreak_settings.indent_rows
        );
        Ok(breaker.linebreak(arena, head, &linebreak_settings))
    }

    fn linebreak_settings(
        &self,
        settings: &TypesettingSettings,
        hsize: ScaledPoint,
        options: &ParagraphOptions,
    ) -> LinebreakSettings {
        let size = settings.size.unwrap_or(self.config().default_font_size);
        let line_height = options
            .leading
            .or(settings.leading)
            .unwrap_or_else(|| self.config().default_leading(size));
        let (indent, indent_rows) = options.indent.unwrap_or((
            settings.indent_left.unwrap_or(ScaledPoint::ZERO),
            settings.indent_left_rows.unwrap_or(0),
        ));
        let halign = options.halign.or(settings.halign).unwrap_or_default();

        LinebreakSettings {
            hsize,
            indent,
            indent_rows,
            line_height,
            line_start_glue: halign
                .needs_line_start_glue()
                .then(|| Glue::fill(GlueSubtype::LineStart)),
            line_end_glue: halign
                .needs_line_end_glue()
                .then(|| Glue::fill(GlueSubtype::LineEnd)),
        }
    }
}
