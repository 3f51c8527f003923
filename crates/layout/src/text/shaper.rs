use quire_style::OpenTypeFeature;
use quire_traits::{Atom, Face, FaceLoader, Font, FontError, FontSource, Shaper};
use quire_types::ScaledPoint;
use rustybuzz::{Feature, UnicodeBuffer};
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::Arc;
use ttf_parser::{GlyphId, Tag};

// Reuse buffer to avoid allocations in the tight loop
thread_local! {
    static SCRATCH_BUFFER: RefCell<Option<UnicodeBuffer>> =
        RefCell::new(Some(UnicodeBuffer::new()));
}

/// Shapes text with rustybuzz using the font bytes carried by the face.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustybuzzShaper;

impl RustybuzzShaper {
    pub fn new() -> Self {
        Self
    }
}

/// End offset of the cluster starting at `start`. `clusters` holds the
/// cluster start of every glyph.
fn cluster_end(clusters: &[usize], start: usize, text_len: usize) -> usize {
    clusters
        .iter()
        .copied()
        .filter(|&c| c > start)
        .min()
        .unwrap_or(text_len)
}

impl Shaper for RustybuzzShaper {
    fn shape(
        &self,
        font: &Font,
        text: &str,
        features: &[OpenTypeFeature],
    ) -> Result<Vec<Atom>, FontError> {
        let failed = |message: &str| FontError::ShapingFailed {
            face: font.face.postscript_name.clone(),
            message: message.to_string(),
        };
        let data = font.face.data.as_ref().ok_or_else(|| failed("face carries no font data"))?;
        let face = rustybuzz::Face::from_slice(data, font.face.index)
            .ok_or_else(|| failed("font data does not parse"))?;

        let features: Vec<Feature> = features
            .iter()
            .map(|f| Feature::new(Tag::from_bytes(&f.tag), f.value, ..))
            .collect();

        let mut buffer =
            SCRATCH_BUFFER.with(|b| b.borrow_mut().take().unwrap_or_else(UnicodeBuffer::new));
        buffer.push_str(text);
        buffer.guess_segment_properties();

        let glyph_buffer = rustybuzz::shape(&face, &features, buffer);
        let infos = glyph_buffer.glyph_infos();
        let positions = glyph_buffer.glyph_positions();
        let clusters: Vec<usize> = infos.iter().map(|i| i.cluster as usize).collect();

        let mut atoms = Vec::with_capacity(infos.len());
        let mut seen_cluster: Option<usize> = None;
        for (info, pos) in infos.iter().zip(positions.iter()) {
            let start = info.cluster as usize;
            // Only the first glyph of a cluster carries its characters.
            let components = if seen_cluster == Some(start) {
                String::new()
            } else {
                let end = cluster_end(&clusters, start, text.len());
                text.get(start..end).unwrap_or_default().to_string()
            };
            seen_cluster = Some(start);

            let gid = GlyphId(info.glyph_id as u16);
            let natural = face.glyph_hor_advance(gid).map(i32::from).unwrap_or(pos.x_advance);
            let (height, depth) = match face.glyph_bounding_box(gid) {
                Some(bbox) => (
                    font.scale(bbox.y_max as i32).max(ScaledPoint::ZERO),
                    font.scale(-(bbox.y_min as i32)).max(ScaledPoint::ZERO),
                ),
                None => (ScaledPoint::ZERO, ScaledPoint::ZERO),
            };

            let is_space = !components.is_empty() && components.chars().all(char::is_whitespace);
            atoms.push(Atom {
                is_space,
                hyphenate: !components.is_empty() && components.chars().all(char::is_alphabetic),
                components,
                codepoint: info.glyph_id,
                advance: font.scale(natural),
                height,
                depth,
                kern_after: font.scale(pos.x_advance - natural),
            });
        }

        let recycled_buffer = glyph_buffer.clear();
        SCRATCH_BUFFER.with(|b| *b.borrow_mut() = Some(recycled_buffer));

        log::trace!("shaped {:?} into {} atoms", text, atoms.len());
        Ok(atoms)
    }
}

/// Loads faces from font files on disk, resolving relative sources against
/// a base directory.
#[derive(Debug, Clone, Default)]
pub struct FilesystemFaceLoader {
    base_dir: Option<PathBuf>,
}

impl FilesystemFaceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, source: &str) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(source),
            None => PathBuf::from(source),
        }
    }

    /// Extracts the PostScript name from font data using ttf-parser.
    /// Tries multiple name IDs as fallback if PostScript name is not available.
    fn extract_postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
        // Try PostScript name first (nameID 6)
        if let Some(ps_name) = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .and_then(|n| n.to_string())
        {
            return Some(ps_name);
        }

        // Fallback to Full Font Name (nameID 4)
        if let Some(full_name) = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::FULL_NAME)
            .and_then(|n| n.to_string())
        {
            log::debug!("Using Full Name (ID 4) as fallback: {}", full_name);
            return Some(full_name.replace(' ', ""));
        }

        // Last resort: Family name (nameID 1)
        face.names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::FAMILY)
            .and_then(|n| n.to_string())
            .map(|family| family.replace(' ', ""))
    }

    /// Builds a face record from raw font bytes.
    pub fn face_from_data(data: Vec<u8>, source: &FontSource) -> Result<Face, FontError> {
        let data = Arc::new(data);
        let parsed = ttf_parser::Face::parse(&data, source.index)
            .map_err(|e| FontError::InvalidData(format!("{}: {}", source.source, e)))?;

        let postscript_name = Self::extract_postscript_name(&parsed).unwrap_or_else(|| {
            log::warn!("Could not extract any usable name from {}", source.source);
            source.name.clone()
        });
        let space_advance = parsed
            .glyph_index(' ')
            .and_then(|gid| parsed.glyph_hor_advance(gid))
            .unwrap_or(parsed.units_per_em() / 4);

        Ok(Face {
            id: 0,
            postscript_name,
            units_per_em: parsed.units_per_em(),
            space_advance,
            ascender: parsed.ascender(),
            descender: parsed.descender(),
            index: source.index,
            data: Some(data.clone()),
        })
    }
}

impl FaceLoader for FilesystemFaceLoader {
    fn load_face(&self, source: &FontSource) -> Result<Face, FontError> {
        let path = self.resolve(&source.source);
        log::debug!("reading font file {}", path.display());
        let data = std::fs::read(&path).map_err(|e| FontError::LoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::face_from_data(data, source)
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}
