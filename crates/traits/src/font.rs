//! Font records and the face-loading seam.
//!
//! A [`FontSource`] names a font file and how to use it. A [`FaceLoader`]
//! turns a source into a [`Face`] (the parsed file). A [`Font`] is a face at
//! one concrete size and is what glyph nodes point to.

use quire_style::font::{FontStyle, FontWeight};
use quire_types::ScaledPoint;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for font resolution and loading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("no face defined in font family '{0}' yet")]
    EmptyFamily(String),

    #[error("font family '{family}' has no member with weight {weight} and style {style}")]
    NotFound {
        family: String,
        weight: FontWeight,
        style: FontStyle,
    },

    #[error("Failed to load font '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid font data: {0}")]
    InvalidData(String),

    #[error("cannot shape with face '{face}': {message}")]
    ShapingFailed { face: String, message: String },
}

/// Shared font data type (reference-counted bytes).
pub type SharedFontData = Arc<Vec<u8>>;

/// Maps a logical font name to a font file, including its default features.
///
/// Created once while setting up a document and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontSource {
    pub name: String,
    /// Default OpenType features in harfbuzz syntax.
    pub features: Vec<String>,
    /// File name or resource key of the font file.
    pub source: String,
    /// The sub font index within the font file.
    pub index: u32,
    /// CSS size-adjust normalised so that 0 = 100% and negative values shrink.
    pub size_adjust: f64,
}

impl FontSource {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    pub fn with_features(mut self, features: &[&str]) -> Self {
        self.features = features.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_size_adjust(mut self, size_adjust: f64) -> Self {
        self.size_adjust = size_adjust;
        self
    }

    /// The size actually fed into shaping once size-adjust is applied.
    pub fn adjusted_size(&self, size: ScaledPoint) -> ScaledPoint {
        if self.size_adjust == 0.0 {
            size
        } else {
            ScaledPoint::from_pt(size.to_pt() * (1.0 - self.size_adjust))
        }
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}:{}", self.name, self.source, self.index)
    }
}

/// A parsed font file.
#[derive(Clone)]
pub struct Face {
    /// Document-wide face number, assigned by the font cache.
    pub id: usize,
    pub postscript_name: String,
    pub units_per_em: u16,
    /// Advance of the space glyph in font units.
    pub space_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    pub index: u32,
    /// Raw font bytes, absent for synthetic faces.
    pub data: Option<SharedFontData>,
}

impl Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("id", &self.id)
            .field("postscript_name", &self.postscript_name)
            .field("units_per_em", &self.units_per_em)
            .field("data_len", &self.data.as_ref().map(|d| d.len()))
            .finish()
    }
}

impl Face {
    /// A face without font bytes, described by its metrics only.
    pub fn new(postscript_name: impl Into<String>, units_per_em: u16, space_advance: u16) -> Self {
        Self {
            id: 0,
            postscript_name: postscript_name.into(),
            units_per_em,
            space_advance,
            ascender: (units_per_em as i32 * 8 / 10) as i16,
            descender: -((units_per_em as i32 * 2 / 10) as i16),
            index: 0,
            data: None,
        }
    }
}

/// A face instantiated at one size. Shared by every glyph that uses it.
#[derive(Debug)]
pub struct Font {
    pub face: Arc<Face>,
    pub size: ScaledPoint,
    pub space: ScaledPoint,
    pub space_stretch: ScaledPoint,
    pub space_shrink: ScaledPoint,
}

impl Font {
    pub fn new(face: Arc<Face>, size: ScaledPoint) -> Self {
        let mut font = Self {
            face,
            size,
            space: ScaledPoint::ZERO,
            space_stretch: ScaledPoint::ZERO,
            space_shrink: ScaledPoint::ZERO,
        };
        font.space = font.scale(font.face.space_advance as i32);
        font.space_stretch = font.space / 2;
        font.space_shrink = font.space / 3;
        font
    }

    /// Converts font units to scaled points at this font's size.
    pub fn scale(&self, units: i32) -> ScaledPoint {
        let upem = self.face.units_per_em.max(1) as i64;
        ScaledPoint(self.size.0 * units as i64 / upem)
    }
}

/// A trait for turning font sources into faces.
///
/// # Implementations
///
/// - `InMemoryFaceLoader`: pre-registered faces (always available)
/// - `FilesystemFaceLoader` in `quire-layout`: parses font files with ttf-parser
pub trait FaceLoader: Send + Sync + Debug {
    /// Load the face a source refers to. Called at most once per face by the
    /// font cache.
    fn load_face(&self, source: &FontSource) -> Result<Face, FontError>;

    /// Returns a human-readable name for this loader (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A face loader serving pre-registered faces keyed by `FontSource::source`.
#[derive(Debug, Default)]
pub struct InMemoryFaceLoader {
    faces: RwLock<HashMap<String, Face>>,
    loads: AtomicUsize,
}

impl InMemoryFaceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `face` under the source key `source`.
    ///
    /// # Errors
    ///
    /// Returns `FontError::LoadFailed` if the internal lock is poisoned.
    pub fn add_face(&self, source: impl Into<String>, face: Face) -> Result<(), FontError> {
        let source = source.into();
        let mut faces = self.faces.write().map_err(|_| FontError::LoadFailed {
            path: source.clone(),
            message: "face store lock poisoned".to_string(),
        })?;
        faces.insert(source, face);
        Ok(())
    }

    /// How many times `load_face` has been called.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl FaceLoader for InMemoryFaceLoader {
    fn load_face(&self, source: &FontSource) -> Result<Face, FontError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let faces = self.faces.read().map_err(|_| FontError::LoadFailed {
            path: source.source.clone(),
            message: "face store lock poisoned".to_string(),
        })?;
        let mut face = faces
            .get(&source.source)
            .cloned()
            .ok_or_else(|| {
                log::warn!("no in-memory face registered for {}", source.source);
                FontError::LoadFailed {
                    path: source.source.clone(),
                    message: "not registered".to_string(),
                }
            })?;
        face.index = source.index;
        Ok(face)
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
