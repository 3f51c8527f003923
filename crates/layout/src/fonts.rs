//! Font families and the document font cache.
//!
//! A [`FontFamily`] maps an exact (weight, style) pair to a [`FontSource`].
//! There is no nearest-match fallback: a missing member is an error.
//!
//! The [`FontCache`] loads every face once and keeps one [`Font`] per
//! (face, size) pair for the lifetime of the document. Both maps are guarded
//! by `RwLock`s and use insert-if-absent, so concurrent lookups of the same key
//! converge on the same instance.

use quire_style::{FontFamilyId, FontStyle, FontWeight};
use quire_traits::{Face, FaceLoader, Font, FontError, FontSource};
use quire_types::ScaledPoint;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A named group of font sources.
#[derive(Debug, Clone)]
pub struct FontFamily {
    id: FontFamilyId,
    name: String,
    members: HashMap<(FontWeight, FontStyle), Arc<FontSource>>,
}

impl FontFamily {
    pub fn new(id: FontFamilyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: HashMap::new(),
        }
    }

    pub fn id(&self) -> FontFamilyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds (or replaces) the source for `weight` and `style`.
    pub fn add_member(
        &mut self,
        source: FontSource,
        weight: FontWeight,
        style: FontStyle,
    ) -> &mut Self {
        log::debug!(
            "font family '{}': {} {} -> {}",
            self.name,
            weight,
            style,
            source
        );
        self.members.insert((weight, style), Arc::new(source));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the source registered for exactly `weight` and `style`.
    ///
    /// # Errors
    ///
    /// `FontError::EmptyFamily` if the family has no members yet,
    /// `FontError::NotFound` if there is no exact match.
    pub fn font_source(
        &self,
        weight: FontWeight,
        style: FontStyle,
    ) -> Result<Arc<FontSource>, FontError> {
        if self.members.is_empty() {
            return Err(FontError::EmptyFamily(self.name.clone()));
        }
        self.members
            .get(&(weight, style))
            .cloned()
            .ok_or_else(|| FontError::NotFound {
                family: self.name.clone(),
                weight,
                style,
            })
    }
}

/// Key for loaded faces: the font file and the sub font index.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FaceKey {
    source: String,
    index: u32,
}

impl FaceKey {
    fn new(source: &FontSource) -> Self {
        Self {
            source: source.source.clone(),
            index: source.index,
        }
    }
}

fn poisoned(source: &FontSource) -> FontError {
    FontError::LoadFailed {
        path: source.source.clone(),
        message: "lock poisoned".to_string(),
    }
}

/// Loads faces once and shares font instances by (face, size).
#[derive(Debug)]
pub struct FontCache {
    loader: Arc<dyn FaceLoader>,
    faces: RwLock<HashMap<FaceKey, Arc<Face>>>,
    fonts: RwLock<HashMap<(usize, ScaledPoint), Arc<Font>>>,
}

impl FontCache {
    pub fn new(loader: Arc<dyn FaceLoader>) -> Self {
        Self {
            loader,
            faces: RwLock::new(HashMap::new()),
            fonts: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the face for `source`, loading it on first use. Faces are
    /// numbered in load order.
    pub fn face(&self, source: &FontSource) -> Result<Arc<Face>, FontError> {
        let key = FaceKey::new(source);

        // Fast path: check cache
        {
            let faces = self.faces.read().map_err(|_| poisoned(source))?;
            if let Some(face) = faces.get(&key) {
                return Ok(face.clone());
            }
        }

        let mut faces = self.faces.write().map_err(|_| poisoned(source))?;
        // Another caller may have loaded it between the two locks.
        if let Some(face) = faces.get(&key) {
            return Ok(face.clone());
        }

        log::debug!("loading face {} with {} loader", source, self.loader.name());
        let mut face = self.loader.load_face(source)?;
        face.id = faces.len();
        let face = Arc::new(face);
        faces.insert(key, face.clone());
        Ok(face)
    }

    /// Returns the shared font instance for `source` at `size`.
    ///
    /// The source's size-adjust is applied first, so the cache key is the
    /// size actually used for shaping.
    pub fn instantiate(
        &self,
        source: &FontSource,
        size: ScaledPoint,
    ) -> Result<Arc<Font>, FontError> {
        let size = source.adjusted_size(size);
        let face = self.face(source)?;
        let key = (face.id, size);

        {
            let fonts = self.fonts.read().map_err(|_| poisoned(source))?;
            if let Some(font) = fonts.get(&key) {
                log::trace!("font cache hit for face {} at {}", face.id, size);
                return Ok(font.clone());
            }
        }

        let mut fonts = self.fonts.write().map_err(|_| poisoned(source))?;
        let font = fonts
            .entry(key)
            .or_insert_with(|| {
                log::debug!("creating font {} at {}", face.postscript_name, size);
                Arc::new(Font::new(face.clone(), size))
            })
            .clone();
        Ok(font)
    }

    pub fn face_count(&self) -> usize {
        self.faces.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.read().map(|f| f.len()).unwrap_or(0)
    }
}
