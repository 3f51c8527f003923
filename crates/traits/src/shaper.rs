//! The glyph-shaping seam.

use crate::font::{Font, FontError};
use quire_style::OpenTypeFeature;
use quire_types::ScaledPoint;
use std::fmt::Debug;

/// One shaped unit of text: either a glyph or a whitespace character.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub is_space: bool,
    /// The characters this atom stands for; a ligature covers several.
    pub components: String,
    /// Font specific glyph id.
    pub codepoint: u32,
    pub advance: ScaledPoint,
    pub height: ScaledPoint,
    pub depth: ScaledPoint,
    /// Kerning to apply between this atom and the next one.
    pub kern_after: ScaledPoint,
    pub hyphenate: bool,
}

/// Turns text into positioned atoms for a given font.
///
/// Features arrive in application order: document defaults, then the font
/// source defaults, then per-setting toggles. Duplicates are passed through and
/// left to the implementation to interpret.
///
/// A shaper that cannot handle the font must fail rather than return no
/// atoms: an empty result means the text was empty.
pub trait Shaper: Send + Sync + Debug {
    fn shape(
        &self,
        font: &Font,
        text: &str,
        features: &[OpenTypeFeature],
    ) -> Result<Vec<Atom>, FontError>;
}
