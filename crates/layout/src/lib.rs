//! Rich-text compilation for the quire typesetter.
//!
//! The [`Typesetter`] owns the font families of a document, the font instance
//! cache and the collaborators that load faces and shape text. It compiles a
//! [`quire_idf::RichText`] tree into a node list and can hand that list to a
//! line breaker to format a paragraph.

use quire_style::FontFamilyId;
use quire_traits::FontError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("Unknown font family: {0}")]
    UnknownFontFamily(FontFamilyId),
    #[error("Unhandled whitespace type {0:?}")]
    UnhandledWhitespace(String),
}

pub mod config;
pub mod fonts;
pub mod paragraph;
pub mod text;

pub use self::config::TypesetterConfig;
pub use self::fonts::{FontCache, FontFamily};
pub use self::paragraph::ParagraphOptions;
pub use self::text::builder::Typesetter;
pub use self::text::shaper::{FilesystemFaceLoader, RustybuzzShaper};

#[cfg(test)]
mod test_utils;
