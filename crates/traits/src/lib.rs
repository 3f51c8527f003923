pub mod color;
pub mod font;
pub mod shaper;

pub use color::{ColorTable, InMemoryColorTable};
pub use font::{Face, FaceLoader, Font, FontError, FontSource, InMemoryFaceLoader, SharedFontData};
pub use shaper::{Atom, Shaper};
