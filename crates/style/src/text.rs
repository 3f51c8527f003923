use serde::{Deserialize, Serialize};

/// Horizontal alignment of the lines of a paragraph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalAlignment {
    /// Whatever the paragraph builder does when nothing is requested (justified).
    #[default]
    Default,
    Left,
    Right,
    Center,
    Justified,
}

impl HorizontalAlignment {
    /// Lines get a stretchable glue at their end.
    pub fn needs_line_end_glue(self) -> bool {
        matches!(self, HorizontalAlignment::Left | HorizontalAlignment::Center)
    }

    /// Lines get a stretchable glue at their start.
    pub fn needs_line_start_glue(self) -> bool {
        matches!(self, HorizontalAlignment::Right | HorizontalAlignment::Center)
    }
}

/// An external or document-local link target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Hyperlink {
    pub uri: String,
    /// Named destination inside the document, if the link is local.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
}

impl Hyperlink {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            local: None,
        }
    }

    /// The destination used to decide whether two links are the same.
    pub fn destination(&self) -> &str {
        self.local.as_deref().unwrap_or(&self.uri)
    }
}
