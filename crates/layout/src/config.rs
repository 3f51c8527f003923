use quire_types::ScaledPoint;
use serde::Deserialize;

/// Document-wide typesetting defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TypesetterConfig {
    /// OpenType features applied to every text run before the font's and the
    /// run's own features.
    ///
    /// Defaults to `["liga", "kern"]`.
    pub default_features: Vec<String>,
    /// Font size used when no size setting is in effect.
    ///
    /// Defaults to `12pt`.
    pub default_font_size: ScaledPoint,
    /// Number of fixed-width rules a tab expands to when whitespace is
    /// preserved.
    ///
    /// Defaults to `4`.
    pub tab_width: usize,
    /// Line height as a percentage of the font size, used when a paragraph has
    /// no explicit leading.
    ///
    /// Defaults to `120`.
    pub leading_percent: u32,
}

impl Default for TypesetterConfig {
    fn default() -> Self {
        Self {
            default_features: vec!["liga".to_string(), "kern".to_string()],
            default_font_size: ScaledPoint::from_pt(12.0),
            tab_width: 4,
            leading_percent: 120,
        }
    }
}

impl TypesetterConfig {
    /// The line height for `size` according to `leading_percent`.
    pub fn default_leading(&self, size: ScaledPoint) -> ScaledPoint {
        size * self.leading_percent as i64 / 100
    }
}
