//! The style cascade.
//!
//! [`TypesettingSettings`] holds one optional value per setting kind. `None`
//! means "inherit from the enclosing scope or use the engine default". A child
//! scope inherits field by field: whatever the child declares wins.

use crate::font::{FontFamilyId, FontStyle, FontWeight};
use crate::text::{HorizontalAlignment, Hyperlink};
use quire_types::{Color, ScaledPoint};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The closed set of settings a rich-text span can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKind {
    Color,
    FontFamily,
    FontWeight,
    HAlign,
    Hyperlink,
    IndentLeft,
    IndentLeftRows,
    Leading,
    MarginBottom,
    MarginLeft,
    MarginRight,
    MarginTop,
    OpenTypeFeature,
    PreserveWhitespace,
    Size,
    Style,
    YOffset,
}

impl SettingKind {
    pub const ALL: [SettingKind; 17] = [
        SettingKind::Color,
        SettingKind::FontFamily,
        SettingKind::FontWeight,
        SettingKind::HAlign,
        SettingKind::Hyperlink,
        SettingKind::IndentLeft,
        SettingKind::IndentLeftRows,
        SettingKind::Leading,
        SettingKind::MarginBottom,
        SettingKind::MarginLeft,
        SettingKind::MarginRight,
        SettingKind::MarginTop,
        SettingKind::OpenTypeFeature,
        SettingKind::PreserveWhitespace,
        SettingKind::Size,
        SettingKind::Style,
        SettingKind::YOffset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::Color => "SettingColor",
            SettingKind::FontFamily => "SettingFontFamily",
            SettingKind::FontWeight => "SettingFontWeight",
            SettingKind::HAlign => "SettingHAlign",
            SettingKind::Hyperlink => "SettingHyperlink",
            SettingKind::IndentLeft => "SettingIndentLeft",
            SettingKind::IndentLeftRows => "SettingIndentLeftRows",
            SettingKind::Leading => "SettingLeading",
            SettingKind::MarginBottom => "SettingMarginBottom",
            SettingKind::MarginLeft => "SettingMarginLeft",
            SettingKind::MarginRight => "SettingMarginRight",
            SettingKind::MarginTop => "SettingMarginTop",
            SettingKind::OpenTypeFeature => "SettingOpenTypeFeature",
            SettingKind::PreserveWhitespace => "SettingPreserveWhitespace",
            SettingKind::Size => "SettingSize",
            SettingKind::Style => "SettingStyle",
            SettingKind::YOffset => "SettingYOffset",
        }
    }

    /// Settings a text run reads when it is turned into glyphs.
    pub fn is_text_run_setting(&self) -> bool {
        !self.is_paragraph_setting()
    }

    /// Settings that are legitimately ignored by text runs because the
    /// paragraph builder or the page layout consumes them.
    pub fn is_paragraph_setting(&self) -> bool {
        matches!(
            self,
            SettingKind::HAlign
                | SettingKind::IndentLeft
                | SettingKind::IndentLeftRows
                | SettingKind::Leading
                | SettingKind::MarginBottom
                | SettingKind::MarginLeft
                | SettingKind::MarginRight
                | SettingKind::MarginTop
        )
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A color given either by name (looked up in the document color table) or
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSetting {
    Value(Color),
    Named(String),
}

impl From<Color> for ColorSetting {
    fn from(color: Color) -> Self {
        ColorSetting::Value(color)
    }
}

impl From<&str> for ColorSetting {
    fn from(name: &str) -> Self {
        ColorSetting::Named(name.to_string())
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|v| match v {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    }))
}

/// A set of settings for text rendering.
///
/// Deserialisation rejects unknown keys, so a misspelt setting in a
/// configuration file is reported instead of silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct TypesettingSettings {
    pub color: Option<ColorSetting>,
    pub font_family: Option<FontFamilyId>,
    pub font_weight: Option<FontWeight>,
    pub halign: Option<HorizontalAlignment>,
    pub hyperlink: Option<Hyperlink>,
    pub indent_left: Option<ScaledPoint>,
    /// Number of indented rows (positive), or of rows not indented
    /// (negative). 0 means all rows.
    pub indent_left_rows: Option<i32>,
    pub leading: Option<ScaledPoint>,
    pub margin_bottom: Option<ScaledPoint>,
    pub margin_left: Option<ScaledPoint>,
    pub margin_right: Option<ScaledPoint>,
    pub margin_top: Option<ScaledPoint>,
    /// Feature toggles in harfbuzz syntax; each entry may be a comma separated list.
    #[serde(deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub opentype_features: Option<Vec<String>>,
    pub preserve_whitespace: Option<bool>,
    pub size: Option<ScaledPoint>,
    pub style: Option<FontStyle>,
    pub yoffset: Option<ScaledPoint>,
}

impl TypesettingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        SettingKind::ALL.iter().all(|kind| !self.is_set(*kind))
    }

    pub fn is_set(&self, kind: SettingKind) -> bool {
        match kind {
            SettingKind::Color => self.color.is_some(),
            SettingKind::FontFamily => self.font_family.is_some(),
            SettingKind::FontWeight => self.font_weight.is_some(),
            SettingKind::HAlign => self.halign.is_some(),
            SettingKind::Hyperlink => self.hyperlink.is_some(),
            SettingKind::IndentLeft => self.indent_left.is_some(),
            SettingKind::IndentLeftRows => self.indent_left_rows.is_some(),
            SettingKind::Leading => self.leading.is_some(),
            SettingKind::MarginBottom => self.margin_bottom.is_some(),
            SettingKind::MarginLeft => self.margin_left.is_some(),
            SettingKind::MarginRight => self.margin_right.is_some(),
            SettingKind::MarginTop => self.margin_top.is_some(),
            SettingKind::OpenTypeFeature => self.opentype_features.is_some(),
            SettingKind::PreserveWhitespace => self.preserve_whitespace.is_some(),
            SettingKind::Size => self.size.is_some(),
            SettingKind::Style => self.style.is_some(),
            SettingKind::YOffset => self.yoffset.is_some(),
        }
    }

    /// Removes a setting so that it is inherited again.
    pub fn clear(&mut self, kind: SettingKind) {
        match kind {
            SettingKind::Color => self.color = None,
            SettingKind::FontFamily => self.font_family = None,
            SettingKind::FontWeight => self.font_weight = None,
            SettingKind::HAlign => self.halign = None,
            SettingKind::Hyperlink => self.hyperlink = None,
            SettingKind::IndentLeft => self.indent_left = None,
            SettingKind::IndentLeftRows => self.indent_left_rows = None,
            SettingKind::Leading => self.leading = None,
            SettingKind::MarginBottom => self.margin_bottom = None,
            SettingKind::MarginLeft => self.margin_left = None,
            SettingKind::MarginRight => self.margin_right = None,
            SettingKind::MarginTop => self.margin_top = None,
            SettingKind::OpenTypeFeature => self.opentype_features = None,
            SettingKind::PreserveWhitespace => self.preserve_whitespace = None,
            SettingKind::Size => self.size = None,
            SettingKind::Style => self.style = None,
            SettingKind::YOffset => self.yoffset = None,
        }
    }

    /// The kinds that are set, in declaration order.
    pub fn kinds(&self) -> Vec<SettingKind> {
        SettingKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.is_set(*kind))
            .collect()
    }

    /// Returns `self` with every unset field taken from `parent`.
    pub fn inherit_from(&self, parent: &TypesettingSettings) -> TypesettingSettings {
        TypesettingSettings {
            color: self.color.clone().or_else(|| parent.color.clone()),
            font_family: self.font_family.or(parent.font_family),
            font_weight: self.font_weight.or(parent.font_weight),
            halign: self.halign.or(parent.halign),
            hyperlink: self.hyperlink.clone().or_else(|| parent.hyperlink.clone()),
            indent_left: self.indent_left.or(parent.indent_left),
            indent_left_rows: self.indent_left_rows.or(parent.indent_left_rows),
            leading: self.leading.or(parent.leading),
            margin_bottom: self.margin_bottom.or(parent.margin_bottom),
            margin_left: self.margin_left.or(parent.margin_left),
            margin_right: self.margin_right.or(parent.margin_right),
            margin_top: self.margin_top.or(parent.margin_top),
            opentype_features: self
                .opentype_features
                .clone()
                .or_else(|| parent.opentype_features.clone()),
            preserve_whitespace: self.preserve_whitespace.or(parent.preserve_whitespace),
            size: self.size.or(parent.size),
            style: self.style.or(parent.style),
            yoffset: self.yoffset.or(parent.yoffset),
        }
    }

    /// The settings a nested span works with: the child's own entries over
    /// `self`, minus the hyperlink. Hyperlinks are lexical and are represented
    /// by start/stop markers only, never inherited.
    pub fn for_child(&self, child: &TypesettingSettings) -> TypesettingSettings {
        let mut merged = child.inherit_from(self);
        merged.hyperlink = None;
        merged
    }

    // --- Builder helpers ---

    pub fn with_color(mut self, color: impl Into<ColorSetting>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_family(mut self, family: FontFamilyId) -> Self {
        self.font_family = Some(family);
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_size(mut self, size: ScaledPoint) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_hyperlink(mut self, hyperlink: Hyperlink) -> Self {
        self.hyperlink = Some(hyperlink);
        self
    }

    pub fn with_preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = Some(preserve);
        self
    }

    pub fn with_yoffset(mut self, yoffset: ScaledPoint) -> Self {
        self.yoffset = Some(yoffset);
        self
    }

    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.opentype_features
            .get_or_insert_with(Vec::new)
            .push(features.into());
        self
    }

    pub fn with_halign(mut self, halign: HorizontalAlignment) -> Self {
        self.halign = Some(halign);
        self
    }

    pub fn with_leading(mut self, leading: ScaledPoint) -> Self {
        self.leading = Some(leading);
        self
    }
}

impl fmt::Display for TypesettingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds().iter().map(SettingKind::as_str).collect();
        write!(f, "Settings: {}", names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_types::sp;

    #[test]
    fn test_non_ascii_color_falls_back_to_name() {
        let settings: TypesettingSettings = serde_json::from_str(r##"{"color": "#éa"}"##).unwrap();
        assert_eq!(settings.color, Some(ColorSetting::Named("#éa".to_string())));
    }

    #[test]
    fn test_child_wins_ties() {
        let parent = TypesettingSettings::new()
            .with_size(sp("10pt").unwrap())
            .with_weight(FontWeight::BOLD);
        let child = TypesettingSettings::new().with_size(sp("8pt").unwrap());

        let merged = parent.for_child(&child);
        assert_eq!(merged.size, Some(sp("8pt").unwrap()));
        assert_eq!(merged.font_weight, Some(FontWeight::BOLD));
    }

    #[test]
    fn test_hyperlink_is_never_inherited() {
        let parent = TypesettingSettings::new().with_hyperlink(Hyperlink::new("https://a.example"));
        let child = TypesettingSettings::new().with_hyperlink(Hyperlink::new("https://b.example"));

        assert_eq!(parent.for_child(&TypesettingSettings::new()).hyperlink, None);
        assert_eq!(parent.for_child(&child).hyperlink, None);
        // inherit_from alone keeps it; only the child hand-off strips it.
        assert!(child.inherit_from(&parent).hyperlink.is_some());
    }

    #[test]
    fn test_inheritance_does_not_touch_parent() {
        let parent = TypesettingSettings::new().with_size(sp("10pt").unwrap());
        let mut merged = parent.for_child(&TypesettingSettings::new());
        merged.size = Some(sp("20pt").unwrap());
        assert_eq!(parent.size, Some(sp("10pt").unwrap()));
    }

    #[test]
    fn test_kinds_and_clear() {
        let mut settings = TypesettingSettings::new()
            .with_color("red")
            .with_halign(HorizontalAlignment::Center);
        assert_eq!(settings.kinds(), vec![SettingKind::Color, SettingKind::HAlign]);
        settings.clear(SettingKind::Color);
        assert_eq!(settings.kinds(), vec![SettingKind::HAlign]);
        settings.clear(SettingKind::HAlign);
        assert!(settings.is_empty());
    }

    #[test]
    fn test_paragraph_settings_classification() {
        let ignored: Vec<_> = SettingKind::ALL
            .iter()
            .filter(|k| k.is_paragraph_setting())
            .collect();
        assert_eq!(ignored.len(), 8);
        assert!(SettingKind::Size.is_text_run_setting());
        assert!(!SettingKind::MarginTop.is_text_run_setting());
    }

    #[test]
    fn test_deserialize_settings() {
        let json = r##"{
            "color": "#ff0000",
            "font-weight": "bold",
            "size": "11pt",
            "opentype-features": "liga,-kern",
            "hyperlink": { "uri": "https://example.com" }
        }"##;
        let settings: TypesettingSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.color, Some(ColorSetting::Value(Color::rgb(255, 0, 0))));
        assert_eq!(settings.font_weight, Some(FontWeight::BOLD));
        assert_eq!(settings.size, Some(sp("11pt").unwrap()));
        assert_eq!(settings.opentype_features, Some(vec!["liga,-kern".to_string()]));

        let named: TypesettingSettings = serde_json::from_str(r#"{"color": "brand"}"#).unwrap();
        assert_eq!(named.color, Some(ColorSetting::Named("brand".into())));
    }

    #[test]
    fn test_unknown_setting_key_is_rejected() {
        let err = serde_json::from_str::<TypesettingSettings>(r#"{"font-wieght": 700}"#);
        assert!(err.is_err());
    }
}
