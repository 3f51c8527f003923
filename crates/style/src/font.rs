use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// A CSS-style font weight on the 100-900 scale.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const THIN: FontWeight = FontWeight(100);
    pub const EXTRA_LIGHT: FontWeight = FontWeight(200);
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const SEMI_BOLD: FontWeight = FontWeight(600);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const ULTRA_BOLD: FontWeight = FontWeight(800);
    pub const BLACK: FontWeight = FontWeight(900);

    /// Returns the numeric weight value (100-900 scale).
    pub fn numeric_value(&self) -> u16 {
        self.0
    }

    /// Parse a font weight from a string (e.g., "bold", "400")
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "thin" => Ok(FontWeight::THIN),
            "extra light" | "extralight" => Ok(FontWeight::EXTRA_LIGHT),
            "light" => Ok(FontWeight::LIGHT),
            "regular" | "normal" => Ok(FontWeight::NORMAL),
            "medium" => Ok(FontWeight::MEDIUM),
            "semibold" | "semi bold" => Ok(FontWeight::SEMI_BOLD),
            "bold" => Ok(FontWeight::BOLD),
            "ultra bold" | "ultrabold" => Ok(FontWeight::ULTRA_BOLD),
            "black" => Ok(FontWeight::BLACK),
            other => other
                .parse::<u16>()
                .map(FontWeight)
                .map_err(|_| format!("Invalid font weight: '{}'", s)),
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

impl From<u16> for FontWeight {
    fn from(value: u16) -> Self {
        FontWeight(value)
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            100 => f.write_str("Thin"),
            200 => f.write_str("Extra Light"),
            300 => f.write_str("Light"),
            400 => f.write_str("Normal"),
            500 => f.write_str("Medium"),
            600 => f.write_str("SemiBold"),
            700 => f.write_str("Bold"),
            800 => f.write_str("Ultra Bold"),
            900 => f.write_str("Black"),
            n => write!(f, "fontweight {}", n),
        }
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FontWeightDef {
            Str(String),
            Num(u16),
        }

        match FontWeightDef::deserialize(deserializer)? {
            FontWeightDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            FontWeightDef::Num(n) => Ok(FontWeight(n)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// An upright font.
    #[default]
    Normal,
    /// An italicized font.
    Italic,
    /// An upright font tilted by an angle.
    Oblique,
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        })
    }
}

/// Index of a font family inside a document's family registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FontFamilyId(pub usize);

impl fmt::Display for FontFamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_names() {
        assert_eq!(FontWeight::THIN.to_string(), "Thin");
        assert_eq!(FontWeight::SEMI_BOLD.to_string(), "SemiBold");
        assert_eq!(FontWeight(650).to_string(), "fontweight 650");
    }

    #[test]
    fn test_weight_parse() {
        assert_eq!(FontWeight::parse("Bold").unwrap(), FontWeight::BOLD);
        assert_eq!(FontWeight::parse("regular").unwrap(), FontWeight::NORMAL);
        assert_eq!(FontWeight::parse("650").unwrap(), FontWeight(650));
        assert!(FontWeight::parse("heavy-ish").is_err());
    }

    #[test]
    fn test_weight_deserialize() {
        let a: FontWeight = serde_json::from_str("\"bold\"").unwrap();
        let b: FontWeight = serde_json::from_str("700").unwrap();
        assert_eq!(a, b);
    }
}
