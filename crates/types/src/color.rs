use serde::{de, Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

fn default_one() -> f32 {
    1.0
}

fn is_one(num: &f32) -> bool {
    *num == 1.0
}

/// An RGB color as used for text fills.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(skip_serializing_if = "is_one", default = "default_one")]
    pub a: f32,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.r.hash(state);
        self.g.hash(state);
        self.b.hash(state);
        self.a.to_bits().hash(state);
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Formats a color component for a PDF content stream: `0`, `1` or up to
/// three decimals without trailing zeros.
fn pdf_component(c: u8) -> String {
    let v = (c as f64 / 255.0 * 1000.0).round() / 1000.0;
    format!("{}", v)
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn gray(value: u8) -> Self {
        Self { r: value, g: value, b: value, a: 1.0 }
    }

    fn pdf_triplet(&self) -> String {
        format!(
            "{} {} {}",
            pdf_component(self.r),
            pdf_component(self.g),
            pdf_component(self.b)
        )
    }

    /// The PDF operator that sets this color for fills (`r g b rg`).
    pub fn pdf_string_non_stroking(&self) -> String {
        format!("{} rg", self.pdf_triplet())
    }

    /// The PDF operator that sets this color for strokes (`r g b RG`).
    pub fn pdf_string_stroking(&self) -> String {
        format!("{} RG", self.pdf_triplet())
    }

    /// Resets both stroke and fill color to pure black.
    pub fn pdf_reset() -> &'static str {
        "0 0 0 RG 0 0 0 rg"
    }

    /// Parse a hex color string (#RGB or #RRGGBB format)
    fn parse_hex(s: &str) -> Result<Color, String> {
        let s = s.trim();
        let Some(hex) = s.strip_prefix('#') else {
            return Err(format!("Color must start with #, got: {}", s));
        };
        if !hex.is_ascii() {
            return Err(format!("Color digits must be hexadecimal, got: {}", s));
        }

        match hex.len() {
            3 => {
                // #RGB format - expand each digit
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16)
                    .map_err(|e| format!("Invalid red component: {}", e))?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16)
                    .map_err(|e| format!("Invalid green component: {}", e))?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16)
                    .map_err(|e| format!("Invalid blue component: {}", e))?;
                Ok(Color::rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16)
                    .map_err(|e| format!("Invalid red component: {}", e))?;
                let g = u8::from_str_radix(&hex[2..4], 16)
                    .map_err(|e| format!("Invalid green component: {}", e))?;
                let b = u8::from_str_radix(&hex[4..6], 16)
                    .map_err(|e| format!("Invalid blue component: {}", e))?;
                Ok(Color::rgb(r, g, b))
            }
            _ => Err(format!("Invalid hex color length: expected 3 or 6, got {}", hex.len())),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorDef {
            Str(String),
            Map { r: u8, g: u8, b: u8, #[serde(default = "default_one")] a: f32 },
        }

        match ColorDef::deserialize(deserializer)? {
            ColorDef::Str(s) => Self::parse_hex(&s).map_err(de::Error::custom),
            ColorDef::Map { r, g, b, a } => Ok(Color { r, g, b, a }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_operators() {
        assert_eq!(Color::rgb(255, 0, 0).pdf_string_non_stroking(), "1 0 0 rg");
        assert_eq!(Color::rgb(0, 255, 0).pdf_string_stroking(), "0 1 0 RG");
        assert_eq!(Color::gray(51).pdf_string_non_stroking(), "0.2 0.2 0.2 rg");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!("#f00".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("#336699".parse::<Color>().unwrap(), Color::rgb(0x33, 0x66, 0x99));
        assert!("336699".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn test_parse_non_ascii_is_an_error() {
        assert!("#éa".parse::<Color>().is_err());
        assert!("#aé12".parse::<Color>().is_err());
        assert!(serde_json::from_str::<Color>(r##""#ééé""##).is_err());
    }
}
