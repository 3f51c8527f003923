//! Low-level nom parser functions for style values.
//!
//! This module provides the parsers behind the `FromStr` implementations of
//! the style types: OpenType feature toggles, font styles and alignments.

use crate::feature::OpenTypeFeature;
use crate::font::FontStyle;
use crate::text::HorizontalAlignment;
use nom::branch::alt;
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::{char, digit1};
use nom::combinator::{map, map_res, opt};
use nom::sequence::preceded;
use nom::{IResult, Parser};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parses one feature in harfbuzz syntax: `[+-]tag[=value]`.
pub fn parse_feature(input: &str) -> IResult<&str, OpenTypeFeature> {
    map(
        (
            opt(alt((char('+'), char('-')))),
            take_while_m_n(1, 4, is_tag_char),
            opt(preceded(char('='), map_res(digit1, str::parse::<u32>))),
        ),
        |(sign, tag, value): (Option<char>, &str, Option<u32>)| {
            let value = match sign {
                Some('-') => 0,
                _ => value.unwrap_or(1),
            };
            OpenTypeFeature::new(tag.as_bytes(), value)
        },
    )
    .parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

/// Parses a font style string (e.g., "normal", "italic").
pub fn parse_font_style(s: &str) -> Result<FontStyle, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "normal" => Ok(FontStyle::Normal),
        "italic" => Ok(FontStyle::Italic),
        "oblique" => Ok(FontStyle::Oblique),
        _ => Err(StyleParseError::InvalidValue {
            property: "font-style".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parses a horizontal alignment value.
pub fn parse_horizontal_alignment(s: &str) -> Result<HorizontalAlignment, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "default" => Ok(HorizontalAlignment::Default),
        "left" => Ok(HorizontalAlignment::Left),
        "right" => Ok(HorizontalAlignment::Right),
        "center" => Ok(HorizontalAlignment::Center),
        "justify" | "justified" => Ok(HorizontalAlignment::Justified),
        _ => Err(StyleParseError::InvalidValue {
            property: "halign".to_string(),
            value: s.to_string(),
        }),
    }
}

impl FromStr for FontStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_font_style(s)
    }
}

impl FromStr for HorizontalAlignment {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_horizontal_alignment(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_style_from_str() {
        assert_eq!("Italic".parse::<FontStyle>().unwrap(), FontStyle::Italic);
        assert!("slanted".parse::<FontStyle>().is_err());
    }

    #[test]
    fn test_alignment_from_str() {
        assert_eq!("center".parse::<HorizontalAlignment>().unwrap(), HorizontalAlignment::Center);
        assert_eq!(
            "justify".parse::<HorizontalAlignment>().unwrap(),
            HorizontalAlignment::Justified
        );
        assert!("middle".parse::<HorizontalAlignment>().is_err());
    }

    #[test]
    fn test_alignment_default_and_serde_names() {
        assert_eq!(HorizontalAlignment::default(), HorizontalAlignment::Default);
        let parsed: HorizontalAlignment = serde_json::from_str(r#""justified""#).unwrap();
        assert_eq!(parsed, HorizontalAlignment::Justified);
        assert_eq!(serde_json::to_string(&HorizontalAlignment::Center).unwrap(), r#""center""#);
    }

    #[test]
    fn test_parse_feature_leaves_remainder() {
        let (rest, feature) = parse_feature("kern,liga").unwrap();
        assert_eq!(rest, ",liga");
        assert_eq!(feature.tag_str(), "kern");
    }
}
