use crate::parsers::{parse_feature, run_parser, StyleParseError};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An OpenType feature toggle such as `liga`, `-kern` or `ss01=1`.
///
/// Tags shorter than four characters are padded with spaces, as OpenType
/// requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenTypeFeature {
    pub tag: [u8; 4],
    pub value: u32,
}

impl OpenTypeFeature {
    pub fn new(tag: &[u8], value: u32) -> Self {
        let mut padded = [b' '; 4];
        for (dst, src) in padded.iter_mut().zip(tag.iter()) {
            *dst = *src;
        }
        Self { tag: padded, value }
    }

    pub fn tag_str(&self) -> &str {
        std::str::from_utf8(&self.tag).unwrap_or("????").trim_end()
    }

    pub fn is_enabled(&self) -> bool {
        self.value != 0
    }
}

impl fmt::Display for OpenTypeFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            0 => write!(f, "-{}", self.tag_str()),
            1 => write!(f, "{}", self.tag_str()),
            n => write!(f, "{}={}", self.tag_str(), n),
        }
    }
}

impl FromStr for OpenTypeFeature {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        run_parser(parse_feature, s)
    }
}

impl Serialize for OpenTypeFeature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OpenTypeFeature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Parses a comma separated feature list (`"liga,-kern"`).
///
/// Entries that cannot be parsed are logged and skipped; the shaper is never
/// handed a half-parsed feature.
pub fn parse_feature_list(list: &str) -> Vec<OpenTypeFeature> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<OpenTypeFeature>() {
            Ok(feature) => Some(feature),
            Err(err) => {
                log::error!("cannot parse OpenType feature tag {:?}: {}", entry, err);
                None
            }
        })
        .collect()
}
