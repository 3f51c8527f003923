//! Fixed-point lengths.
//!
//! All geometry in the engine is expressed as a [`ScaledPoint`], an integer
//! count of 1/65536 of a DTP point. Repeated additions of scaled points never
//! drift the way `f32` sums do, which matters when the line breaker adds up
//! thousands of glue widths.
//!
//! Human units are converted with [`sp`] (fallible) or [`must_sp`] (panics,
//! for config-time literals only).

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::space0;
use nom::combinator::{map, value};
use nom::number::complete::double;
use nom::sequence::delimited;
use nom::{IResult, Parser};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Number of scaled points in one DTP point.
pub const FACTOR: i64 = 65536;

/// Error returned when a length literal cannot be converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Conversion error: '{0}' is not a length of the form <number><unit>")]
    Malformed(String),
    #[error("Conversion error: cannot parse number in '{0}'")]
    Number(String),
}

/// A length unit understood by [`sp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Pt,
    In,
    Mm,
    Cm,
    M,
    Px,
    Pc,
}

impl Unit {
    /// How many DTP points one of this unit is.
    pub fn points(self) -> f64 {
        match self {
            Unit::Pt => 1.0,
            Unit::In => 72.0,
            // 1mm = 1/10 cm, 1cm = 1/2.54 in
            Unit::Mm => 1.0 / 10.0 / 2.54 * 72.0,
            Unit::Cm => 1.0 / 2.54 * 72.0,
            Unit::M => 100.0 / 2.54 * 72.0,
            Unit::Px => 96.0 / 72.0,
            // pica
            Unit::Pc => 12.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Pt => "pt",
            Unit::In => "in",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::M => "m",
            Unit::Px => "px",
            Unit::Pc => "pc",
        }
    }
}

/// A 65536th of a DTP point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScaledPoint(pub i64);

impl ScaledPoint {
    pub const ZERO: ScaledPoint = ScaledPoint(0);
    /// One DTP point.
    pub const ONE_PT: ScaledPoint = ScaledPoint(FACTOR);

    /// Converts the DTP point value `pt` to scaled points.
    pub fn from_pt(pt: f64) -> Self {
        ScaledPoint((pt * FACTOR as f64).round() as i64)
    }

    /// Converts `value` given in `unit` to scaled points.
    pub fn from_unit(value: f64, unit: Unit) -> Self {
        Self::from_pt(value * unit.points())
    }

    /// The value as DTP points. `ScaledPoint(2 * 65536).to_pt() == 2.0`.
    pub fn to_pt(self) -> f64 {
        self.0 as f64 / FACTOR as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Scales by a float factor, rounding to the nearest scaled point.
    pub fn scale(self, factor: f64) -> Self {
        ScaledPoint((self.0 as f64 * factor).round() as i64)
    }
}

impl fmt::Display for ScaledPoint {
    /// Points with at most two decimals and trailing zeros removed, e.g. `12.5pt`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.to_pt() * 100.0).round() / 100.0;
        write!(f, "{}pt", rounded)
    }
}

impl Add for ScaledPoint {
    type Output = ScaledPoint;
    fn add(self, rhs: ScaledPoint) -> ScaledPoint {
        ScaledPoint(self.0 + rhs.0)
    }
}

impl AddAssign for ScaledPoint {
    fn add_assign(&mut self, rhs: ScaledPoint) {
        self.0 += rhs.0;
    }
}

impl Sub for ScaledPoint {
    type Output = ScaledPoint;
    fn sub(self, rhs: ScaledPoint) -> ScaledPoint {
        ScaledPoint(self.0 - rhs.0)
    }
}

impl SubAssign for ScaledPoint {
    fn sub_assign(&mut self, rhs: ScaledPoint) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for ScaledPoint {
    type Output = ScaledPoint;
    fn mul(self, rhs: i64) -> ScaledPoint {
        ScaledPoint(self.0 * rhs)
    }
}

impl Div<i64> for ScaledPoint {
    type Output = ScaledPoint;
    fn div(self, rhs: i64) -> ScaledPoint {
        ScaledPoint(self.0 / rhs)
    }
}

impl Neg for ScaledPoint {
    type Output = ScaledPoint;
    fn neg(self) -> ScaledPoint {
        ScaledPoint(-self.0)
    }
}

impl Sum for ScaledPoint {
    fn sum<I: Iterator<Item = ScaledPoint>>(iter: I) -> ScaledPoint {
        iter.fold(ScaledPoint::ZERO, Add::add)
    }
}

// --- Parsing ---

fn parse_unit(input: &str) -> IResult<&str, Unit> {
    // "mm" must be tried before "m"
    alt((
        value(Unit::Mm, tag("mm")),
        value(Unit::Cm, tag("cm")),
        value(Unit::In, tag("in")),
        value(Unit::Pt, tag("pt")),
        value(Unit::Px, tag("px")),
        value(Unit::Pc, tag("pc")),
        value(Unit::M, tag("m")),
    ))
    .parse(input)
}

/// Parses `<number><unit>` with optional surrounding blanks.
fn parse_length(input: &str) -> IResult<&str, ScaledPoint> {
    map(
        delimited(space0, (double, space0, parse_unit), space0),
        |(number, _, unit)| ScaledPoint::from_unit(number, unit),
    )
    .parse(input)
}

/// Converts a length literal such as `"1cm"` or `"12.5in"` to scaled points.
///
/// Recognised units are pt, in, mm, cm, m, px and pc (case insensitive).
pub fn sp(literal: &str) -> Result<ScaledPoint, UnitError> {
    let lower = literal.to_lowercase();
    match parse_length(&lower) {
        Ok(("", length)) => Ok(length),
        Ok(_) => Err(UnitError::Malformed(literal.to_string())),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) if e.input == lower.trim_start() => {
            Err(UnitError::Number(literal.to_string()))
        }
        Err(_) => Err(UnitError::Malformed(literal.to_string())),
    }
}

/// Like [`sp`] but panics on malformed input.
///
/// Only use this for literals fixed at configuration time, never for values
/// coming from document content.
pub fn must_sp(literal: &str) -> ScaledPoint {
    match sp(literal) {
        Ok(length) => length,
        Err(err) => {
            log::error!("{}", err);
            panic!("{}", err);
        }
    }
}

impl FromStr for ScaledPoint {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        sp(s)
    }
}

impl Serialize for ScaledPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for ScaledPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ScaledPointDef {
            Str(String),
            Raw(i64),
        }

        match ScaledPointDef::deserialize(deserializer)? {
            ScaledPointDef::Str(s) => sp(&s).map_err(de::Error::custom),
            ScaledPointDef::Raw(n) => Ok(ScaledPoint(n)),
        }
    }
}
