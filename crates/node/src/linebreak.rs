//! The seam between paragraph formatting and line breaking.
//!
//! Paragraph formatting builds the [`LinebreakSettings`] and hands its
//! compiled list to a [`LineBreaker`]. The breaking algorithm itself lives
//! with the caller.

use crate::list::{NodeArena, NodeRef};
use crate::node::Glue;
use quire_types::ScaledPoint;

/// Parameters for one paragraph.
#[derive(Debug, Clone, Default)]
pub struct LinebreakSettings {
    pub hsize: ScaledPoint,
    /// Left indentation applied to the rows selected by `indent_rows`.
    pub indent: ScaledPoint,
    /// Positive: indent the first n rows. Negative: indent every row after
    /// the first n. Zero: indent all rows.
    pub indent_rows: i32,
    /// Distance between two baselines.
    pub line_height: ScaledPoint,
    pub line_start_glue: Option<Glue>,
    pub line_end_glue: Option<Glue>,
}

impl LinebreakSettings {
    /// Whether zero based `line` gets the left indentation.
    pub fn is_indented(&self, line: usize) -> bool {
        if self.indent.is_zero() {
            return false;
        }
        match self.indent_rows {
            0 => true,
            n if n > 0 => line < n as usize,
            n => line >= n.unsigned_abs() as usize,
        }
    }
}

/// Where a line ended and how it was set.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoint {
    /// Zero based line number.
    pub line: usize,
    /// The node the line was broken at. `None` for a line ending with the list.
    pub position: Option<NodeRef>,
    pub natural_width: ScaledPoint,
    /// Glue set ratio of the packed line.
    pub ratio: f64,
}

/// Turns a horizontal list into a vertical list of lines.
pub trait LineBreaker {
    /// Breaks the list starting at `head`. Returns a vlist with one hlist per
    /// line and the breakpoints that were chosen.
    fn linebreak(
        &self,
        arena: &mut NodeArena,
        head: NodeRef,
        settings: &LinebreakSettings,
    ) -> (NodeRef, Vec<Breakpoint>);
}
