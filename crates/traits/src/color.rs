//! Named colors.

use quire_types::Color;
use std::collections::HashMap;
use std::fmt::Debug;

/// The document color table.
pub trait ColorTable: Send + Sync + Debug {
    fn lookup_color(&self, name: &str) -> Option<Color>;
}

/// A color table backed by a map, pre-populated with black and white.
#[derive(Debug, Clone)]
pub struct InMemoryColorTable {
    colors: HashMap<String, Color>,
}

impl Default for InMemoryColorTable {
    fn default() -> Self {
        let mut colors = HashMap::new();
        colors.insert("black".to_string(), Color::BLACK);
        colors.insert("white".to_string(), Color::rgb(255, 255, 255));
        Self { colors }
    }
}

impl InMemoryColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<String>, color: Color) {
        self.colors.insert(name.into(), color);
    }

    pub fn with_color(mut self, name: impl Into<String>, color: Color) -> Self {
        self.define(name, color);
        self
    }
}

impl ColorTable for InMemoryColorTable {
    fn lookup_color(&self, name: &str) -> Option<Color> {
        self.colors.get(name).cloned()
    }
}
