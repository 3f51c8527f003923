use crate::Typesetter;
use quire_node::{NodeArena, NodeRef};
use quire_style::{FontStyle, FontWeight, OpenTypeFeature};
use quire_traits::{Atom, Face, Font, FontError, FontSource, InMemoryFaceLoader, Shaper};
use std::sync::{Arc, Mutex};

/// A face loader serving three synthetic faces: `regular.ttf`, `bold.ttf`
/// and `italic.ttf`, each 1000 units per em with a 250 unit space.
pub fn test_loader() -> Arc<InMemoryFaceLoader> {
    let _ = env_logger::builder().is_test(true).try_init();
    let loader = InMemoryFaceLoader::new();
    for (file, name) in [
        ("regular.ttf", "Test-Regular"),
        ("bold.ttf", "Test-Bold"),
        ("italic.ttf", "Test-Italic"),
    ] {
        loader.add_face(file, Face::new(name, 1000, 250)).unwrap();
    }
    Arc::new(loader)
}

/// Shapes one atom per character, 500 units wide. Pairs listed in `kerning`
/// get a kern of -50 units after the first character.
#[derive(Debug, Default)]
pub struct FixedPitchShaper {
    kerning: Vec<(char, char)>,
    features: Mutex<Vec<Vec<OpenTypeFeature>>>,
}

impl FixedPitchShaper {
    pub fn with_kerning(mut self, left: char, right: char) -> Self {
        self.kerning.push((left, right));
        self
    }

    /// The feature list passed to the most recent `shape` call.
    pub fn last_features(&self) -> Vec<OpenTypeFeature> {
        self.features.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Shaper for FixedPitchShaper {
    fn shape(
        &self,
        font: &Font,
        text: &str,
        features: &[OpenTypeFeature],
    ) -> Result<Vec<Atom>, FontError> {
        self.features.lock().unwrap().push(features.to_vec());
        let chars: Vec<char> = text.chars().collect();
        let atoms: Vec<Atom> = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let kerned = chars
                    .get(i + 1)
                    .is_some_and(|&next| self.kerning.contains(&(c, next)));
                Atom {
                    is_space: c.is_whitespace(),
                    components: c.to_string(),
                    codepoint: c as u32,
                    advance: font.scale(500),
                    height: font.scale(700),
                    depth: font.scale(if c == 'g' || c == 'p' { 200 } else { 0 }),
                    kern_after: if kerned { font.scale(-50) } else { Default::default() },
                    hyphenate: c.is_alphabetic(),
                }
            })
            .collect();
        Ok(atoms)
    }
}

/// A typesetter with one family "Serif" (id 0): regular and bold upright,
/// plus an italic whose source adds the `smcp` feature.
pub fn test_typesetter() -> (Typesetter, Arc<InMemoryFaceLoader>, Arc<FixedPitchShaper>) {
    let loader = test_loader();
    let shaper = Arc::new(FixedPitchShaper::default().with_kerning('A', 'V'));
    let mut ts = Typesetter::new(loader.clone(), shaper.clone());
    ts.new_font_family("Serif")
        .add_member(
            FontSource::new("Regular", "regular.ttf"),
            FontWeight::NORMAL,
            FontStyle::Normal,
        )
        .add_member(FontSource::new("Bold", "bold.ttf"), FontWeight::BOLD, FontStyle::Normal)
        .add_member(
            FontSource::new("Italic", "italic.ttf").with_features(&["smcp"]),
            FontWeight::NORMAL,
            FontStyle::Italic,
        );
    (ts, loader, shaper)
}

/// The node kind names of the list starting at `head`.
pub fn kinds(arena: &NodeArena, head: NodeRef) -> Vec<&'static str> {
    arena.iter(Some(head)).map(|r| arena.get(r).name()).collect()
}
