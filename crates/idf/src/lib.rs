//! Rich text: the tree form the typesetter compiles into a node list.
//!
//! A [`RichText`] is a span. It owns its settings and an ordered list of
//! [`Item`]s, each of which is literal text, a nested span or a node that was
//! compiled earlier and is spliced in as is.

use quire_node::NodeRef;
use quire_style::TypesettingSettings;

/// One entry of a span.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A run of literal text.
    Text(String),
    /// A nested span with its own settings.
    Span(RichText),
    /// An already compiled node (or node list) from the document's arena.
    Node(NodeRef),
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Text(s.to_string())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Text(s)
    }
}

impl From<RichText> for Item {
    fn from(span: RichText) -> Self {
        Item::Span(span)
    }
}

impl From<NodeRef> for Item {
    fn from(r: NodeRef) -> Self {
        Item::Node(r)
    }
}

/// A styled span of rich text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichText {
    pub settings: TypesettingSettings,
    pub items: Vec<Item>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// A span holding a single text run.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            settings: TypesettingSettings::default(),
            items: vec![Item::Text(text.into())],
        }
    }

    pub fn with_settings(mut self, settings: TypesettingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_item(mut self, item: impl Into<Item>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn push(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The concatenated text of this span and all nested spans.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self.items.iter()];
        while let Some(items) = stack.last_mut() {
            match items.next() {
                Some(Item::Text(s)) => out.push_str(s),
                Some(Item::Span(span)) => stack.push(span.items.iter()),
                Some(Item::Node(_)) => {}
                None => {
                    stack.pop();
                }
            }
        }
        out
    }
}
