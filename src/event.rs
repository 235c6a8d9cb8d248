#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Attribute pairs of a start tag, in document order. Duplicate names are kept
/// as-is; the diff never merges or reorders them.
pub type Attributes = Vec<(String, String)>;

/// Location of an event in its source document.
///
/// Positions are carried through the diff untouched so that callers can map
/// output events back to their origin. They are ignored when comparing events.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-based line number. Synthetic events report line 0.
    pub line: usize,

    /// Byte offset from the start of the document.
    pub offset: usize,
}

impl Position {
    #[must_use]
    pub fn new(line: usize, offset: usize) -> Self { Position { line, offset } }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, byte {}", self.line, self.offset)
    }
}

/// A flattened piece of markup: the opening of an element, the closing of an
/// element, or a run of text between tags.
///
/// Equality only considers the name, attributes, and content. Two events from
/// different documents compare equal whenever they carry the same markup, no
/// matter where they were found.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub enum Event {
    StartTag {
        name: String,
        attributes: Attributes,
        position: Position,
    },
    EndTag {
        name: String,
        position: Position,
    },
    Text {
        content: String,
        position: Position,
    },
}

impl Event {
    #[must_use]
    pub fn start(name: impl Into<String>, attributes: Attributes) -> Self {
        Event::StartTag {
            name: name.into(),
            attributes,
            position: Position::default(),
        }
    }

    #[must_use]
    pub fn end(name: impl Into<String>) -> Self {
        Event::EndTag {
            name: name.into(),
            position: Position::default(),
        }
    }

    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Event::Text {
            content: content.into(),
            position: Position::default(),
        }
    }

    /// Returns the same event relocated to `position`.
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        match &mut self {
            Event::StartTag { position: at, .. }
            | Event::EndTag { position: at, .. }
            | Event::Text { position: at, .. } => *at = position,
        }

        self
    }

    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Event::StartTag { position, .. }
            | Event::EndTag { position, .. }
            | Event::Text { position, .. } => *position,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool { matches!(self, Event::Text { .. }) }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Event::StartTag {
                    name, attributes, ..
                },
                Event::StartTag {
                    name: other_name,
                    attributes: other_attributes,
                    ..
                },
            ) => name == other_name && attributes == other_attributes,
            (Event::EndTag { name, .. }, Event::EndTag { name: other_name, .. }) => {
                name == other_name
            }
            (Event::Text { content, .. }, Event::Text { content: other_content, .. }) => {
                content == other_content
            }
            _ => false,
        }
    }
}
