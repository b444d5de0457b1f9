//! Properties: the informational content of an event (radio traffic, CAD
//! entries, phone calls).

use super::PropertiesId;

/// What a property or evaluation says.
///
/// Authored as a flat list of strings: a single entry is one text blob,
/// anything longer is read as alternating label/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A single block of text.
    Text(String),

    /// Labeled lines, e.g. `("Dispatch:", "14-14 Santa Lucia")`.
    Pairs(Vec<(String, String)>),
}

/// Why a flat authored list could not be read as [`Content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("content is empty")]
    Empty,

    #[error("expected a single text or label/value pairs, found {0} entries")]
    UnpairedLabel(usize),
}

impl Content {
    /// Reads a flat authored list. Odd lengths above one are rejected
    /// rather than dropping the dangling label.
    pub fn from_flat(mut data: Vec<String>) -> Result<Self, ContentError> {
        match data.len() {
            0 => Err(ContentError::Empty),
            1 => Ok(Self::Text(data.remove(0))),
            n if n % 2 == 1 => Err(ContentError::UnpairedLabel(n)),
            _ => {
                let mut pairs = Vec::with_capacity(data.len() / 2);
                let mut iter = data.into_iter();
                while let (Some(label), Some(value)) = (iter.next(), iter.next()) {
                    pairs.push((label, value));
                }
                Ok(Self::Pairs(pairs))
            }
        }
    }
}

/// A labeled fact attached to an event.
#[derive(Debug, Clone)]
pub struct Property {
    /// Heading such as `"CHP Radio:"`.
    pub kind: String,
    pub content: Content,
}

/// The properties of one event, collapsible as a group.
#[derive(Debug, Clone)]
pub struct Properties {
    pub id: PropertiesId,
    pub items: Vec<Property>,
    pub expanded: bool,
}

impl Properties {
    pub fn new(id: PropertiesId, items: Vec<Property>) -> Self {
        Self {
            id,
            items,
            expanded: true,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
