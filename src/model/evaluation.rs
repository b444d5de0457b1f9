//! Evaluations: gradable prompts attached to an event.
//!
//! Each evaluation carries what the learner typed and a 1–5 rating.
//! These are the only fields that change through learner input rather than
//! through authored content or expand/highlight transitions.

use std::fmt;

use super::{Content, EvaluationId, EvaluationsId};

/// A grade on the notebook's five-point scale.
///
/// 1 is "Best" and 5 is "Worst", matching the order of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, EvaluationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EvaluationError::RatingOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The label printed above this point on the scale.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Best",
            2 => "Good",
            3 => "Average",
            4 => "Poor",
            _ => "Worst",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("rating {0} is out of range: expected 1 to 5")]
    RatingOutOfRange(u8),
}

/// A single gradable prompt, e.g. a CMS sign message the learner should post.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub id: EvaluationId,

    /// Which console or role is being evaluated (`"CMS"`, `"ATMS"`, ...).
    pub kind: String,
    pub content: Content,

    pub text: String,
    pub rating: Option<Rating>,
}

impl Evaluation {
    pub fn new(id: EvaluationId, kind: impl Into<String>, content: Content) -> Self {
        Self {
            id,
            kind: kind.into(),
            content,
            text: String::new(),
            rating: None,
        }
    }

    /// Replaces the free-text response. Last write wins.
    pub fn record_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replaces the rating. Last write wins; out-of-range values leave the
    /// current rating untouched.
    pub fn record_rating(&mut self, value: u8) -> Result<(), EvaluationError> {
        self.rating = Some(Rating::new(value)?);
        Ok(())
    }
}

/// The evaluations of one event, collapsible as a group.
#[derive(Debug, Clone)]
pub struct Evaluations {
    pub id: EvaluationsId,
    pub items: Vec<Evaluation>,
    pub expanded: bool,
}

impl Evaluations {
    pub fn new(id: EvaluationsId, items: Vec<Evaluation>) -> Self {
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
