//! Identifiers handed out at load time.
//!
//! Each kind counts up from zero in construction order, and the presentation
//! layer derives its element names from them, so they stay stable for the
//! life of the process.

use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifies an [`Event`](super::Event).
    EventId
);
id_type!(
    /// Identifies the [`Properties`](super::Properties) group of one event.
    PropertiesId
);
id_type!(
    /// Identifies the [`Evaluations`](super::Evaluations) group of one event.
    EvaluationsId
);
id_type!(
    /// Identifies a single [`Evaluation`](super::Evaluation).
    EvaluationId
);

/// Monotonic counters for every id kind.
#[derive(Debug, Default)]
pub struct IdAllocator {
    events: u32,
    properties: u32,
    evaluations: u32,
    evaluation: u32,
}

impl IdAllocator {
    pub fn event(&mut self) -> EventId {
        EventId(bump(&mut self.events))
    }

    pub fn properties(&mut self) -> PropertiesId {
        PropertiesId(bump(&mut self.properties))
    }

    pub fn evaluations(&mut self) -> EvaluationsId {
        EvaluationsId(bump(&mut self.evaluations))
    }

    pub fn evaluation(&mut self) -> EvaluationId {
        EvaluationId(bump(&mut self.evaluation))
    }
}

fn bump(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter += 1;
    id
}
