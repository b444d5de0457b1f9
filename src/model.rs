//! Core data model for the notebook.
//!
//! Times, incidents, and the events that make up a script, along with the
//! properties and evaluations each event carries.

mod evaluation;
mod event;
mod id;
mod incident;
mod property;
mod time;

pub use evaluation::{Evaluation, Evaluations, Rating};
pub use event::Event;
pub use id::{EvaluationId, EvaluationsId, EventId, IdAllocator, PropertiesId};
pub use incident::Incident;
pub use property::{Content, ContentError, Properties, Property};
pub use time::{Time, format_seconds};
