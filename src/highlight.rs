//! Highlighting the current event.
//!
//! Polled once per tick. Keeps exactly one event highlighted: the one the
//! timeline reports as current at the clock's time. Before the first event
//! executes nothing is highlighted.

use std::fmt;

use crate::model::EventId;
use crate::timeline::Timeline;
use crate::view::Region;

/// Alert shown when a new event becomes current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NewEvent,

    /// The new event asks the learner to grade something.
    NewEvaluation,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewEvent => f.write_str("New Event"),
            Self::NewEvaluation => f.write_str("New Evaluation"),
        }
    }
}

/// What changed when the current event moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub current: EventId,
    pub previous: Option<EventId>,
    pub status: Status,

    /// Headers to redraw: the previous event's (if any), then the new one's.
    pub regions: Vec<Region>,
}

#[derive(Debug, Default)]
pub struct HighlightController {
    current: Option<EventId>,
}

impl HighlightController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The event this controller last highlighted.
    pub fn current(&self) -> Option<EventId> {
        self.current
    }

    /// Moves the highlight to the event current at `now`.
    ///
    /// Returns `None` when nothing changes: no event has executed yet, or
    /// the current event is the one already highlighted.
    pub fn tick(&mut self, timeline: &mut Timeline, now: i64) -> Option<Change> {
        let event = timeline.current_event_as_of(now)?;
        if self.current == Some(event.id) {
            return None;
        }

        let id = event.id;
        let status = if event.evaluations.is_empty() {
            Status::NewEvent
        } else {
            Status::NewEvaluation
        };

        let previous = self.current.replace(id);
        let mut regions = Vec::with_capacity(2);
        if let Some(prev) = previous {
            regions.extend(timeline.unhighlight(prev));
        }
        regions.extend(timeline.highlight(id));

        Some(Change {
            current: id,
            previous,
            status,
            regions,
        })
    }
}
