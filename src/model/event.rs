//! Event: one timestamped step of the script.

use super::{EventId, Evaluations, Properties, Time};

/// Something that happens at a fixed point in the simulation.
///
/// An event refers to its incident by number; the incident itself lives in
/// the [`IncidentRegistry`](crate::incidents::IncidentRegistry).
#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,

    /// When the event executes.
    pub time: Time,

    pub incident: u32,
    pub properties: Properties,
    pub evaluations: Evaluations,

    pub expanded: bool,
    pub highlighted: bool,
}

impl Event {
    pub fn new(
        id: EventId,
        time: Time,
        incident: u32,
        properties: Properties,
        evaluations: Evaluations,
    ) -> Self {
        Self {
            id,
            time,
            incident,
            properties,
            evaluations,
            expanded: true,
            highlighted: false,
        }
    }

    /// Flips between expanded and collapsed. The nested groups keep their
    /// own state; a collapsed event simply doesn't show them.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}
