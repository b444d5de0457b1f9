//! Incident: the traffic incident that events refer to.

use super::Time;

/// A traffic incident, authored once and shared by every event that
/// belongs to it. Only the summary's expand state changes at runtime.
#[derive(Debug, Clone)]
pub struct Incident {
    pub number: u32,

    /// When the incident was first reported.
    pub time: Time,

    pub title: String,
    pub summary: String,

    pub expanded: bool,
}

impl Incident {
    pub fn new(
        number: u32,
        time: Time,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            number,
            time,
            title: title.into(),
            summary: summary.into(),
            expanded: true,
        }
    }

    /// Flips the summary between shown and hidden.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}
