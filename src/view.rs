//! Presentation seam.
//!
//! The core never draws anything itself. State changes come back as
//! [`Region`]s naming what to redraw, and a [`Surface`] decides how. The
//! terminal surface here prints; tests record.

mod text;

use std::io::{self, Write};

use crate::highlight::Status;
use crate::incidents::IncidentRegistry;
use crate::model::{EvaluationsId, EventId, PropertiesId, format_seconds};
use crate::timeline::Timeline;

pub use text::{render_event, render_incident};

/// Part of the display that needs redrawing after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Properties and evaluations under an event header.
    EventBody(EventId),

    /// The header row of an event, where highlight emphasis goes.
    EventHeader(EventId),

    Properties(PropertiesId),
    Evaluations(EvaluationsId),

    /// The summary text of an incident, by number.
    IncidentSummary(u32),
}

impl Region {
    /// Element name the region is drawn into.
    pub fn element(self) -> String {
        match self {
            Self::EventBody(id) => format!("eventData{id}"),
            Self::EventHeader(id) => format!("eventHeader{id}"),
            Self::Properties(id) => format!("properties{id}"),
            Self::Evaluations(id) => format!("evaluations{id}"),
            Self::IncidentSummary(number) => format!("summary{number}"),
        }
    }
}

/// Where playback output goes.
pub trait Surface {
    /// Redraws one region from the current state.
    fn refresh(
        &mut self,
        region: Region,
        timeline: &Timeline,
        incidents: &IncidentRegistry,
    ) -> io::Result<()>;

    /// Shows the running clock.
    fn clock(&mut self, seconds: i64) -> io::Result<()>;

    /// Shows a status alert.
    fn status(&mut self, status: Status) -> io::Result<()>;
}

/// Prints playback to a terminal stream.
///
/// Only highlight changes produce output: the newly current event is
/// printed in full, the event losing the highlight is left as it was.
pub struct TerminalSurface<W> {
    out: W,
    show_clock: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, show_clock: bool) -> Self {
        Self { out, show_clock }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn refresh(
        &mut self,
        region: Region,
        timeline: &Timeline,
        incidents: &IncidentRegistry,
    ) -> io::Result<()> {
        log::trace!("refresh {}", region.element());
        let Region::EventHeader(id) = region else {
            return Ok(());
        };
        let Some(event) = timeline.get(id).filter(|e| e.highlighted) else {
            return Ok(());
        };
        let text = render_event(event, incidents.get(event.incident));
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    fn clock(&mut self, seconds: i64) -> io::Result<()> {
        if self.show_clock {
            writeln!(self.out, "[{}]", format_seconds(seconds))?;
        }
        Ok(())
    }

    fn status(&mut self, status: Status) -> io::Result<()> {
        writeln!(self.out, "*** {status} ***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{Evaluations, Event, IdAllocator, Incident, Properties, Time};

    fn fixture() -> (Timeline, IncidentRegistry, EventId) {
        let mut ids = IdAllocator::default();
        let mut incidents = IncidentRegistry::new();
        incidents
            .add(Incident::new(187, Time::default(), "Overpass", "SB 55."))
            .unwrap();
        let id = ids.event();
        let mut timeline = Timeline::new();
        timeline.add(Event::new(
            id,
            Time::new(0, 1, 0),
            187,
            Properties::new(ids.properties(), vec![]),
            Evaluations::new(ids.evaluations(), vec![]),
        ));
        (timeline, incidents, id)
    }

    #[test]
    fn region_elements() {
        assert_eq!(Region::EventHeader(EventId(3)).element(), "eventHeader3");
        assert_eq!(Region::EventBody(EventId(3)).element(), "eventData3");
        assert_eq!(Region::IncidentSummary(187).element(), "summary187");
    }

    #[test]
    fn terminal_prints_newly_highlighted_event() {
        let (mut timeline, incidents, id) = fixture();
        let mut buf = Vec::new();
        let mut surface = TerminalSurface::new(&mut buf, false);

        let region = timeline.highlight(id).unwrap();
        surface.refresh(region, &timeline, &incidents).unwrap();
        surface.clock(61).unwrap();

        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("00:01:00"));
        assert!(out.contains("Overpass"));
        assert!(!out.contains("[00:01:01]"));
    }

    #[test]
    fn terminal_ignores_unhighlight() {
        let (mut timeline, incidents, id) = fixture();
        let mut buf = Vec::new();
        let mut surface = TerminalSurface::new(&mut buf, true);

        timeline.highlight(id);
        let region = timeline.unhighlight(id).unwrap();
        surface.refresh(region, &timeline, &incidents).unwrap();

        assert!(buf.is_empty());
    }
}
