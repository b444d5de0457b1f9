//! Output formatting for CLI display.

use std::fmt::Write;

use crate::incidents::IncidentRegistry;
use crate::model::{Evaluation, format_seconds};
use crate::timeline::Timeline;
use crate::view::{render_event, render_incident};

/// Incidents in load order, skipping the first `offset`, each with the
/// number of events it has in the script.
pub(super) fn format_summary(
    incidents: &IncidentRegistry,
    timeline: &Timeline,
    offset: usize,
) -> String {
    if incidents.is_empty() {
        return "No incidents\n".to_string();
    }
    incidents
        .iter()
        .skip(offset)
        .map(|incident| {
            let count = timeline.events_for_incident(incident.number).count();
            format!("{}    {count} event(s)\n", render_incident(incident))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The clock line followed by every event from `offset` on.
pub(super) fn format_script(
    timeline: &Timeline,
    incidents: &IncidentRegistry,
    now: i64,
    offset: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Clock: {}", format_seconds(now));
    match timeline.highlighted() {
        Some(event) => {
            let _ = writeln!(out, "Current event: {} at {}", event.id, event.time);
        }
        None => {
            let _ = writeln!(out, "Current event: none");
        }
    }

    if offset > 0 {
        let _ = writeln!(out, "({offset} earlier event(s) scrolled past)");
    }
    let _ = writeln!(out);

    for event in timeline.iter().skip(offset) {
        out.push_str(&render_event(event, incidents.get(event.incident)));
        out.push('\n');
    }
    if timeline.is_empty() || offset >= timeline.len() {
        let _ = writeln!(out, "No events");
    }
    out
}

/// A recorded grade, as confirmed after `grade`.
pub(super) fn format_evaluation(evaluation: &Evaluation) -> String {
    let rating = evaluation
        .rating
        .map_or_else(|| "unset".to_string(), |r| r.to_string());
    let response = if evaluation.text.is_empty() {
        "(none)"
    } else {
        evaluation.text.as_str()
    };
    format!(
        "Evaluation {} ({})\n  Rating:   {rating}\n  Response: {response}\n",
        evaluation.id, evaluation.kind
    )
}
