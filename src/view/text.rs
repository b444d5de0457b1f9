//! Plain-text rendering of incidents and events.

use std::fmt::Write;

use crate::model::{Content, Evaluation, Evaluations, Event, Incident, Properties};

const INDENT: &str = "    ";

fn expand_symbol(expanded: bool) -> &'static str {
    if expanded { "–" } else { "+" }
}

/// An incident header and, when expanded, its summary.
pub fn render_incident(incident: &Incident) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Time: {}  {}  {}",
        expand_symbol(incident.expanded),
        incident.time,
        incident.number,
        incident.title
    );
    if incident.expanded {
        for line in incident.summary.lines() {
            let _ = writeln!(out, "{INDENT}{line}");
        }
    }
    out
}

/// An event header and, when expanded, its properties and evaluations.
///
/// `incident` is `None` only if the event's incident is missing from the
/// registry, in which case the number is shown without a title.
pub fn render_event(event: &Event, incident: Option<&Incident>) -> String {
    let mut out = String::new();
    let marker = if event.highlighted { "▶ " } else { "" };
    let title = incident.map_or("", |i| i.title.as_str());
    let _ = writeln!(
        out,
        "{marker}{} Time: {}  {}  {}",
        expand_symbol(event.expanded),
        event.time,
        event.incident,
        title
    );

    if event.expanded {
        render_properties(&mut out, &event.properties);
        render_evaluations(&mut out, &event.evaluations);
    }
    out
}

fn render_properties(out: &mut String, properties: &Properties) {
    if properties.is_empty() {
        return;
    }
    let _ = writeln!(out, "{INDENT}{} Properties", expand_symbol(properties.expanded));
    if !properties.expanded {
        return;
    }
    for property in &properties.items {
        let _ = writeln!(out, "{INDENT}{INDENT}{}", property.kind);
        render_content(out, &property.content, 3);
    }
}

fn render_evaluations(out: &mut String, evaluations: &Evaluations) {
    if evaluations.is_empty() {
        return;
    }
    let _ = writeln!(out, "{INDENT}{} Evaluations", expand_symbol(evaluations.expanded));
    if !evaluations.expanded {
        return;
    }
    for evaluation in &evaluations.items {
        render_evaluation(out, evaluation);
    }
}

fn render_evaluation(out: &mut String, evaluation: &Evaluation) {
    let pad = INDENT.repeat(3);
    let _ = writeln!(
        out,
        "{INDENT}{INDENT}[{}] {} Evaluation",
        evaluation.id, evaluation.kind
    );
    render_content(out, &evaluation.content, 3);

    let response = if evaluation.text.is_empty() {
        "(none)"
    } else {
        evaluation.text.as_str()
    };
    let _ = writeln!(out, "{pad}Response: {response}");
    match evaluation.rating {
        Some(rating) => {
            let _ = writeln!(out, "{pad}Rating:   {rating}");
        }
        None => {
            let _ = writeln!(out, "{pad}Rating:   unset");
        }
    }
}

fn render_content(out: &mut String, content: &Content, depth: usize) {
    let pad = INDENT.repeat(depth);
    match content {
        Content::Text(text) => {
            let _ = writeln!(out, "{pad}{text}");
        }
        Content::Pairs(pairs) => {
            let width = pairs.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
            for (label, value) in pairs {
                let _ = writeln!(out, "{pad}{label:<width$}  {value}");
            }
        }
    }
}
