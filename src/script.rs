//! Authored scripts: the incidents and events a training session plays back.
//!
//! A script is a TOML file:
//!
//! ```toml
//! [[incident]]
//! number = 187
//! time = "00:00:00"
//! title = "Overpass collision"
//! summary = "..."
//!
//! [[event]]
//! time = "00:02:00"
//! incident = 187
//!
//! [[event.property]]
//! kind = "CHP Radio:"
//! data = ["Dispatch:", "14-14 Santa Lucia", "Field:", "go ahead"]
//!
//! [[event.evaluation]]
//! kind = "ATMS"
//! data = ["Expected Action", "Operator viewing cameras in incident area."]
//! ```
//!
//! Everything is validated while loading. A script either loads completely
//! or not at all.

use std::{fs, io, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::incidents::IncidentRegistry;
use crate::model::{
    Content, ContentError, Evaluation, Evaluations, Event, IdAllocator, Incident, Properties,
    Property, Time,
};
use crate::timeline::Timeline;

/// The script compiled into the binary.
const EMBEDDED: &str = include_str!("../data/script.toml");

/// Errors that can occur while loading a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("incident {0} is defined more than once")]
    DuplicateIncident(u32),

    #[error("event #{index} at {time} refers to unknown incident {number}")]
    UnknownIncident { index: usize, time: Time, number: u32 },

    #[error("event #{index} at {time}: {kind}: {source}")]
    MalformedContent {
        index: usize,
        time: Time,
        kind: String,
        #[source]
        source: ContentError,
    },
}

pub type Result<T> = core::result::Result<T, ScriptError>;

// ── File schema ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default, rename = "incident")]
    incidents: Vec<IncidentEntry>,

    #[serde(default, rename = "event")]
    events: Vec<EventEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IncidentEntry {
    number: u32,
    time: Time,
    title: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventEntry {
    time: Time,
    incident: u32,

    #[serde(default, rename = "property")]
    properties: Vec<ContentEntry>,

    #[serde(default, rename = "evaluation")]
    evaluations: Vec<ContentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentEntry {
    kind: String,
    data: Vec<String>,
}

/// A loaded script: the timeline and the incidents it refers to.
#[derive(Debug)]
pub struct Script {
    pub timeline: Timeline,
    pub incidents: IncidentRegistry,
}

impl Script {
    /// Loads the script compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED)
    }

    /// Loads a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses and validates script text.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ScriptFile = toml::from_str(contents)?;
        let script = Self::build(file)?;
        log::info!(
            "loaded script: {} incident(s), {} event(s)",
            script.incidents.len(),
            script.timeline.len()
        );
        Ok(script)
    }

    fn build(file: ScriptFile) -> Result<Self> {
        let mut incidents = IncidentRegistry::new();
        for entry in file.incidents {
            let incident = Incident::new(entry.number, entry.time, entry.title, entry.summary);
            incidents
                .add(incident)
                .map_err(|dup| ScriptError::DuplicateIncident(dup.number))?;
        }

        let mut ids = IdAllocator::default();
        let mut timeline = Timeline::new();
        for (index, entry) in file.events.into_iter().enumerate() {
            if !incidents.contains(entry.incident) {
                return Err(ScriptError::UnknownIncident {
                    index,
                    time: entry.time,
                    number: entry.incident,
                });
            }

            let content = |item: ContentEntry| match Content::from_flat(item.data) {
                Ok(content) => Ok((item.kind, content)),
                Err(source) => Err(ScriptError::MalformedContent {
                    index,
                    time: entry.time,
                    kind: item.kind,
                    source,
                }),
            };

            let mut properties = Vec::with_capacity(entry.properties.len());
            for item in entry.properties {
                let (kind, content) = content(item)?;
                properties.push(Property { kind, content });
            }
            let properties = Properties::new(ids.properties(), properties);

            let mut evaluations = Vec::with_capacity(entry.evaluations.len());
            for item in entry.evaluations {
                let (kind, content) = content(item)?;
                evaluations.push(Evaluation::new(ids.evaluation(), kind, content));
            }
            let evaluations = Evaluations::new(ids.evaluations(), evaluations);

            timeline.add(Event::new(
                ids.event(),
                entry.time,
                entry.incident,
                properties,
                evaluations,
            ));
        }

        Ok(Self {
            timeline,
            incidents,
        })
    }
}
