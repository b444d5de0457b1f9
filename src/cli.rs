//! CLI interface for the notebook.
//!
//! Every command loads the script fresh, applies what the session store
//! remembers (clock, scroll offsets, grades), does its work and exits. Only
//! `run` stays up, ticking the clock until it reaches `--ticks` or is
//! interrupted.

mod format;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::clock::Clock;
use crate::config::{Config, ScriptSource};
use crate::highlight::HighlightController;
use crate::incidents::IncidentRegistry;
use crate::model::{EvaluationId, EvaluationsId, EventId, PropertiesId, Time, format_seconds};
use crate::playback::{Playback, Scheduler};
use crate::script::Script;
use crate::storage::{SessionStore, key};
use crate::timeline::{Target, Timeline};
use crate::view::{TerminalSurface, render_event};

use format::{format_evaluation, format_script, format_summary};

/// Shown by `now` before the first event.
const NOTHING_EXECUTED: &str = "No events have been executed yet.";

/// Notebook: replay a scripted traffic-incident exercise.
#[derive(Debug, Parser)]
#[command(name = "notebook", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Script file to play instead of the configured or built-in one.
    #[arg(long, global = true)]
    script: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: a training session
  1. notebook reset
  2. notebook summary
  3. notebook run              (Ctrl-C to pause; the clock is saved every tick)
  4. notebook now
  5. notebook grade 0 --rating 2 --text "Posted CMS sign on SB 55"
  6. notebook script --collapse properties"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the script's incidents with their summaries.
    Summary {
        /// Show incident headers only.
        #[arg(long, conflicts_with = "expand")]
        collapse: bool,

        /// Show every summary, even when configured to start collapsed.
        #[arg(long)]
        expand: bool,

        /// Flip one incident's summary, by incident number. Repeatable.
        #[arg(long)]
        toggle: Vec<u32>,

        /// Skip this many incidents. Remembered for next time.
        #[arg(long)]
        scroll: Option<usize>,
    },

    /// Show the timeline with the current event marked.
    Script {
        /// Clock time to show (HH:MM:SS, MM:SS or seconds). Defaults to the
        /// saved clock.
        #[arg(long)]
        at: Option<Time>,

        /// Collapse these groups before showing.
        #[arg(long, value_enum, conflicts_with = "expand")]
        collapse: Option<CollapseArg>,

        /// Expand these groups before showing.
        #[arg(long, value_enum)]
        expand: Option<CollapseArg>,

        /// Flip one event open or closed, by event ID. Repeatable.
        #[arg(long)]
        toggle: Vec<u32>,

        /// Flip one property group, by group ID. Repeatable.
        #[arg(long)]
        toggle_properties: Vec<u32>,

        /// Flip one evaluation group, by group ID. Repeatable.
        #[arg(long)]
        toggle_evaluations: Vec<u32>,

        /// Skip this many events. Remembered for next time.
        #[arg(long)]
        scroll: Option<usize>,
    },

    /// Show the last event executed by the clock.
    Now {
        /// Clock time to ask about. Defaults to the saved clock.
        #[arg(long)]
        at: Option<Time>,
    },

    /// Start the clock from where it was left, printing events as they
    /// execute.
    Run {
        /// Stop after this many ticks.
        #[arg(long)]
        ticks: Option<u64>,

        /// Milliseconds per tick, overriding the config.
        #[arg(long)]
        tick_millis: Option<u64>,

        /// Start from 00:00:00 instead of the saved clock.
        #[arg(long)]
        restart: bool,

        /// Stop once the last event has executed.
        #[arg(long)]
        stop_at_end: bool,

        /// Print the clock on every tick.
        #[arg(long)]
        show_clock: bool,
    },

    /// Start over: clock and scroll positions back to zero, grades cleared.
    Reset,

    /// Record a response and/or rating for an evaluation.
    Grade {
        /// Evaluation ID, as shown in brackets by `script`.
        evaluation: u32,

        /// Rating from 1 (best) to 5 (worst).
        #[arg(long)]
        rating: Option<u8>,

        /// Free-text response.
        #[arg(long)]
        text: Option<String>,
    },
}

/// CLI-facing expand/collapse target, mapped to the domain `Target`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollapseArg {
    /// Whole events, down to their headers.
    Events,
    /// Property groups.
    Properties,
    /// Evaluation groups.
    Evaluations,
    /// Everything.
    All,
}

impl CollapseArg {
    fn to_domain(self) -> Target {
        match self {
            Self::Events => Target::Events,
            Self::Properties => Target::Properties,
            Self::Evaluations => Target::Evaluations,
            Self::All => Target::All,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, store: &mut SessionStore) -> Result<(), String> {
    let cli = Cli::parse();
    let explicit = cli.script.as_deref();

    match cli.command {
        Command::Summary {
            collapse,
            expand,
            toggle,
            scroll,
        } => {
            let view = SummaryView {
                collapse,
                expand,
                toggle,
            };
            cmd_summary(config, store, explicit, &view, scroll)
        }
        Command::Script {
            at,
            collapse,
            expand,
            toggle,
            toggle_properties,
            toggle_evaluations,
            scroll,
        } => {
            let view = ScriptView {
                collapse,
                expand,
                events: toggle.into_iter().map(EventId).collect(),
                properties: toggle_properties.into_iter().map(PropertiesId).collect(),
                evaluations: toggle_evaluations.into_iter().map(EvaluationsId).collect(),
            };
            cmd_script(config, store, explicit, at, &view, scroll)
        }
        Command::Now { at } => cmd_now(config, store, explicit, at),
        Command::Run {
            ticks,
            tick_millis,
            restart,
            stop_at_end,
            show_clock,
        } => {
            let options = RunOptions {
                ticks,
                tick_millis,
                restart,
                stop_at_end,
                show_clock,
            };
            cmd_run(config, store, explicit, &options)
        }
        Command::Reset => cmd_reset(store),
        Command::Grade {
            evaluation,
            rating,
            text,
        } => cmd_grade(
            config,
            store,
            explicit,
            EvaluationId(evaluation),
            rating,
            text.as_deref(),
        ),
    }
}

/// Load the script from the resolution chain, collapsed as configured and
/// with saved grades applied.
fn load_script(
    config: &Config,
    store: &SessionStore,
    explicit: Option<&Path>,
) -> Result<Script, String> {
    let mut script = match config.script_source(explicit) {
        ScriptSource::File(path) => Script::load(&path).map_err(|e| e.to_string())?,
        ScriptSource::Embedded => {
            Script::embedded().map_err(|e| format!("built-in script is invalid: {e}"))?
        }
    };

    if let Some(target) = config.start_collapsed.target() {
        script.timeline.collapse_all(target);
        if target == Target::All {
            script.incidents.collapse_all();
        }
    }
    store.apply_grades(&mut script.timeline);
    Ok(script)
}

/// Use the given scroll offset and remember it, or fall back to the saved one.
fn scroll_offset(
    store: &mut SessionStore,
    name: &str,
    requested: Option<usize>,
) -> Result<usize, String> {
    match requested {
        Some(offset) => {
            let value = i64::try_from(offset).map_err(|_| "scroll offset too large")?;
            store
                .set_number(name, value)
                .map_err(|e| format!("failed to save scroll position: {e}"))?;
            Ok(offset)
        }
        None => Ok(usize::try_from(store.number(name)).unwrap_or(0)),
    }
}

fn clock_time(store: &SessionStore, at: Option<Time>) -> i64 {
    at.map_or_else(|| store.time(), Time::to_seconds)
}

/// Expand state requested for `summary`.
#[derive(Debug, Default)]
struct SummaryView {
    collapse: bool,
    expand: bool,
    toggle: Vec<u32>,
}

/// Expand state requested for `script`, applied bulk first, then toggles.
#[derive(Debug, Default)]
struct ScriptView {
    collapse: Option<CollapseArg>,
    expand: Option<CollapseArg>,
    events: Vec<EventId>,
    properties: Vec<PropertiesId>,
    evaluations: Vec<EvaluationsId>,
}

#[derive(Debug)]
struct RunOptions {
    ticks: Option<u64>,
    tick_millis: Option<u64>,
    restart: bool,
    stop_at_end: bool,
    show_clock: bool,
}

fn apply_summary_view(
    incidents: &mut IncidentRegistry,
    view: &SummaryView,
) -> Result<(), String> {
    if view.collapse {
        incidents.collapse_all();
    }
    if view.expand {
        incidents.expand_all();
    }
    for &number in &view.toggle {
        incidents
            .toggle(number)
            .ok_or_else(|| format!("no incident numbered {number}"))?;
    }
    Ok(())
}

fn apply_script_view(timeline: &mut Timeline, view: &ScriptView) -> Result<(), String> {
    if let Some(target) = view.collapse {
        timeline.collapse_all(target.to_domain());
    }
    if let Some(target) = view.expand {
        timeline.expand_all(target.to_domain());
    }
    for &id in &view.events {
        timeline
            .toggle_event(id)
            .ok_or_else(|| format!("no event with ID {id}"))?;
    }
    for &id in &view.properties {
        timeline
            .toggle_properties(id)
            .ok_or_else(|| format!("no property group with ID {id}"))?;
    }
    for &id in &view.evaluations {
        timeline
            .toggle_evaluations(id)
            .ok_or_else(|| format!("no evaluation group with ID {id}"))?;
    }
    Ok(())
}

fn cmd_summary(
    config: &Config,
    store: &mut SessionStore,
    explicit: Option<&Path>,
    view: &SummaryView,
    scroll: Option<usize>,
) -> Result<(), String> {
    let mut script = load_script(config, store, explicit)?;
    apply_summary_view(&mut script.incidents, view)?;
    let offset = scroll_offset(store, key::SUMMARY_SCROLL, scroll)?;

    print!(
        "{}",
        format_summary(&script.incidents, &script.timeline, offset)
    );
    Ok(())
}

fn cmd_script(
    config: &Config,
    store: &mut SessionStore,
    explicit: Option<&Path>,
    at: Option<Time>,
    view: &ScriptView,
    scroll: Option<usize>,
) -> Result<(), String> {
    let mut script = load_script(config, store, explicit)?;
    apply_script_view(&mut script.timeline, view)?;

    let now = clock_time(store, at);
    HighlightController::new().tick(&mut script.timeline, now);
    let offset = scroll_offset(store, key::SCRIPT_SCROLL, scroll)?;

    print!(
        "{}",
        format_script(&script.timeline, &script.incidents, now, offset)
    );
    Ok(())
}

fn cmd_now(
    config: &Config,
    store: &SessionStore,
    explicit: Option<&Path>,
    at: Option<Time>,
) -> Result<(), String> {
    let script = load_script(config, store, explicit)?;
    let now = clock_time(store, at);

    match script.timeline.current_event_as_of(now) {
        Some(event) => {
            let incident = script.incidents.get(event.incident);
            print!("{}", render_event(event, incident));
        }
        None => println!("{NOTHING_EXECUTED}"),
    }
    Ok(())
}

fn cmd_run(
    config: &Config,
    store: &mut SessionStore,
    explicit: Option<&Path>,
    options: &RunOptions,
) -> Result<(), String> {
    let script = load_script(config, store, explicit)?;
    let interval = match options.tick_millis {
        Some(0) => return Err("--tick-millis must be greater than zero".to_string()),
        Some(ms) => Duration::from_millis(ms),
        None => config.tick_interval(),
    };

    let mut playback = Playback::new(script, Clock::resume_at(store.time()));
    if options.restart {
        playback.restart();
    }
    let last_event = playback.timeline.iter().last().map(|e| e.time.to_seconds());

    let scheduler = Scheduler::new(interval, options.ticks);
    let stop = scheduler.stop_handle();
    let mut surface = TerminalSurface::new(io::stdout().lock(), options.show_clock);

    eprintln!(
        "Clock started at {}",
        format_seconds(playback.clock().current_time())
    );
    let ran = scheduler
        .run(&mut playback, &mut surface, |p| {
            let now = p.clock().current_time();
            store.set_time(now)?;
            if options.stop_at_end && last_event.is_none_or(|last| now >= last) {
                stop.stop();
            }
            Ok(())
        })
        .map_err(|e| e.to_string())?;

    eprintln!(
        "Clock stopped at {} after {ran} tick(s)",
        format_seconds(playback.clock().current_time())
    );
    Ok(())
}

fn cmd_reset(store: &mut SessionStore) -> Result<(), String> {
    store
        .reset()
        .map_err(|e| format!("failed to reset notebook: {e}"))?;
    eprintln!("Notebook reset: clock at 00:00:00");
    Ok(())
}

fn cmd_grade(
    config: &Config,
    store: &mut SessionStore,
    explicit: Option<&Path>,
    id: EvaluationId,
    rating: Option<u8>,
    text: Option<&str>,
) -> Result<(), String> {
    if rating.is_none() && text.is_none() {
        return Err("specify --rating, --text, or both".to_string());
    }

    let mut script = load_script(config, store, explicit)?;
    let evaluation = script
        .timeline
        .evaluation_mut(id)
        .ok_or_else(|| format!("no evaluation with ID {id}"))?;

    if let Some(value) = rating {
        evaluation.record_rating(value).map_err(|e| e.to_string())?;
    }
    if let Some(text) = text {
        evaluation.record_text(text);
    }

    if let Some(rating) = rating.and(evaluation.rating) {
        store
            .save_rating(id, rating)
            .map_err(|e| format!("failed to save rating: {e}"))?;
    }
    if let Some(text) = text {
        store
            .save_text(id, text)
            .map_err(|e| format!("failed to save response: {e}"))?;
    }

    print!("{}", format_evaluation(evaluation));
    Ok(())
}
