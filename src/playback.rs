//! Playback: the clock driving the highlight over a loaded script.
//!
//! [`Playback`] owns the state and performs one tick at a time, so tests can
//! step it directly. [`Scheduler`] repeats those ticks on an interval until
//! it runs out of ticks or is stopped.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::clock::Clock;
use crate::highlight::{HighlightController, Status};
use crate::incidents::IncidentRegistry;
use crate::model::format_seconds;
use crate::script::Script;
use crate::storage::StorageError;
use crate::timeline::Timeline;
use crate::view::Surface;

/// Errors that stop a playback run.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("display error: {0}")]
    Surface(#[from] io::Error),

    #[error("failed to save clock: {0}")]
    Persist(#[from] StorageError),
}

/// A loaded script being played back.
pub struct Playback {
    pub timeline: Timeline,
    pub incidents: IncidentRegistry,
    clock: Clock,
    highlight: HighlightController,
}

impl Playback {
    pub fn new(script: Script, clock: Clock) -> Self {
        Self {
            timeline: script.timeline,
            incidents: script.incidents,
            clock,
            highlight: HighlightController::new(),
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Brings the highlight in line with the clock without advancing it.
    pub fn sync(&mut self, surface: &mut dyn Surface) -> io::Result<Option<Status>> {
        let now = self.clock.current_time();
        surface.clock(now)?;
        self.update_highlight(now, surface)
    }

    /// Advances the clock one second, then moves the highlight if a new
    /// event has executed.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> io::Result<Option<Status>> {
        let now = self.clock.tick();
        surface.clock(now)?;
        self.update_highlight(now, surface)
    }

    /// Winds the clock back to zero and clears the highlight.
    pub fn restart(&mut self) {
        self.clock.reset();
        if let Some(id) = self.highlight.current() {
            self.timeline.unhighlight(id);
        }
        self.highlight = HighlightController::new();
    }

    fn update_highlight(
        &mut self,
        now: i64,
        surface: &mut dyn Surface,
    ) -> io::Result<Option<Status>> {
        let Some(change) = self.highlight.tick(&mut self.timeline, now) else {
            return Ok(None);
        };
        log::debug!(
            "{} at {}: highlight {:?} -> {}",
            change.status,
            format_seconds(now),
            change.previous,
            change.current
        );
        surface.status(change.status)?;
        for region in change.regions {
            surface.refresh(region, &self.timeline, &self.incidents)?;
        }
        Ok(Some(change.status))
    }
}

/// Asks a [`Scheduler`] to stop, from a tick callback or another thread.
///
/// The tick in progress always completes. A stop requested before the run
/// starts is kept, and that run ends right after the initial sync. Each run
/// clears the request when it returns.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Repeats playback ticks on a fixed interval.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    limit: Option<u64>,
    stop_requested: Arc<AtomicBool>,
}

impl Scheduler {
    /// A scheduler ticking every `interval`, for at most `limit` ticks
    /// (forever when `None`).
    pub fn new(interval: Duration, limit: Option<u64>) -> Self {
        Self {
            interval,
            limit,
            stop_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop_requested))
    }

    fn should_stop(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Runs on the wall clock. See [`Scheduler::run_with`].
    pub fn run<F>(
        &self,
        playback: &mut Playback,
        surface: &mut dyn Surface,
        on_tick: F,
    ) -> Result<u64, PlaybackError>
    where
        F: FnMut(&Playback) -> Result<(), StorageError>,
    {
        self.run_with(playback, surface, on_tick, thread::sleep)
    }

    /// Syncs the highlight, then ticks until the limit is reached or the
    /// scheduler is stopped. `on_tick` runs after every tick, once the
    /// highlight is settled. Returns the number of ticks performed.
    pub fn run_with<F, S>(
        &self,
        playback: &mut Playback,
        surface: &mut dyn Surface,
        mut on_tick: F,
        mut sleep: S,
    ) -> Result<u64, PlaybackError>
    where
        F: FnMut(&Playback) -> Result<(), StorageError>,
        S: FnMut(Duration),
    {
        let result = self.drive(playback, surface, &mut on_tick, &mut sleep);
        self.stop_requested.store(false, Ordering::SeqCst);
        result
    }

    fn drive(
        &self,
        playback: &mut Playback,
        surface: &mut dyn Surface,
        on_tick: &mut dyn FnMut(&Playback) -> Result<(), StorageError>,
        sleep: &mut dyn FnMut(Duration),
    ) -> Result<u64, PlaybackError> {
        playback.sync(surface)?;

        let mut ticks = 0;
        while !self.should_stop() && self.limit.is_none_or(|limit| ticks < limit) {
            sleep(self.interval);
            if self.should_stop() {
                break;
            }
            playback.tick(surface)?;
            ticks += 1;
            on_tick(playback)?;
        }
        Ok(ticks)
    }
}
