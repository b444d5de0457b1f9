//! The simulation clock: elapsed seconds since the script started.

/// Counts simulation seconds. Advances one second per [`Clock::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    seconds: i64,
}

impl Clock {
    /// A clock picking up where a previous run stopped.
    pub fn resume_at(seconds: i64) -> Self {
        Self { seconds }
    }

    /// Advances one second and returns the new time.
    pub fn tick(&mut self) -> i64 {
        self.seconds = self.seconds.saturating_add(1);
        self.seconds
    }

    pub fn current_time(&self) -> i64 {
        self.seconds
    }

    pub fn reset(&mut self) {
        self.seconds = 0;
    }
}
