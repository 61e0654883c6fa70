use std::time::{Duration, Instant};

/// Convenience struct for time measurement. Starts counting when created.
pub struct StopWatch {
    start: Instant,
}

impl StopWatch {
    pub fn new() -> StopWatch {
        StopWatch {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

impl Default for StopWatch {
    fn default() -> Self {
        StopWatch::new()
    }
}
