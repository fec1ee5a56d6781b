use std::time::Duration;
use tokio::time::Instant;

const WINDOW: Duration = Duration::from_millis(500);

/// Frame-rate estimate refreshed every half second.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    frames: u32,
    window_start: Instant,
    fps: u32,
}

impl FpsMeter {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            fps: 0,
        }
    }

    /// Count a frame and return the latest estimate.
    pub fn frame(&mut self, now: Instant) -> u32 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= WINDOW {
            let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
            self.fps = (self.frames as f64 / elapsed_ms * 1000.0).round() as u32;
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }

    /// Start a fresh window at `now`, keeping the last estimate.
    pub fn restart(&mut self, now: Instant) {
        self.frames = 0;
        self.window_start = now;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
