use crate::CapturedFrame;

/// Consumer of rotated frames while a recording is running.
///
/// The sink owns encoding, container and saving. The render loop only pushes frames
/// while `is_active` is true and never waits on the sink.
pub trait RecordingSink: Send {
    fn is_active(&self) -> bool;

    fn start(&mut self);

    fn push_frame(&mut self, frame: CapturedFrame);

    /// Stop and hand the recording off for saving.
    fn finish(&mut self);
}

/// Recording sink that keeps frame statistics only.
#[derive(Debug, Default)]
pub struct FrameCounter {
    active: bool,
    frames: u64,
    bytes: u64,
    recordings: u32,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames pushed during the current or last recording.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Completed recordings.
    pub fn recordings(&self) -> u32 {
        self.recordings
    }
}

impl RecordingSink for FrameCounter {
    fn is_active(&self) -> bool {
        self.active
    }

    fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.frames = 0;
        self.bytes = 0;
        tracing::info!("Recording started");
    }

    fn push_frame(&mut self, frame: CapturedFrame) {
        if !self.active {
            return;
        }
        self.frames += 1;
        self.bytes += frame.data.len() as u64;
    }

    fn finish(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.recordings += 1;
        tracing::info!(frames = self.frames, bytes = self.bytes, "Recording finished");
    }
}
