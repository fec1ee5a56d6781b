use crate::{
    rgba_len, CameraConstraints, CameraError, CameraProvider, CapturedFrame, FrameSource,
    VideoStream,
};
use std::future::{ready, Future};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Camera that serves a static checkerboard.
///
/// Stands in for the platform media-capture API in the headless app and tests.
#[derive(Debug, Default)]
pub struct TestPatternCamera {
    failure: Option<CameraError>,
}

impl TestPatternCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera whose acquisition always fails with `error`.
    pub fn failing(error: CameraError) -> Self {
        Self {
            failure: Some(error),
        }
    }
}

impl CameraProvider for TestPatternCamera {
    type Stream = TestPatternStream;

    fn acquire(
        &mut self,
        constraints: CameraConstraints,
    ) -> impl Future<Output = Result<TestPatternStream, CameraError>> + Send {
        let result = match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(TestPatternStream::new(
                constraints.ideal_width,
                constraints.ideal_height,
            )),
        };
        ready(result)
    }
}

/// Single-track stream publishing one pre-generated frame.
pub struct TestPatternStream {
    frames: watch::Sender<Option<Arc<CapturedFrame>>>,
    live: bool,
}

impl TestPatternStream {
    pub fn new(width: u32, height: u32) -> Self {
        info!(width, height, "Test pattern camera started");
        let frame = checkerboard(width, height);
        let (frames, _) = watch::channel(Some(Arc::new(frame)));
        Self { frames, live: true }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl VideoStream for TestPatternStream {
    fn frames(&self) -> FrameSource {
        self.frames.subscribe()
    }

    fn track_count(&self) -> usize {
        1
    }

    fn stop_track(&mut self, index: usize) -> Result<(), CameraError> {
        if index != 0 {
            return Err(CameraError::Other(format!("no track {index}")));
        }
        self.live = false;
        self.frames.send_replace(None);
        Ok(())
    }
}

fn checkerboard(width: u32, height: u32) -> CapturedFrame {
    let (r, g, b) = (40u8, 80u8, 160u8);
    let checker_size = 32u32;

    let mut data = Vec::with_capacity(rgba_len(width, height));
    for y in 0..height {
        for x in 0..width {
            let is_light = ((x / checker_size) + (y / checker_size)) % 2 == 0;
            let factor = if is_light { 1.0_f32 } else { 0.7 };
            data.push((r as f32 * factor) as u8);
            data.push((g as f32 * factor) as u8);
            data.push((b as f32 * factor) as u8);
            data.push(255);
        }
    }

    CapturedFrame {
        data,
        width,
        height,
    }
}
