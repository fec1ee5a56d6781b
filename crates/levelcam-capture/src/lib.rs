pub mod raster;
pub mod recording;
pub mod test_pattern;

use levelcam_config::{CameraConfig, CameraFacing};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// A captured video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    /// RGBA8 pixel data.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl CapturedFrame {
    /// Opaque black frame.
    pub fn blank(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; rgba_len(width, height)];
        data.chunks_exact_mut(4).for_each(|px| px[3] = 255);
        Self {
            data,
            width,
            height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

/// Byte length of an RGBA buffer. Sizes come from user config, so this is done in `usize`.
pub(crate) fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Latest frame of a live stream; `None` once the stream's tracks are stopped.
pub type FrameSource = watch::Receiver<Option<Arc<CapturedFrame>>>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera device found")]
    DeviceNotFound,
    #[error("camera error: {0}")]
    Other(String),
}

impl CameraError {
    /// Message shown to the user. The user has to retry; nothing retries automatically.
    pub fn user_message(&self) -> String {
        match self {
            CameraError::PermissionDenied => {
                "Camera access was denied. Allow camera access and tap Start again.".into()
            }
            CameraError::DeviceNotFound => "No camera was found on this device.".into(),
            CameraError::Other(detail) => format!("Could not start the camera: {detail}"),
        }
    }
}

/// What the preview asks the camera for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    pub facing: CameraFacing,
    pub ideal_width: u32,
    pub ideal_height: u32,
    /// Audio is never requested.
    pub audio: bool,
}

impl CameraConstraints {
    /// Rear camera at the preferred resolution.
    pub fn rear(config: &CameraConfig) -> Self {
        Self {
            facing: CameraFacing::Environment,
            ideal_width: config.ideal_width,
            ideal_height: config.ideal_height,
            audio: false,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            facing: config.facing,
            ..Self::rear(config)
        }
    }
}

/// A live camera stream.
pub trait VideoStream: Send {
    fn frames(&self) -> FrameSource;

    /// Number of hardware tracks backing the stream.
    fn track_count(&self) -> usize;

    fn stop_track(&mut self, index: usize) -> Result<(), CameraError>;
}

/// Platform media-capture entry point.
pub trait CameraProvider: Send {
    type Stream: VideoStream;

    fn acquire(
        &mut self,
        constraints: CameraConstraints,
    ) -> impl Future<Output = Result<Self::Stream, CameraError>> + Send;
}

/// Stop every track of `stream`, continuing past failures. Returns how many stopped cleanly.
pub fn release<S: VideoStream + ?Sized>(stream: &mut S) -> usize {
    let mut stopped = 0;
    for index in 0..stream.track_count() {
        match stream.stop_track(index) {
            Ok(()) => stopped += 1,
            Err(e) => tracing::debug!(index, %e, "Failed to stop camera track"),
        }
    }
    tracing::info!(stopped, "Camera released");
    stopped
}
