use crate::level::TiltClass;
use std::fmt;

/// Rotate-and-recenter transform applied to the preview element.
///
/// The translation keeps the element centred on its anchor and never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualTransform {
    pub rotation_deg: f64,
}

impl VisualTransform {
    pub fn new(rotation_deg: f64) -> Self {
        Self { rotation_deg }
    }
}

impl fmt::Display for VisualTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate(-50%, -50%) rotate({}deg)", self.rotation_deg)
    }
}

/// Numbers shown on the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugTelemetry {
    pub fps: u32,
    pub raw_deg: f64,
    pub smoothed_deg: f64,
}

impl fmt::Display for DebugTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FPS: {} | Raw: {:.1}\u{b0} | Smooth: {:.1}\u{b0}",
            self.fps, self.raw_deg, self.smoothed_deg
        )
    }
}

/// Receives the per-frame stabilization output. Calls must not block.
pub trait VisualSink {
    fn set_transform(&mut self, transform: VisualTransform);

    /// Status badge and horizon line.
    fn set_level(&mut self, class: TiltClass);

    /// Bubble position in percent, both axes in `[0, 98]`.
    fn set_bubble(&mut self, x: f64, y: f64);
}

/// Receives debug overlay text while the overlay is on.
pub trait TelemetrySink {
    fn publish(&mut self, telemetry: DebugTelemetry);
}
