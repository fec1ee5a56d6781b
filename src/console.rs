use levelcam_stabilizer::{DebugTelemetry, TelemetrySink, TiltClass, VisualSink, VisualTransform};
use tracing::{info, trace};

/// Logs telemetry every this many frames (about twice a second at 60 Hz).
const TELEMETRY_EVERY: u64 = 30;

/// Preview output for the headless app: status changes are logged, the rest traced.
pub struct ConsoleView {
    level: Option<TiltClass>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self { level: None }
    }
}

impl VisualSink for ConsoleView {
    fn set_transform(&mut self, transform: VisualTransform) {
        trace!(%transform, "Preview transform");
    }

    fn set_level(&mut self, class: TiltClass) {
        if self.level != Some(class) {
            info!(status = class.label(), style = class.style(), "Level status");
            self.level = Some(class);
        }
    }

    fn set_bubble(&mut self, x: f64, y: f64) {
        trace!(x, y, "Bubble");
    }
}

/// Debug overlay for the headless app.
pub struct ConsoleTelemetry {
    frames: u64,
}

impl ConsoleTelemetry {
    pub fn new() -> Self {
        Self { frames: 0 }
    }
}

impl TelemetrySink for ConsoleTelemetry {
    fn publish(&mut self, telemetry: DebugTelemetry) {
        self.frames += 1;
        if self.frames % TELEMETRY_EVERY == 0 {
            info!("{telemetry}");
        }
    }
}
