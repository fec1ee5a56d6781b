//! Sinks that record everything they are given, for assertions.

use crate::level::TiltClass;
use crate::output::{DebugTelemetry, TelemetrySink, VisualSink, VisualTransform};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct Captured {
    pub transforms: Vec<VisualTransform>,
    pub levels: Vec<TiltClass>,
    pub bubbles: Vec<(f64, f64)>,
    pub telemetry: Vec<DebugTelemetry>,
    pub recorded: u64,
}

#[derive(Clone, Default)]
pub(crate) struct SinkLog(pub Arc<Mutex<Captured>>);

impl VisualSink for SinkLog {
    fn set_transform(&mut self, transform: VisualTransform) {
        self.0.lock().unwrap().transforms.push(transform);
    }

    fn set_level(&mut self, class: TiltClass) {
        self.0.lock().unwrap().levels.push(class);
    }

    fn set_bubble(&mut self, x: f64, y: f64) {
        self.0.lock().unwrap().bubbles.push((x, y));
    }
}

impl TelemetrySink for SinkLog {
    fn publish(&mut self, telemetry: DebugTelemetry) {
        self.0.lock().unwrap().telemetry.push(telemetry);
    }
}
