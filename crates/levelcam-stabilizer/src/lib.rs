pub mod bubble;
pub mod calibration;
pub mod controller;
pub mod filter;
pub mod fps;
pub mod level;
pub mod output;
pub mod render_loop;
pub mod stabilizer;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{EnableError, MotionController};
pub use level::TiltClass;
pub use output::{DebugTelemetry, TelemetrySink, VisualSink, VisualTransform};
pub use render_loop::{RenderLoop, StabilizerCommand};
pub use stabilizer::{FrameOutput, Stabilizer};
