use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Render loop and output options.
    pub stabilizer: StabilizerConfig,
    /// Camera stream request.
    pub camera: CameraConfig,
    /// Simulated handheld device used by the headless app.
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Low-pass smoothing of the tilt angle. Off means raw pass-through.
    pub smoothing_enabled: bool,
    /// Publish FPS / raw / smoothed telemetry every frame.
    pub debug_overlay: bool,
    /// Render cadence in frames per second.
    pub frame_rate_hz: u32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            smoothing_enabled: true,
            debug_overlay: false,
            frame_rate_hz: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Preferred frame width in pixels.
    pub ideal_width: u32,
    /// Preferred frame height in pixels.
    pub ideal_height: u32,
    pub facing: CameraFacing,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: 1920,
            ideal_height: 1080,
            facing: CameraFacing::Environment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// Rear camera.
    Environment,
    /// Front (selfie) camera.
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Whether the quaternion sensor is offered. Off exercises the tilt-event fallback.
    pub primary_sensor_available: bool,
    /// Peak left/right wobble in degrees.
    pub tilt_amplitude_deg: f64,
    /// Wobble period in seconds.
    pub tilt_period_secs: f64,
    /// Peak per-sample jitter in degrees.
    pub noise_deg: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            primary_sensor_available: true,
            tilt_amplitude_deg: 8.0,
            tilt_period_secs: 4.0,
            noise_deg: 0.6,
        }
    }
}
