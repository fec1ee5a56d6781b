use glam::DQuat;
use std::time::Duration;

/// Sampling frequency requested from the quaternion sensor.
pub const SENSOR_FREQUENCY_HZ: f64 = 60.0;

/// How long either source may take to deliver its first data before it is abandoned.
pub const START_TIMEOUT: Duration = Duration::from_secs(2);

/// Latest tilt of the device, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationReading {
    /// Left/right tilt (gamma). Drives the stabilization.
    pub primary_deg: f64,
    /// Front/back tilt (beta). Only feeds the bubble indicator.
    pub secondary_deg: f64,
}

impl OrientationReading {
    pub fn new(primary_deg: f64, secondary_deg: f64) -> Self {
        Self {
            primary_deg,
            secondary_deg,
        }
    }
}

/// Which orientation source is live for this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SensorSessionState {
    #[default]
    None,
    /// Quaternion-based absolute orientation sensor.
    GenericSensor,
    /// Legacy tilt events.
    DeviceOrientation,
}

impl SensorSessionState {
    pub fn is_active(self) -> bool {
        self != SensorSessionState::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

/// Capabilities the quaternion sensor depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionFacet {
    Accelerometer,
    Gyroscope,
    Magnetometer,
}

impl PermissionFacet {
    pub const ALL: [PermissionFacet; 3] = [
        PermissionFacet::Accelerometer,
        PermissionFacet::Gyroscope,
        PermissionFacet::Magnetometer,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFrame {
    Device,
    Screen,
}

/// Construction options for a quaternion sensor session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorOptions {
    pub frequency_hz: f64,
    pub reference_frame: ReferenceFrame,
}

impl Default for SensorOptions {
    fn default() -> Self {
        Self {
            frequency_hz: SENSOR_FREQUENCY_HZ,
            reference_frame: ReferenceFrame::Device,
        }
    }
}

/// Event delivered by a running quaternion sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum AbsoluteEvent {
    Reading(DQuat),
    Error(String),
}

/// Event delivered by the legacy tilt-event surface.
///
/// Angles may be missing on platforms that fire events before the hardware is ready.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TiltEvent {
    /// Left/right tilt in degrees.
    pub gamma: Option<f64>,
    /// Front/back tilt in degrees.
    pub beta: Option<f64>,
    /// Delivered through the "absolute" event variant.
    pub absolute: bool,
}

impl TiltEvent {
    pub fn new(gamma: f64, beta: f64) -> Self {
        Self {
            gamma: Some(gamma),
            beta: Some(beta),
            absolute: false,
        }
    }
}
