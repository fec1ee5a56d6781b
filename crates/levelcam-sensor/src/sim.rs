//! In-process sensor platforms for development and tests.
//!
//! Each simulated platform is created together with a [`SensorFeed`]. Events pushed
//! into the feed are buffered until the platform is started, then delivered in order.

use crate::error::SensorError;
use crate::platform::{AbsoluteOrientationPlatform, TiltEventPlatform};
use crate::types::{AbsoluteEvent, PermissionFacet, PermissionState, SensorOptions, TiltEvent};
use std::future::{ready, Future};
use tokio::sync::mpsc;

/// Sending half of a simulated sensor.
#[derive(Debug, Clone)]
pub struct SensorFeed<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> SensorFeed<E> {
    /// Queue an event. Returns `false` once the platform side has been dropped.
    pub fn push(&self, event: E) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Simulated quaternion orientation sensor.
pub struct SimulatedAbsoluteSensor {
    available: bool,
    queries_supported: bool,
    denied: Option<PermissionFacet>,
    start_error: Option<SensorError>,
    events: Option<mpsc::UnboundedReceiver<AbsoluteEvent>>,
    options: Option<SensorOptions>,
    stopped: bool,
}

impl SimulatedAbsoluteSensor {
    pub fn new() -> (Self, SensorFeed<AbsoluteEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sensor = Self {
            available: true,
            queries_supported: true,
            denied: None,
            start_error: None,
            events: Some(rx),
            options: None,
            stopped: false,
        };
        (sensor, SensorFeed { tx })
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Make permission queries fail as unsupported.
    pub fn set_permission_queries_supported(&mut self, supported: bool) {
        self.queries_supported = supported;
    }

    pub fn deny(&mut self, facet: PermissionFacet) {
        self.denied = Some(facet);
    }

    /// Make construction of the sensor session fail.
    pub fn fail_start(&mut self, error: SensorError) {
        self.start_error = Some(error);
    }

    pub fn is_started(&self) -> bool {
        self.options.is_some()
    }

    /// Options the session was started with.
    pub fn options(&self) -> Option<SensorOptions> {
        self.options
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl AbsoluteOrientationPlatform for SimulatedAbsoluteSensor {
    fn is_available(&self) -> bool {
        self.available
    }

    fn query_permission(
        &self,
        facet: PermissionFacet,
    ) -> impl Future<Output = Result<PermissionState, SensorError>> + Send {
        let result = if !self.queries_supported {
            Err(SensorError::CapabilityUnavailable("permissions query"))
        } else if self.denied == Some(facet) {
            Ok(PermissionState::Denied)
        } else {
            Ok(PermissionState::Granted)
        };
        ready(result)
    }

    fn start(
        &mut self,
        options: SensorOptions,
    ) -> Result<mpsc::UnboundedReceiver<AbsoluteEvent>, SensorError> {
        if let Some(error) = self.start_error.clone() {
            return Err(error);
        }
        let events = self
            .events
            .take()
            .ok_or_else(|| SensorError::Platform("sensor already started".into()))?;
        self.options = Some(options);
        self.stopped = false;
        Ok(events)
    }

    fn stop(&mut self) -> Result<(), SensorError> {
        if !self.is_started() {
            return Err(SensorError::Platform("sensor was never started".into()));
        }
        self.stopped = true;
        Ok(())
    }
}

/// Simulated legacy tilt-event surface.
pub struct SimulatedTiltSource {
    available: bool,
    permission: Option<PermissionState>,
    events: Option<mpsc::UnboundedReceiver<TiltEvent>>,
    attached: bool,
    detached: bool,
}

impl SimulatedTiltSource {
    pub fn new() -> (Self, SensorFeed<TiltEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            available: true,
            permission: None,
            events: Some(rx),
            attached: false,
            detached: false,
        };
        (source, SensorFeed { tx })
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Gate events behind a permission request that answers with `answer`.
    pub fn require_permission(&mut self, answer: PermissionState) {
        self.permission = Some(answer);
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

impl TiltEventPlatform for SimulatedTiltSource {
    fn is_available(&self) -> bool {
        self.available
    }

    fn requires_permission_request(&self) -> bool {
        self.permission.is_some()
    }

    fn request_permission(
        &mut self,
    ) -> impl Future<Output = Result<PermissionState, SensorError>> + Send {
        ready(Ok(self.permission.unwrap_or(PermissionState::Granted)))
    }

    fn attach(&mut self) -> Result<mpsc::UnboundedReceiver<TiltEvent>, SensorError> {
        let events = self
            .events
            .take()
            .ok_or_else(|| SensorError::Platform("listeners already attached".into()))?;
        self.attached = true;
        Ok(events)
    }

    fn detach(&mut self) -> Result<(), SensorError> {
        if !self.attached {
            return Err(SensorError::Platform("no listeners attached".into()));
        }
        self.attached = false;
        self.detached = true;
        Ok(())
    }
}
