use crate::attempt::{Attempt, AttemptPhase};
use crate::error::SensorError;
use crate::platform::TiltEventPlatform;
use crate::types::{OrientationReading, PermissionState, TiltEvent, START_TIMEOUT};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Events needed before the tilt-event source counts as live, zeros included.
const MIN_START_EVENTS: u32 = 3;
/// All-zero events ignored at start-up before a flat device is believed.
const ZERO_GRACE_EVENTS: u32 = 5;

/// Gate for early tilt events.
///
/// Some platforms fire zero or empty events before the sensor is ready. Readings are
/// accepted once a nonzero angle arrives, or once more than `ZERO_GRACE_EVENTS`
/// events have been seen so a device lying flat still registers.
#[derive(Debug, Default)]
pub struct TiltEventFilter {
    events: u32,
    has_real_data: bool,
}

impl TiltEventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an event and return the reading to publish, if any.
    pub fn accept(&mut self, event: &TiltEvent) -> Option<OrientationReading> {
        self.events = self.events.saturating_add(1);

        if !self.has_real_data
            && (is_nonzero(event.gamma)
                || is_nonzero(event.beta)
                || self.events > ZERO_GRACE_EVENTS)
        {
            self.has_real_data = true;
        }
        if !self.has_real_data {
            return None;
        }

        let reading =
            OrientationReading::new(event.gamma.unwrap_or(0.0), event.beta.unwrap_or(0.0));
        if reading.primary_deg.is_nan() || reading.secondary_deg.is_nan() {
            return None;
        }
        Some(reading)
    }

    /// Total events seen, accepted or not.
    pub fn events(&self) -> u32 {
        self.events
    }

    pub fn has_real_data(&self) -> bool {
        self.has_real_data
    }
}

fn is_nonzero(angle: Option<f64>) -> bool {
    angle.is_some_and(|a| a != 0.0 && !a.is_nan())
}

/// Attach the tilt-event listeners and wait until the source proves live.
///
/// Succeeds after `MIN_START_EVENTS` events. If `START_TIMEOUT` passes first, the
/// attempt fails only when no event arrived at all.
pub(crate) async fn start<P: TiltEventPlatform>(
    platform: &mut P,
    readings: &watch::Sender<OrientationReading>,
) -> Result<(mpsc::UnboundedReceiver<TiltEvent>, TiltEventFilter), SensorError> {
    let mut attempt = Attempt::new("tilt-events");

    if !platform.is_available() {
        return Err(attempt.fail(SensorError::CapabilityUnavailable("DeviceOrientationEvent")));
    }

    if platform.requires_permission_request() {
        attempt.advance(AttemptPhase::AwaitingPermission);
        match platform.request_permission().await {
            Ok(PermissionState::Granted) => {}
            Ok(state) => {
                return Err(attempt.fail(SensorError::PermissionDenied(format!(
                    "tilt events ({state:?})"
                ))));
            }
            Err(e) => return Err(attempt.fail(e)),
        }
    }

    attempt.advance(AttemptPhase::AwaitingFirstReading);
    let mut events = platform.attach().map_err(|e| attempt.fail(e))?;
    let mut filter = TiltEventFilter::new();

    let timeout = tokio::time::sleep(START_TIMEOUT);
    tokio::pin!(timeout);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    if let Some(reading) = filter.accept(&event) {
                        readings.send_replace(reading);
                    }
                    if filter.events() >= MIN_START_EVENTS {
                        attempt.succeed();
                        return Ok((events, filter));
                    }
                }
                None => {
                    detach_quietly(platform);
                    return Err(attempt.fail(SensorError::Platform(
                        "tilt event listener closed".into(),
                    )));
                }
            },
            _ = &mut timeout => {
                if filter.events() == 0 {
                    detach_quietly(platform);
                    return Err(attempt.fail(SensorError::Timeout(START_TIMEOUT)));
                }
                tracing::debug!(
                    events = filter.events(),
                    "Tilt events slow to arrive, accepting source"
                );
                attempt.succeed();
                return Ok((events, filter));
            }
        }
    }
}

/// Background task: keep filtering and publishing tilt events until the listener goes away.
pub(crate) async fn forward(
    mut events: mpsc::UnboundedReceiver<TiltEvent>,
    mut filter: TiltEventFilter,
    readings: Arc<watch::Sender<OrientationReading>>,
) {
    while let Some(event) = events.recv().await {
        match filter.accept(&event) {
            Some(reading) => {
                readings.send_replace(reading);
            }
            None => tracing::trace!(?event, "Ignoring tilt event"),
        }
        if filter.events() % 1000 == 0 {
            tracing::debug!(events = filter.events(), "Tilt events processed");
        }
    }
    tracing::debug!("Tilt event stream ended");
}

fn detach_quietly<P: TiltEventPlatform>(platform: &mut P) {
    if let Err(e) = platform.detach() {
        tracing::debug!(%e, "Failed to detach tilt listeners");
    }
}
