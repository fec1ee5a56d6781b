mod absolute;
mod attempt;
pub mod error;
pub mod euler;
mod legacy;
pub mod platform;
pub mod sim;
pub mod types;

pub use attempt::AttemptPhase;
pub use error::{MotionError, SensorError};
pub use legacy::TiltEventFilter;
pub use platform::{AbsoluteOrientationPlatform, TiltEventPlatform};
pub use types::*;

use std::sync::Arc;
use tokio::sync::watch;

/// Device orientation acquired from whichever sensor surface is available.
///
/// `enable` tries the quaternion sensor first and falls back to legacy tilt events.
/// The live source's task is the only writer of the published reading.
pub struct OrientationClient<A, T> {
    absolute: A,
    tilt: T,
    state: SensorSessionState,
    orientation_tx: Arc<watch::Sender<OrientationReading>>,
    orientation_rx: watch::Receiver<OrientationReading>,
    feed: Option<tokio::task::JoinHandle<()>>,
}

impl<A, T> OrientationClient<A, T>
where
    A: AbsoluteOrientationPlatform,
    T: TiltEventPlatform,
{
    pub fn new(absolute: A, tilt: T) -> Self {
        let (orientation_tx, orientation_rx) = watch::channel(OrientationReading::default());
        Self {
            absolute,
            tilt,
            state: SensorSessionState::None,
            orientation_tx: Arc::new(orientation_tx),
            orientation_rx,
            feed: None,
        }
    }

    /// Start an orientation source. Must be called from a user gesture.
    ///
    /// Calling again while a source is live does nothing. On failure the client
    /// stays in `SensorSessionState::None`.
    pub async fn enable(&mut self) -> Result<SensorSessionState, MotionError> {
        if self.state.is_active() {
            tracing::debug!(state = ?self.state, "Orientation already enabled");
            return Ok(self.state);
        }

        let primary = match absolute::start(&mut self.absolute, &self.orientation_tx).await {
            Ok(events) => {
                self.feed = Some(tokio::spawn(absolute::forward(
                    events,
                    self.orientation_tx.clone(),
                )));
                self.state = SensorSessionState::GenericSensor;
                return Ok(self.state);
            }
            Err(e) => e,
        };

        match legacy::start(&mut self.tilt, &self.orientation_tx).await {
            Ok((events, filter)) => {
                self.feed = Some(tokio::spawn(legacy::forward(
                    events,
                    filter,
                    self.orientation_tx.clone(),
                )));
                self.state = SensorSessionState::DeviceOrientation;
                Ok(self.state)
            }
            Err(fallback) => {
                let error = MotionError { primary, fallback };
                tracing::warn!(%error, "Motion sensors unavailable");
                Err(error)
            }
        }
    }

    pub fn state(&self) -> SensorSessionState {
        self.state
    }

    /// Latest reading (non-blocking).
    pub fn orientation(&self) -> OrientationReading {
        *self.orientation_rx.borrow()
    }

    /// Receiver for the render loop.
    pub fn subscribe(&self) -> watch::Receiver<OrientationReading> {
        self.orientation_rx.clone()
    }

    pub fn absolute(&self) -> &A {
        &self.absolute
    }

    pub fn tilt(&self) -> &T {
        &self.tilt
    }

    /// Stop the forwarding task, stop the sensor and detach listeners.
    ///
    /// Every step runs even when an earlier one fails; failures are only logged.
    pub fn shutdown(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.abort();
        }
        if self.state == SensorSessionState::GenericSensor {
            if let Err(e) = self.absolute.stop() {
                tracing::debug!(%e, "Orientation sensor stop failed");
            }
        }
        if let Err(e) = self.tilt.detach() {
            tracing::debug!(%e, "Tilt listener detach failed");
        }
        self.state = SensorSessionState::None;
        tracing::info!("Orientation sources released");
    }
}
