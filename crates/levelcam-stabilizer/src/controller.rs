use crate::render_loop::{RenderLoop, StabilizerCommand};
use crate::stabilizer::Stabilizer;
use levelcam_sensor::{
    AbsoluteOrientationPlatform, MotionError, OrientationClient, SensorSessionState,
    TiltEventPlatform,
};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnableError {
    #[error(transparent)]
    Motion(#[from] MotionError),
    #[error("motion controller has been torn down")]
    TornDown,
}

impl EnableError {
    /// Message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            EnableError::Motion(e) => e.user_message(),
            EnableError::TornDown => "Stabilization has stopped. Restart to use it again.",
        }
    }
}

/// Ties the orientation sources to the render loop.
///
/// Commands issued before motion is enabled apply to the stabilizer directly; after
/// that they are queued to the render loop and take effect between frames.
pub struct MotionController<A, T> {
    sensors: OrientationClient<A, T>,
    pending: Option<Stabilizer>,
    render: Option<RenderLoop>,
    frame_rate_hz: u32,
    torn_down: bool,
}

impl<A, T> MotionController<A, T>
where
    A: AbsoluteOrientationPlatform,
    T: TiltEventPlatform,
{
    pub fn new(
        sensors: OrientationClient<A, T>,
        stabilizer: Stabilizer,
        frame_rate_hz: u32,
    ) -> Self {
        Self {
            sensors,
            pending: Some(stabilizer),
            render: None,
            frame_rate_hz,
            torn_down: false,
        }
    }

    /// Enable an orientation source and start the render loop. Call from a user gesture.
    ///
    /// A second call while a source is live changes nothing. On failure nothing is
    /// started and the caller should show `EnableError::user_message`. After
    /// `teardown` no sensor is touched.
    pub async fn enable_motion(&mut self) -> Result<SensorSessionState, EnableError> {
        if self.torn_down {
            return Err(EnableError::TornDown);
        }
        let state = self.sensors.enable().await?;
        if self.render.is_none() {
            if let Some(stabilizer) = self.pending.take() {
                self.render = Some(RenderLoop::spawn(
                    stabilizer,
                    self.sensors.subscribe(),
                    self.frame_rate_hz,
                ));
            }
        }
        Ok(state)
    }

    pub fn state(&self) -> SensorSessionState {
        self.sensors.state()
    }

    pub fn is_rendering(&self) -> bool {
        self.render.as_ref().is_some_and(RenderLoop::is_running)
    }

    pub fn sensors(&self) -> &OrientationClient<A, T> {
        &self.sensors
    }

    pub fn send(&mut self, command: StabilizerCommand) {
        match (&self.render, &mut self.pending) {
            (Some(render), _) => render.send(command),
            (None, Some(stabilizer)) => command.apply(stabilizer),
            (None, None) => tracing::debug!(?command, "Ignoring command after teardown"),
        }
    }

    pub fn calibrate(&mut self) {
        self.send(StabilizerCommand::Calibrate);
    }

    pub fn set_smoothing(&mut self, enabled: bool) {
        self.send(StabilizerCommand::SetSmoothing(enabled));
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.send(StabilizerCommand::SetDebug(enabled));
    }

    pub fn set_recording(&mut self, recording: bool) {
        self.send(StabilizerCommand::SetRecording(recording));
    }

    /// Stop the render loop, then release the orientation sources.
    ///
    /// Each step runs regardless of how the previous one went. The controller
    /// cannot render again afterwards.
    pub fn teardown(&mut self) {
        if let Some(render) = self.render.take() {
            render.stop();
        }
        self.pending = None;
        self.torn_down = true;
        self.sensors.shutdown();
    }
}
