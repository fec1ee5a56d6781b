use crate::stabilizer::Stabilizer;
use levelcam_sensor::OrientationReading;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

/// User actions delivered to the render loop between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizerCommand {
    Calibrate,
    SetSmoothing(bool),
    SetDebug(bool),
    SetRecording(bool),
}

impl StabilizerCommand {
    pub(crate) fn apply(self, stabilizer: &mut Stabilizer) {
        match self {
            StabilizerCommand::Calibrate => stabilizer.calibrate(),
            StabilizerCommand::SetSmoothing(enabled) => stabilizer.set_smoothing(enabled),
            StabilizerCommand::SetDebug(enabled) => stabilizer.set_debug(enabled),
            StabilizerCommand::SetRecording(recording) => stabilizer.set_recording(recording),
        }
    }
}

/// Fixed-cadence render task.
///
/// Ticks independently of the sensor: each frame reads whatever reading was
/// published last. Frames missed while the runtime was busy are skipped, not replayed.
pub struct RenderLoop {
    command_tx: mpsc::UnboundedSender<StabilizerCommand>,
    task: tokio::task::JoinHandle<()>,
}

impl RenderLoop {
    pub fn spawn(
        stabilizer: Stabilizer,
        orientation_rx: watch::Receiver<OrientationReading>,
        frame_rate_hz: u32,
    ) -> Self {
        let period = Duration::from_secs_f64(1.0 / frame_rate_hz.max(1) as f64);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        tracing::info!(frame_rate_hz, "Render loop started");
        let task = tokio::spawn(render_loop(stabilizer, orientation_rx, command_rx, period));
        Self { command_tx, task }
    }

    pub fn send(&self, command: StabilizerCommand) {
        let _ = self.command_tx.send(command);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {
        self.task.abort();
        tracing::info!("Render loop stopped");
    }
}

async fn render_loop(
    mut stabilizer: Stabilizer,
    orientation_rx: watch::Receiver<OrientationReading>,
    mut command_rx: mpsc::UnboundedReceiver<StabilizerCommand>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame_count: u64 = 0;
    stabilizer.restart_frame_clock(tokio::time::Instant::now());

    loop {
        tokio::select! {
            now = interval.tick() => {
                let raw = *orientation_rx.borrow();
                let output = stabilizer.tick(raw, now);
                frame_count += 1;
                if frame_count % 300 == 0 {
                    tracing::debug!(
                        frames = frame_count,
                        fps = output.fps,
                        rotation_deg = output.rotation_deg,
                        "Render heartbeat"
                    );
                }
            }
            command = command_rx.recv() => match command {
                Some(command) => command.apply(&mut stabilizer),
                None => break,
            }
        }
    }
}
