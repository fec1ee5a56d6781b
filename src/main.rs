mod console;
mod handheld;

use anyhow::Result;
use console::{ConsoleTelemetry, ConsoleView};
use handheld::{simulate_handheld, HandheldOutput};
use levelcam_capture::recording::FrameCounter;
use levelcam_capture::test_pattern::{TestPatternCamera, TestPatternStream};
use levelcam_capture::{release, CameraConstraints, CameraProvider, VideoStream};
use levelcam_config::AppConfig;
use levelcam_sensor::sim::{SimulatedAbsoluteSensor, SimulatedTiltSource};
use levelcam_sensor::OrientationClient;
use levelcam_stabilizer::{MotionController, Stabilizer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

type Controller = MotionController<SimulatedAbsoluteSensor, SimulatedTiltSource>;

/// Application state.
struct App {
    config: AppConfig,
    controller: Controller,
    camera: Option<TestPatternStream>,
    simulator: tokio::task::JoinHandle<()>,
    recording: bool,
}

impl App {
    async fn new(config: AppConfig) -> Self {
        let camera = start_camera(&config).await;

        let (mut absolute, absolute_feed) = SimulatedAbsoluteSensor::new();
        absolute.set_available(config.simulation.primary_sensor_available);
        let (tilt, tilt_feed) = SimulatedTiltSource::new();
        let output = if config.simulation.primary_sensor_available {
            HandheldOutput::Quaternion(absolute_feed)
        } else {
            HandheldOutput::TiltEvents(tilt_feed)
        };
        let simulator = tokio::spawn(simulate_handheld(config.simulation.clone(), output));

        let mut stabilizer = Stabilizer::new(&config.stabilizer, Box::new(ConsoleView::new()))
            .with_telemetry(Box::new(ConsoleTelemetry::new()));
        if let Some(stream) = &camera {
            stabilizer = stabilizer.with_recorder(stream.frames(), Box::new(FrameCounter::new()));
        }

        let controller = MotionController::new(
            OrientationClient::new(absolute, tilt),
            stabilizer,
            config.stabilizer.frame_rate_hz,
        );

        Self {
            config,
            controller,
            camera,
            simulator,
            recording: false,
        }
    }

    async fn enable_motion(&mut self) {
        match self.controller.enable_motion().await {
            Ok(state) => info!(?state, "Stabilization running"),
            Err(e) => warn!(%e, message = e.user_message(), "Stabilization unavailable"),
        }
    }

    /// Handle one line of user input. Returns `false` to quit.
    async fn handle_command(&mut self, line: &str) -> bool {
        match line.trim() {
            "e" => self.enable_motion().await,
            "c" => self.controller.calibrate(),
            "s" => {
                let stabilizer = &mut self.config.stabilizer;
                stabilizer.smoothing_enabled = !stabilizer.smoothing_enabled;
                self.controller.set_smoothing(stabilizer.smoothing_enabled);
            }
            "d" => {
                let stabilizer = &mut self.config.stabilizer;
                stabilizer.debug_overlay = !stabilizer.debug_overlay;
                self.controller.set_debug(stabilizer.debug_overlay);
            }
            "r" => {
                if self.camera.is_none() {
                    warn!("No camera stream to record");
                } else {
                    self.recording = !self.recording;
                    self.controller.set_recording(self.recording);
                }
            }
            "q" => return false,
            "" => {}
            other => warn!(command = other, "Unknown command (e, c, s, d, r, q)"),
        }
        true
    }

    /// Release everything. Each step runs even if an earlier one fails.
    fn teardown(&mut self) {
        if self.recording {
            self.controller.set_recording(false);
        }
        self.controller.teardown();
        self.simulator.abort();
        if let Some(stream) = &mut self.camera {
            release(stream);
        }
        info!("Teardown complete");
    }
}

async fn start_camera(config: &AppConfig) -> Option<TestPatternStream> {
    let mut provider = TestPatternCamera::new();
    match provider
        .acquire(CameraConstraints::from_config(&config.camera))
        .await
    {
        Ok(stream) => Some(stream),
        Err(e) => {
            error!(%e, message = %e.user_message(), "Camera unavailable");
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "levelcam_app=info,levelcam_sensor=info,levelcam_stabilizer=info,levelcam_capture=info"
                    .into()
            }),
        )
        .init();

    info!("Level camera preview starting");

    // Load config.
    let config = levelcam_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(
        smoothing = config.stabilizer.smoothing_enabled,
        frame_rate_hz = config.stabilizer.frame_rate_hz,
        primary_sensor = config.simulation.primary_sensor_available,
        "Config loaded"
    );

    let mut app = App::new(config).await;

    // Starting the app stands in for the user's "start" tap.
    app.enable_motion().await;
    info!(
        "Commands: e = enable motion, c = calibrate, s = smoothing, d = debug, r = record, q = quit"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !app.handle_command(&line).await {
                        break;
                    }
                }
                Ok(None) => {
                    // stdin closed: keep running until Ctrl+C.
                    tokio::signal::ctrl_c().await?;
                    break;
                }
                Err(e) => {
                    warn!(?e, "Failed to read command");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    app.teardown();

    // Save config on exit.
    if let Err(e) = levelcam_config::save_config(&app.config) {
        error!(?e, "Failed to save config");
    }

    Ok(())
}
