use crate::bubble::Bubble;
use crate::calibration::Calibration;
use crate::filter::LowPassFilter;
use crate::fps::FpsMeter;
use crate::level::TiltClass;
use crate::output::{DebugTelemetry, TelemetrySink, VisualSink, VisualTransform};
use levelcam_capture::raster::rotate_frame;
use levelcam_capture::recording::RecordingSink;
use levelcam_capture::FrameSource;
use levelcam_config::StabilizerConfig;
use levelcam_sensor::OrientationReading;
use tokio::time::Instant;

/// Everything one frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub raw: OrientationReading,
    pub smoothed_deg: f64,
    /// Filtered angle minus the zero reference.
    pub corrected_deg: f64,
    /// Counter-rotation applied to the preview. Always `-corrected_deg`.
    pub rotation_deg: f64,
    pub class: TiltClass,
    pub fps: u32,
}

struct Recorder {
    frames: FrameSource,
    sink: Box<dyn RecordingSink>,
}

/// Per-frame stabilization state: filter, zero reference, bubble and outputs.
///
/// Owned by the render loop; `tick` never blocks and never awaits a sink.
pub struct Stabilizer {
    filter: LowPassFilter,
    calibration: Calibration,
    bubble: Bubble,
    fps: FpsMeter,
    debug: bool,
    visual: Box<dyn VisualSink + Send>,
    telemetry: Option<Box<dyn TelemetrySink + Send>>,
    recorder: Option<Recorder>,
    last: Option<FrameOutput>,
}

impl Stabilizer {
    pub fn new(config: &StabilizerConfig, visual: Box<dyn VisualSink + Send>) -> Self {
        Self {
            filter: LowPassFilter::new(config.smoothing_enabled),
            calibration: Calibration::default(),
            bubble: Bubble::new(),
            fps: FpsMeter::new(Instant::now()),
            debug: config.debug_overlay,
            visual,
            telemetry: None,
            recorder: None,
            last: None,
        }
    }

    pub fn with_telemetry(mut self, sink: Box<dyn TelemetrySink + Send>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Push rotated copies of `frames` into `sink` while the sink is recording.
    pub fn with_recorder(mut self, frames: FrameSource, sink: Box<dyn RecordingSink>) -> Self {
        self.recorder = Some(Recorder { frames, sink });
        self
    }

    /// Run one frame against the latest raw reading.
    pub fn tick(&mut self, raw: OrientationReading, now: Instant) -> FrameOutput {
        let fps = self.fps.frame(now);

        let smoothed_deg = self.filter.apply(raw.primary_deg);
        let corrected_deg = self.calibration.correct(smoothed_deg);
        let rotation_deg = -corrected_deg;

        self.visual.set_transform(VisualTransform::new(rotation_deg));

        if let Some(recorder) = &mut self.recorder {
            if recorder.sink.is_active() {
                let frame = recorder.frames.borrow().clone();
                if let Some(frame) = frame {
                    recorder.sink.push_frame(rotate_frame(&frame, rotation_deg));
                }
            }
        }

        let class = TiltClass::classify(corrected_deg);
        self.visual.set_level(class);

        self.bubble.step(raw);
        self.visual.set_bubble(self.bubble.x, self.bubble.y);

        if self.debug {
            if let Some(telemetry) = &mut self.telemetry {
                telemetry.publish(DebugTelemetry {
                    fps,
                    raw_deg: raw.primary_deg,
                    smoothed_deg,
                });
            }
        }

        let output = FrameOutput {
            raw,
            smoothed_deg,
            corrected_deg,
            rotation_deg,
            class,
            fps,
        };
        self.last = Some(output);
        output
    }

    /// Restart frame-rate measurement. Called when frames start flowing, so time
    /// spent between construction and the first frame is not counted.
    pub fn restart_frame_clock(&mut self, now: Instant) {
        self.fps.restart(now);
    }

    /// Take the current filtered angle as level and recentre the bubble.
    pub fn calibrate(&mut self) {
        self.calibration.set_zero(self.filter.value());
        self.bubble.reset();
    }

    /// Filtered angle relative to the zero reference, without advancing a frame.
    pub fn corrected_angle(&self) -> f64 {
        self.calibration.correct(self.filter.value())
    }

    pub fn set_smoothing(&mut self, enabled: bool) {
        self.filter.set_enabled(enabled);
        tracing::info!(enabled, "Smoothing toggled");
    }

    pub fn smoothing_enabled(&self) -> bool {
        self.filter.is_enabled()
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
        tracing::info!(enabled, "Debug overlay toggled");
    }

    /// Start or finish the recording sink, if one is attached.
    pub fn set_recording(&mut self, recording: bool) {
        match &mut self.recorder {
            Some(recorder) if recording => recorder.sink.start(),
            Some(recorder) => recorder.sink.finish(),
            None => tracing::warn!("No recording sink attached"),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.as_ref().is_some_and(|r| r.sink.is_active())
    }

    pub fn bubble(&self) -> Bubble {
        self.bubble
    }

    pub fn calibration_offset(&self) -> f64 {
        self.calibration.offset()
    }

    pub fn last_output(&self) -> Option<FrameOutput> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SinkLog;
    use levelcam_capture::recording::FrameCounter;
    use levelcam_capture::CapturedFrame;
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingRecorder {
        inner: FrameCounter,
        log: SinkLog,
    }

    impl RecordingSink for CountingRecorder {
        fn is_active(&self) -> bool {
            self.inner.is_active()
        }
        fn start(&mut self) {
            self.inner.start();
        }
        fn push_frame(&mut self, frame: CapturedFrame) {
            self.inner.push_frame(frame);
            self.log.0.lock().unwrap().recorded = self.inner.frames();
        }
        fn finish(&mut self) {
            self.inner.finish();
        }
    }

    fn stabilizer(smoothing: bool) -> (Stabilizer, SinkLog) {
        let log = SinkLog::default();
        let config = StabilizerConfig {
            smoothing_enabled: smoothing,
            ..StabilizerConfig::default()
        };
        let stabilizer = Stabilizer::new(&config, Box::new(log.clone()))
            .with_telemetry(Box::new(log.clone()));
        (stabilizer, log)
    }

    fn run(stabilizer: &mut Stabilizer, raws: &[f64]) -> Vec<FrameOutput> {
        let start = Instant::now();
        raws.iter()
            .enumerate()
            .map(|(i, &raw)| {
                stabilizer.tick(
                    OrientationReading::new(raw, 0.0),
                    start + Duration::from_millis(16 * i as u64),
                )
            })
            .collect()
    }

    #[test]
    fn rotation_is_negated_correction() {
        let (mut s, log) = stabilizer(false);
        for out in run(&mut s, &[3.0, -7.5, 0.0, 42.0]) {
            assert_eq!(out.rotation_deg, -out.corrected_deg);
        }
        let captured = log.0.lock().unwrap();
        assert_eq!(captured.transforms[1].rotation_deg, 7.5);
    }

    #[test]
    fn step_input_converges_and_leaves_level() {
        let (mut s, log) = stabilizer(true);
        let mut raws = vec![0.0; 3];
        raws.extend(std::iter::repeat(10.0).take(120));
        let outputs = run(&mut s, &raws);

        let last = outputs.last().unwrap();
        assert!((last.smoothed_deg - 10.0).abs() < 1e-3);
        assert!((last.rotation_deg + 10.0).abs() < 1e-3);
        assert_eq!(last.class, TiltClass::Tilted);

        let captured = log.0.lock().unwrap();
        let levels = &captured.levels;
        let first_tilted = levels.iter().position(|c| *c != TiltClass::Level).unwrap();
        assert!(levels[..first_tilted].iter().all(|c| *c == TiltClass::Level));
        assert!(levels[first_tilted..].iter().all(|c| *c == TiltClass::Tilted));
        assert!(outputs[first_tilted].corrected_deg > 1.5);
        assert!(outputs[first_tilted - 1].corrected_deg <= 1.5);
    }

    #[test]
    fn calibrate_twice_zeroes_correction() {
        let (mut s, _log) = stabilizer(true);
        run(&mut s, &[0.0, 6.0, 6.0, 6.0]);
        s.calibrate();
        s.calibrate();
        assert_eq!(s.corrected_angle(), 0.0);
        assert_eq!(s.calibration_offset(), s.last_output().unwrap().smoothed_deg);
    }

    #[test]
    fn calibration_uses_filtered_value_not_raw() {
        let (mut s, _log) = stabilizer(true);
        run(&mut s, &[0.0, 10.0]);
        s.calibrate();
        assert!((s.calibration_offset() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn calibrate_recentres_bubble() {
        let (mut s, _log) = stabilizer(true);
        run(&mut s, &[20.0; 10]);
        assert_ne!(s.bubble(), Bubble::new());
        s.calibrate();
        assert_eq!(s.bubble(), Bubble::new());
    }

    #[test]
    fn bubble_uses_raw_angles() {
        let (mut s, log) = stabilizer(true);
        s.tick(OrientationReading::new(6.0, 3.0), Instant::now());
        let (x, y) = log.0.lock().unwrap().bubbles[0];
        assert!((x - 49.1).abs() < 1e-12);
        assert!((y - 49.025).abs() < 1e-12);
    }

    #[test]
    fn telemetry_only_with_debug_on() {
        let (mut s, log) = stabilizer(true);
        run(&mut s, &[1.0, 2.0]);
        assert!(log.0.lock().unwrap().telemetry.is_empty());

        s.set_debug(true);
        run(&mut s, &[3.0]);
        let captured = log.0.lock().unwrap();
        assert_eq!(captured.telemetry.len(), 1);
        assert_eq!(captured.telemetry[0].raw_deg, 3.0);
    }

    #[test]
    fn frame_rate_counts_from_first_frame_not_construction() {
        let (mut s, log) = stabilizer(true);
        s.set_debug(true);
        // Enabling the sensors can take seconds before the loop starts.
        let first_frame = Instant::now() + Duration::from_secs(4);
        s.restart_frame_clock(first_frame);

        let period = Duration::from_micros(16_667);
        for i in 1..=30 {
            s.tick(OrientationReading::new(0.0, 0.0), first_frame + period * i);
        }
        let captured = log.0.lock().unwrap();
        assert_eq!(captured.telemetry.last().unwrap().fps, 60);
    }

    #[test]
    fn frames_recorded_only_while_active() {
        let (frames_tx, frames_rx) =
            tokio::sync::watch::channel(Some(Arc::new(CapturedFrame::blank(8, 4))));
        let log = SinkLog::default();
        let recorder = CountingRecorder {
            inner: FrameCounter::new(),
            log: log.clone(),
        };
        let mut s = Stabilizer::new(&StabilizerConfig::default(), Box::new(log.clone()))
            .with_recorder(frames_rx, Box::new(recorder));

        run(&mut s, &[1.0, 1.0]);
        assert_eq!(log.0.lock().unwrap().recorded, 0);

        s.set_recording(true);
        assert!(s.is_recording());
        run(&mut s, &[1.0, 1.0, 1.0]);
        assert_eq!(log.0.lock().unwrap().recorded, 3);

        // Stream stopped: nothing to push.
        frames_tx.send_replace(None);
        run(&mut s, &[1.0]);
        assert_eq!(log.0.lock().unwrap().recorded, 3);

        s.set_recording(false);
        assert!(!s.is_recording());
    }
}
