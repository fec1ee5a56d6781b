use glam::DQuat;
use levelcam_config::SimulationConfig;
use levelcam_sensor::sim::SensorFeed;
use levelcam_sensor::{AbsoluteEvent, TiltEvent, SENSOR_FREQUENCY_HZ};
use std::f64::consts::TAU;
use std::time::Duration;

/// Where simulated readings go.
pub enum HandheldOutput {
    Quaternion(SensorFeed<AbsoluteEvent>),
    TiltEvents(SensorFeed<TiltEvent>),
}

/// Tilt of a hand-held phone at `t` seconds: a slow sway plus fast jitter, in degrees.
pub fn handheld_tilt(config: &SimulationConfig, t: f64) -> (f64, f64) {
    let period = config.tilt_period_secs.max(0.1);
    let sway = config.tilt_amplitude_deg * (TAU * t / period).sin();
    let jitter = config.noise_deg * (t * 37.0).sin() * (t * 11.0).cos();
    let pitch = 0.5 * config.tilt_amplitude_deg * (TAU * t / (period * 1.7)).cos();
    (sway + jitter, pitch + 0.5 * jitter)
}

/// Background task: feed a simulated sensor at its sampling rate until the sensor goes away.
pub async fn simulate_handheld(config: SimulationConfig, output: HandheldOutput) {
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / SENSOR_FREQUENCY_HZ));
    let start = tokio::time::Instant::now();

    loop {
        let now = interval.tick().await;
        let t = now.duration_since(start).as_secs_f64();
        let (gamma, beta) = handheld_tilt(&config, t);

        let delivered = match &output {
            HandheldOutput::Quaternion(feed) => {
                let q = DQuat::from_rotation_y(gamma.to_radians())
                    * DQuat::from_rotation_x(beta.to_radians());
                feed.push(AbsoluteEvent::Reading(q))
            }
            HandheldOutput::TiltEvents(feed) => feed.push(TiltEvent::new(gamma, beta)),
        };
        if !delivered {
            tracing::debug!("Simulated sensor closed");
            break;
        }
    }
}
