use crate::attempt::{Attempt, AttemptPhase};
use crate::error::SensorError;
use crate::euler::decompose;
use crate::platform::AbsoluteOrientationPlatform;
use crate::types::{
    AbsoluteEvent, OrientationReading, PermissionFacet, PermissionState, SensorOptions,
    START_TIMEOUT,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Start the quaternion sensor and wait for its first reading.
///
/// Resolves on whichever comes first: a reading (success), an error event, or
/// `START_TIMEOUT`. The sensor is stopped on the failure outcomes.
pub(crate) async fn start<P: AbsoluteOrientationPlatform>(
    platform: &mut P,
    readings: &watch::Sender<OrientationReading>,
) -> Result<mpsc::UnboundedReceiver<AbsoluteEvent>, SensorError> {
    let mut attempt = Attempt::new("absolute-orientation");

    if !platform.is_available() {
        return Err(attempt.fail(SensorError::CapabilityUnavailable(
            "AbsoluteOrientationSensor",
        )));
    }

    attempt.advance(AttemptPhase::AwaitingPermission);
    for facet in PermissionFacet::ALL {
        match platform.query_permission(facet).await {
            Ok(PermissionState::Denied) => {
                return Err(attempt.fail(SensorError::PermissionDenied(format!("{facet:?}"))));
            }
            Ok(_) => {}
            // Best effort: facets the platform cannot query don't block the attempt.
            Err(e) => tracing::debug!(?facet, %e, "Permission query unsupported"),
        }
    }

    attempt.advance(AttemptPhase::AwaitingFirstReading);
    let options = SensorOptions::default();
    tracing::debug!(
        frequency_hz = options.frequency_hz,
        frame = ?options.reference_frame,
        "Starting orientation sensor"
    );
    let mut events = platform.start(options).map_err(|e| attempt.fail(e))?;

    let timeout = tokio::time::sleep(START_TIMEOUT);
    tokio::pin!(timeout);

    tokio::select! {
        event = events.recv() => match event {
            Some(AbsoluteEvent::Reading(q)) => {
                publish(q, readings);
                attempt.succeed();
                Ok(events)
            }
            Some(AbsoluteEvent::Error(message)) => {
                stop_quietly(platform);
                Err(attempt.fail(SensorError::Platform(message)))
            }
            None => {
                stop_quietly(platform);
                Err(attempt.fail(SensorError::Platform("sensor event stream closed".into())))
            }
        },
        _ = &mut timeout => {
            stop_quietly(platform);
            Err(attempt.fail(SensorError::Timeout(START_TIMEOUT)))
        }
    }
}

/// Background task: decompose every reading and publish it until the sensor stream ends.
pub(crate) async fn forward(
    mut events: mpsc::UnboundedReceiver<AbsoluteEvent>,
    readings: Arc<watch::Sender<OrientationReading>>,
) {
    let mut sample_count: u64 = 0;
    while let Some(event) = events.recv().await {
        match event {
            AbsoluteEvent::Reading(q) => {
                if publish(q, &readings) {
                    sample_count += 1;
                    if sample_count % 1000 == 0 {
                        tracing::debug!(sample_count, "Orientation readings processed");
                    }
                }
            }
            AbsoluteEvent::Error(message) => {
                tracing::warn!(%message, "Orientation sensor error");
            }
        }
    }
    tracing::debug!("Orientation sensor stream ended");
}

fn publish(q: glam::DQuat, readings: &watch::Sender<OrientationReading>) -> bool {
    match decompose(q) {
        Some(reading) => {
            readings.send_replace(reading);
            true
        }
        None => {
            tracing::trace!(error = %SensorError::Transient, "Dropping NaN reading");
            false
        }
    }
}

fn stop_quietly<P: AbsoluteOrientationPlatform>(platform: &mut P) {
    if let Err(e) = platform.stop() {
        tracing::debug!(%e, "Failed to stop orientation sensor");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedAbsoluteSensor;
    use crate::types::ReferenceFrame;
    use glam::DQuat;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn first_reading_resolves_and_is_published() {
        let (mut sensor, feed) = SimulatedAbsoluteSensor::new();
        feed.push(AbsoluteEvent::Reading(DQuat::from_rotation_y(
            15f64.to_radians(),
        )));
        let (tx, rx) = watch::channel(OrientationReading::default());

        assert!(start(&mut sensor, &tx).await.is_ok());
        assert!((rx.borrow().primary_deg - 15.0).abs() < 1e-9);
        assert!(!sensor.is_stopped());
        assert_eq!(
            sensor.options(),
            Some(SensorOptions {
                frequency_hz: 60.0,
                reference_frame: ReferenceFrame::Device,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn missing_capability_fails_without_starting() {
        let (mut sensor, _feed) = SimulatedAbsoluteSensor::new();
        sensor.set_available(false);
        let (tx, _rx) = watch::channel(OrientationReading::default());

        let err = start(&mut sensor, &tx).await.unwrap_err();
        assert!(matches!(err, SensorError::CapabilityUnavailable(_)));
        assert!(!sensor.is_started());
    }

    #[tokio::test(start_paused = true)]
    async fn denied_facet_aborts() {
        let (mut sensor, feed) = SimulatedAbsoluteSensor::new();
        sensor.deny(PermissionFacet::Magnetometer);
        feed.push(AbsoluteEvent::Reading(DQuat::IDENTITY));
        let (tx, _rx) = watch::channel(OrientationReading::default());

        let err = start(&mut sensor, &tx).await.unwrap_err();
        assert_eq!(err, SensorError::PermissionDenied("Magnetometer".into()));
        assert!(!sensor.is_started());
    }

    #[tokio::test(start_paused = true)]
    async fn unqueryable_facets_do_not_block() {
        let (mut sensor, feed) = SimulatedAbsoluteSensor::new();
        sensor.set_permission_queries_supported(false);
        feed.push(AbsoluteEvent::Reading(DQuat::IDENTITY));
        let (tx, _rx) = watch::channel(OrientationReading::default());

        assert!(start(&mut sensor, &tx).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn error_event_fails_and_stops() {
        let (mut sensor, feed) = SimulatedAbsoluteSensor::new();
        feed.push(AbsoluteEvent::Error("NotReadableError".into()));
        let (tx, _rx) = watch::channel(OrientationReading::default());

        let err = start(&mut sensor, &tx).await.unwrap_err();
        assert_eq!(err, SensorError::Platform("NotReadableError".into()));
        assert!(sensor.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn silence_times_out_after_two_seconds() {
        let (mut sensor, _feed) = SimulatedAbsoluteSensor::new();
        let (tx, _rx) = watch::channel(OrientationReading::default());

        let started = tokio::time::Instant::now();
        let err = start(&mut sensor, &tx).await.unwrap_err();
        assert_eq!(err, SensorError::Timeout(Duration::from_secs(2)));
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(sensor.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn forward_drops_nan_readings() {
        let (tx, rx) = watch::channel(OrientationReading::default());
        let tx = Arc::new(tx);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        events_tx
            .send(AbsoluteEvent::Reading(DQuat::from_rotation_y(
                5f64.to_radians(),
            )))
            .unwrap();
        events_tx
            .send(AbsoluteEvent::Reading(DQuat::from_xyzw(
                f64::NAN,
                0.0,
                0.0,
                1.0,
            )))
            .unwrap();
        drop(events_tx);

        forward(events_rx, tx).await;
        assert!((rx.borrow().primary_deg - 5.0).abs() < 1e-9);
    }
}
