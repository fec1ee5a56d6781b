use crate::error::SensorError;
use crate::types::{AbsoluteEvent, PermissionFacet, PermissionState, SensorOptions, TiltEvent};
use std::future::Future;
use tokio::sync::mpsc;

/// Quaternion-based absolute orientation sensor surface.
pub trait AbsoluteOrientationPlatform: Send {
    /// Whether the sensor API exists at all.
    fn is_available(&self) -> bool;

    /// Query one permission facet. An `Err` means the facet cannot be queried here.
    fn query_permission(
        &self,
        facet: PermissionFacet,
    ) -> impl Future<Output = Result<PermissionState, SensorError>> + Send;

    /// Construct and start a sensor session. Readings and error events arrive on the channel.
    fn start(
        &mut self,
        options: SensorOptions,
    ) -> Result<mpsc::UnboundedReceiver<AbsoluteEvent>, SensorError>;

    fn stop(&mut self) -> Result<(), SensorError>;
}

/// Legacy tilt-event surface.
pub trait TiltEventPlatform: Send {
    fn is_available(&self) -> bool;

    /// Whether the platform gates events behind an explicit, gesture-initiated request.
    fn requires_permission_request(&self) -> bool;

    fn request_permission(
        &mut self,
    ) -> impl Future<Output = Result<PermissionState, SensorError>> + Send;

    /// Attach listeners for both the regular and the "absolute" event variants.
    fn attach(&mut self) -> Result<mpsc::UnboundedReceiver<TiltEvent>, SensorError>;

    /// Remove every listener added by `attach`.
    fn detach(&mut self) -> Result<(), SensorError>;
}
