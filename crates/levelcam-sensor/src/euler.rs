use crate::types::OrientationReading;
use glam::DQuat;

/// Decompose a device quaternion into left/right and front/back tilt in degrees.
///
/// Returns `None` when the result is NaN so a bad sample never reaches shared state.
pub fn decompose(q: DQuat) -> Option<OrientationReading> {
    let (x, y, z, w) = (q.x, q.y, q.z, q.w);

    let primary = (2.0 * (w * y + x * z))
        .atan2(1.0 - 2.0 * (y * y + x * x))
        .to_degrees();
    let secondary = (2.0 * (w * x - y * z)).clamp(-1.0, 1.0).asin().to_degrees();

    if primary.is_nan() || secondary.is_nan() {
        return None;
    }
    Some(OrientationReading::new(primary, secondary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_flat() {
        let r = decompose(DQuat::IDENTITY).unwrap();
        assert!(r.primary_deg.abs() < 1e-9);
        assert!(r.secondary_deg.abs() < 1e-9);
    }

    #[test]
    fn rotation_about_y_is_left_right_tilt() {
        let r = decompose(DQuat::from_rotation_y(30f64.to_radians())).unwrap();
        assert!((r.primary_deg - 30.0).abs() < 1e-9);
        assert!(r.secondary_deg.abs() < 1e-9);

        let r = decompose(DQuat::from_rotation_y(-12f64.to_radians())).unwrap();
        assert!((r.primary_deg + 12.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_about_x_is_front_back_tilt() {
        let r = decompose(DQuat::from_rotation_x(20f64.to_radians())).unwrap();
        assert!(r.primary_deg.abs() < 1e-9);
        assert!((r.secondary_deg - 20.0).abs() < 1e-9);
    }

    #[test]
    fn combined_tilt_separates_both_axes() {
        let q = DQuat::from_rotation_y(12f64.to_radians())
            * DQuat::from_rotation_x(-5f64.to_radians());
        let r = decompose(q).unwrap();
        assert!((r.primary_deg - 12.0).abs() < 1e-9);
        assert!((r.secondary_deg + 5.0).abs() < 1e-9);
    }

    #[test]
    fn asin_argument_is_clamped() {
        // Unnormalized input pushes 2(wx - yz) to 2.0.
        let r = decompose(DQuat::from_xyzw(1.0, 0.0, 0.0, 1.0)).unwrap();
        assert!((r.secondary_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn nan_components_are_dropped() {
        assert!(decompose(DQuat::from_xyzw(f64::NAN, 0.0, 0.0, 1.0)).is_none());
    }
}
