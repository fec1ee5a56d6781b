use levelcam_sensor::OrientationReading;

/// Upper bound of the bubble position, in percent of the indicator.
pub const BUBBLE_MAX: f64 = 98.0;
const BUBBLE_CENTER: f64 = BUBBLE_MAX / 2.0;
const FRAME_DT: f64 = 1.0 / 60.0;
const PRIMARY_GAIN: f64 = 2.0;
const POSITION_STEP: f64 = 0.5;

/// Auxiliary bubble level driven by the raw tilt on both axes.
///
/// Semi-implicit Euler: velocity first, then position. Hitting a wall clamps the
/// position and kills the velocity on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Bubble {
    pub fn new() -> Self {
        Self {
            x: BUBBLE_CENTER,
            y: BUBBLE_CENTER,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Back to the centre, at rest.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance one frame using raw (unfiltered, uncalibrated) angles.
    pub fn step(&mut self, raw: OrientationReading) {
        self.vx += raw.primary_deg * FRAME_DT * PRIMARY_GAIN;
        self.vy += raw.secondary_deg * FRAME_DT;

        (self.x, self.vx) = integrate_axis(self.x, self.vx);
        (self.y, self.vy) = integrate_axis(self.y, self.vy);
    }
}

impl Default for Bubble {
    fn default() -> Self {
        Self::new()
    }
}

fn integrate_axis(position: f64, velocity: f64) -> (f64, f64) {
    let next = position + velocity * POSITION_STEP;
    if next < 0.0 {
        (0.0, 0.0)
    } else if next > BUBBLE_MAX {
        (BUBBLE_MAX, 0.0)
    } else {
        (next, velocity)
    }
}
