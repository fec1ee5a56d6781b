/// Zero reference for the tilt angle. Lives for the process only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    offset_deg: f64,
}

impl Calibration {
    pub fn offset(&self) -> f64 {
        self.offset_deg
    }

    /// Take the current filter output as the new zero.
    pub fn set_zero(&mut self, filtered_deg: f64) {
        if filtered_deg.is_nan() {
            tracing::debug!("No filtered angle yet, keeping previous zero");
            return;
        }
        self.offset_deg = filtered_deg;
        tracing::info!(offset_deg = filtered_deg, "Zero reference set");
    }

    /// Filtered angle relative to the zero reference.
    pub fn correct(&self, filtered_deg: f64) -> f64 {
        filtered_deg - self.offset_deg
    }
}
