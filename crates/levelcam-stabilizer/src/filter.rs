/// Smoothing factor of the tilt low-pass filter.
pub const SMOOTHING_ALPHA: f64 = 0.12;

/// Single-pole exponential low-pass filter over the tilt angle.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    smoothed: f64,
    enabled: bool,
}

impl LowPassFilter {
    pub fn new(enabled: bool) -> Self {
        Self {
            smoothed: f64::NAN,
            enabled,
        }
    }

    /// Feed one raw sample and return the filtered angle.
    pub fn apply(&mut self, raw: f64) -> f64 {
        // Disabled: track the raw value so re-enabling starts from here, not a stale value.
        if !self.enabled || self.smoothed.is_nan() {
            self.smoothed = raw;
            return raw;
        }
        self.smoothed += SMOOTHING_ALPHA * (raw - self.smoothed);
        self.smoothed
    }

    /// Current filter output. NaN until the first sample.
    pub fn value(&self) -> f64 {
        self.smoothed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Force the filter state, e.g. to seed a known starting point.
    pub fn reset_to(&mut self, value: f64) {
        self.smoothed = value;
    }

    /// -3 dB cutoff in Hz when the filter is stepped at `tick_hz`.
    pub fn cutoff_hz(tick_hz: f64) -> f64 {
        let a = SMOOTHING_ALPHA;
        // |H(e^jw)|^2 = 1/2 for y[n] = a*x[n] + (1-a)*y[n-1]
        let cos_w = 1.0 - a * a / (2.0 * (1.0 - a));
        cos_w.acos() * tick_hz / (2.0 * std::f64::consts::PI)
    }
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::new(true)
    }
}
