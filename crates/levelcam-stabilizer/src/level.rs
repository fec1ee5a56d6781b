/// At or below this many degrees the view counts as level.
pub const LEVEL_THRESHOLD_DEG: f64 = 1.5;
/// Above this many degrees the view counts as very tilted.
pub const TILTED_THRESHOLD_DEG: f64 = 10.0;

/// Severity of the remaining tilt, recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltClass {
    Level,
    Tilted,
    VeryTilted,
}

impl TiltClass {
    pub fn classify(corrected_deg: f64) -> Self {
        let magnitude = corrected_deg.abs();
        if magnitude <= LEVEL_THRESHOLD_DEG {
            TiltClass::Level
        } else if magnitude <= TILTED_THRESHOLD_DEG {
            TiltClass::Tilted
        } else {
            TiltClass::VeryTilted
        }
    }

    /// User-facing status text. Both tilted variants read "TILTED".
    pub fn label(self) -> &'static str {
        match self {
            TiltClass::Level => "LEVEL",
            TiltClass::Tilted | TiltClass::VeryTilted => "TILTED",
        }
    }

    /// Style name for the status badge and horizon line.
    pub fn style(self) -> &'static str {
        match self {
            TiltClass::Level => "level",
            TiltClass::Tilted => "tilted",
            TiltClass::VeryTilted => "very-tilted",
        }
    }
}
