// NoiseWatch: Cycle Results & Data Types

use core::fmt;

// ---------------------------------------------------------------------------
// Intensity level
// ---------------------------------------------------------------------------

/// Quantized noise intensity.  Levels 0–4 have a matrix pattern; the
/// classifier can produce higher counts, which render as a blank frame.
pub type Level = u8;

/// Highest level with a dedicated LED pattern.
pub const MAX_RENDERED_LEVEL: Level = 4;

// ---------------------------------------------------------------------------
// Cycle report: result of one acquisition + classification pass
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleReport {
    pub level: Level,
    /// Peak-referenced magnitude in volts.
    pub magnitude: f32,
}

impl CycleReport {
    /// Whether `level` has a pattern on the matrix.
    pub fn is_rendered(&self) -> bool {
        self.level <= MAX_RENDERED_LEVEL
    }
}

/// Serial report format: level right-aligned in two columns, magnitude with
/// four decimals in eight.
impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:2} {:8.4}", self.level, self.magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_matches_serial_layout() {
        let report = CycleReport { level: 3, magnitude: 0.1234 };
        assert_eq!(report.to_string(), " 3   0.1234");
    }

    #[test]
    fn out_of_range_level_is_not_rendered() {
        assert!(CycleReport { level: 4, magnitude: 0.15 }.is_rendered());
        assert!(!CycleReport { level: 41, magnitude: 1.37 }.is_rendered());
    }
}
