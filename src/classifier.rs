// NoiseWatch: Intensity Level Classifier
//
// Counts how many quanta fit strictly inside the magnitude by repeated
// subtraction, i.e. `ceil(m / q) - 1` for positive `m`.  The quantum is one
// twentieth of a level band, so ordinary room noise already spans several
// counts and loud noise runs well past the last rendered level.  The count is
// left unclamped; the renderer treats anything above 4 as a blank frame.

use crate::config::LEVEL_QUANTUM_V;
use crate::events::Level;

/// Classify a magnitude (volts) into an intensity level.
///
/// Zero, negative and NaN magnitudes give level 0.  Saturates at
/// [`Level::MAX`] so infinite input terminates.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn classify(magnitude: f32) -> Level {
    let mut remaining = magnitude;
    let mut count: Level = 0;

    loop {
        remaining -= LEVEL_QUANTUM_V;
        if !(remaining > 0.0) || count == Level::MAX {
            return count;
        }
        count += 1;
    }
}
