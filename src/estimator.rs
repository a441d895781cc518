// NoiseWatch: Noise Power Estimator
//
// RMS of the raw ADC codes, then converted to a centred voltage and doubled
// to a peak-referenced magnitude.  The RMS is taken in raw-code space and only
// the final scalar is converted; converting every sample first gives a
// different (larger) result for AC signals.

use crate::config::*;
use crate::sampling::SampleBuffer;

/// Root-mean-square of the raw codes, in code units.
pub fn rms(samples: &SampleBuffer) -> f32 {
    let sum = samples.iter().fold(0.0f32, |acc, &s| {
        let s = u32::from(s);
        acc + (s * s) as f32
    });
    (sum / SAMPLES as f32).sqrt()
}

/// Map a raw-code value onto a bipolar voltage around the mid-scale bias of
/// an AC-coupled microphone.
pub fn centered_volts(code: f32) -> f32 {
    code * ADC_FULL_SCALE_V / ADC_CODE_SPAN - ADC_FULL_SCALE_V / 2.0
}

/// Peak-referenced noise magnitude in volts.  Never negative.
pub fn estimate(samples: &SampleBuffer) -> f32 {
    (2.0 * centered_volts(rms(samples))).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::FixedSamples;

    fn expected_for_constant(code: u16) -> f32 {
        2.0 * (f32::from(code) * ADC_FULL_SCALE_V / ADC_CODE_SPAN - ADC_FULL_SCALE_V / 2.0).abs()
    }

    #[test]
    fn constant_buffer_rms_is_the_constant() {
        for code in [0u16, 1, 100, 2047, 2048, 3000, ADC_MAX_CODE] {
            let FixedSamples(buf) = FixedSamples::constant(code);
            let got = rms(&buf);
            assert!((got - f32::from(code)).abs() <= f32::from(code) * 1e-5 + 1e-3, "{code}: {got}");
        }
    }

    #[test]
    fn constant_buffer_magnitude() {
        for code in [0u16, 512, 1024, 2048, 2500, 3500, ADC_MAX_CODE] {
            let FixedSamples(buf) = FixedSamples::constant(code);
            let got = estimate(&buf);
            let want = expected_for_constant(code);
            assert!((got - want).abs() < 1e-4, "{code}: got {got}, want {want}");
        }
    }

    #[test]
    fn mid_scale_is_silence() {
        let FixedSamples(buf) = FixedSamples::constant(2048);
        assert_eq!(estimate(&buf), 0.0);
    }

    #[test]
    fn below_mid_scale_is_still_positive() {
        let FixedSamples(buf) = FixedSamples::constant(1024);
        let got = estimate(&buf);
        assert!(got > 0.0);
        assert!((got - 1.65).abs() < 1e-4);
    }

    #[test]
    fn alternating_rails_convert_after_rms() {
        let FixedSamples(buf) = FixedSamples::alternating(0, ADC_MAX_CODE);

        let raw = f64::from(ADC_MAX_CODE) / 2f64.sqrt();
        assert!((f64::from(rms(&buf)) - raw).abs() < 0.05);

        let want = 2.0 * (raw * 3.3 / 4096.0 - 1.65);
        let got = f64::from(estimate(&buf));
        assert!((got - want).abs() < 1e-3, "got {got}, want {want}");

        // Converting each sample before the RMS lands near full scale instead.
        let per_sample: f32 = {
            let sum: f32 = buf.iter().map(|&s| centered_volts(f32::from(s)).powi(2)).sum();
            2.0 * (sum / SAMPLES as f32).sqrt()
        };
        assert!(per_sample > 3.2);
        assert!((per_sample - got as f32).abs() > 1.0);
    }
}
