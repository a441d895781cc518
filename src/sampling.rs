// NoiseWatch: Sample Buffer & Acquisition Interface
//
// One acquisition batch of raw microphone codes, overwritten in place every
// cycle.  The hardware back-end (ADC continuous mode with DMA) lives in
// `drivers::mic`; the host simulator provides `sim::SyntheticMic`.

use crate::config::SAMPLES;

/// Raw 12-bit ADC codes for one cycle.  Only meaningful between the end of
/// one acquisition and the start of the next.
pub type SampleBuffer = [u16; SAMPLES];

/// Source of raw microphone samples.
pub trait Acquire {
    /// Fill `buffer` with exactly [`SAMPLES`] fresh readings.
    ///
    /// Blocks until the transfer has completed.  Any queued readings from a
    /// previous batch are discarded first.
    fn acquire(&mut self, buffer: &mut SampleBuffer) -> anyhow::Result<()>;
}

impl<A: Acquire + ?Sized> Acquire for &mut A {
    fn acquire(&mut self, buffer: &mut SampleBuffer) -> anyhow::Result<()> {
        (**self).acquire(buffer)
    }
}

/// Replays one fixed buffer on every acquisition.
#[derive(Debug, Clone)]
pub struct FixedSamples(pub SampleBuffer);

impl FixedSamples {
    /// Every reading set to `code`.
    pub fn constant(code: u16) -> Self {
        Self([code; SAMPLES])
    }

    /// Readings alternating between `low` and `high`, starting low.
    pub fn alternating(low: u16, high: u16) -> Self {
        let mut buffer = [low; SAMPLES];
        for sample in buffer.iter_mut().skip(1).step_by(2) {
            *sample = high;
        }
        Self(buffer)
    }
}

impl Acquire for FixedSamples {
    fn acquire(&mut self, buffer: &mut SampleBuffer) -> anyhow::Result<()> {
        buffer.copy_from_slice(&self.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_starts_low() {
        let FixedSamples(buf) = FixedSamples::alternating(0, 4095);
        assert_eq!(buf[0], 0);
        assert_eq!(buf[1], 4095);
        assert_eq!(buf[SAMPLES - 1], 4095);
        assert_eq!(buf.iter().filter(|&&s| s == 0).count(), SAMPLES / 2);
    }

    #[test]
    fn acquire_overwrites_in_place() {
        let mut buffer = [1234u16; SAMPLES];
        FixedSamples::constant(7).acquire(&mut buffer).unwrap();
        assert!(buffer.iter().all(|&s| s == 7));
    }
}
