// NoiseWatch: Acquisition → Estimation → Classification → Render pipeline

use crate::classifier;
use crate::config::SAMPLES;
use crate::estimator;
use crate::events::CycleReport;
use crate::matrix::{self, LedMatrix};
use crate::sampling::{Acquire, SampleBuffer};

/// Owns the sample buffer and both hardware collaborators for the lifetime
/// of the firmware.
pub struct NoiseMonitor<A, M> {
    mic: A,
    leds: M,
    buffer: SampleBuffer,
}

impl<A: Acquire, M: LedMatrix> NoiseMonitor<A, M> {
    pub fn new(mic: A, leds: M) -> Self {
        Self {
            mic,
            leds,
            buffer: [0; SAMPLES],
        }
    }

    /// Run one full cycle: sample, estimate, classify, draw and flush.
    pub fn run_cycle(&mut self) -> anyhow::Result<CycleReport> {
        self.mic.acquire(&mut self.buffer)?;

        let report = evaluate(&self.buffer);
        matrix::render(report.level, &mut self.leds)?;

        log::info!("{}", report);
        Ok(report)
    }

    /// Samples from the most recent acquisition.
    pub fn samples(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn leds(&self) -> &M {
        &self.leds
    }
}

/// Magnitude and level for a completed buffer.
pub fn evaluate(samples: &SampleBuffer) -> CycleReport {
    let magnitude = estimator::estimate(samples);
    CycleReport {
        level: classifier::classify(magnitude),
        magnitude,
    }
}
