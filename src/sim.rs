// NoiseWatch: Host Simulator Collaborators
//
// Stand-ins for the microphone and the WS2812 matrix so the full pipeline
// runs (and is exercised in tests) on a development machine.

use core::f32::consts::TAU;
use core::fmt::Write as _;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use smart_leds::RGB8;

use crate::cadence::Ticker;
use crate::config::*;
use crate::cycle::CycleCoordinator;
use crate::events::CycleReport;
use crate::matrix::{FrameBuffer, LedMatrix, OFF};
use crate::monitor::NoiseMonitor;
use crate::sampling::{Acquire, SampleBuffer};
use crate::tasks;

/// Mid-scale bias of the microphone output.
const BIAS: f32 = 2048.0;

// ---------------------------------------------------------------------------
// Synthetic microphone
// ---------------------------------------------------------------------------

/// Sine tone over the mid-scale bias whose amplitude ramps up and down
/// between zero and `peak_amplitude` codes, one step per acquisition.
#[derive(Debug, Clone)]
pub struct SyntheticMic {
    tone_hz: f32,
    peak_amplitude: f32,
    sweep_steps: u32,
    step: u32,
    phase: f32,
}

impl SyntheticMic {
    pub fn new(tone_hz: f32, peak_amplitude: f32, sweep_steps: u32) -> Self {
        Self {
            tone_hz,
            peak_amplitude,
            sweep_steps: sweep_steps.max(1),
            step: 0,
            phase: 0.0,
        }
    }

    /// Amplitude (codes) used by the next acquisition.
    pub fn amplitude(&self) -> f32 {
        let period = 2 * self.sweep_steps;
        let pos = self.step % period;
        let rising = if pos <= self.sweep_steps { pos } else { period - pos };
        self.peak_amplitude * rising as f32 / self.sweep_steps as f32
    }
}

impl Default for SyntheticMic {
    /// 500 Hz tone (five whole periods per block) sweeping through every
    /// rendered level and a little past.
    fn default() -> Self {
        Self::new(500.0, 1000.0, 40)
    }
}

impl Acquire for SyntheticMic {
    fn acquire(&mut self, buffer: &mut SampleBuffer) -> anyhow::Result<()> {
        let amplitude = self.amplitude();
        let phase_step = TAU * self.tone_hz / ADC_SAMPLE_FREQ_HZ as f32;

        for sample in buffer.iter_mut() {
            let value = BIAS + amplitude * self.phase.sin();
            *sample = value.round().clamp(0.0, f32::from(ADC_MAX_CODE)) as u16;
            self.phase = (self.phase + phase_step) % TAU;
        }

        self.step = self.step.wrapping_add(1);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Console LED matrix
// ---------------------------------------------------------------------------

/// Logs the 5 × 5 frame on every flush, one text row per matrix row.
#[derive(Debug, Default)]
pub struct ConsoleMatrix {
    frame: FrameBuffer,
}

impl ConsoleMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Text rendering: `.` for off, otherwise the dominant channel initial.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(LED_COUNT * 2 + MATRIX_HEIGHT);
        for row in self.frame.pixels().chunks(MATRIX_WIDTH) {
            for (col, &px) in row.iter().enumerate() {
                if col > 0 {
                    out.push(' ');
                }
                out.push(glyph(px));
            }
            out.push('\n');
        }
        out
    }
}

fn glyph(px: RGB8) -> char {
    if px == OFF {
        '.'
    } else if px.r > 0 && px.g > 0 {
        'Y'
    } else if px.r >= px.b {
        'R'
    } else {
        'B'
    }
}

impl LedMatrix for ConsoleMatrix {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) -> anyhow::Result<()> {
        self.frame.set_pixel(index, color)
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.frame.flush()?;
        let mut text = String::new();
        for line in self.to_text().lines() {
            let _ = writeln!(text, "    {}", line);
        }
        log::debug!("Matrix frame:\n{}", text.trim_end());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulator runtime
// ---------------------------------------------------------------------------

/// Install the host logger: `RUST_LOG` if set, `info` otherwise.
#[cfg(not(target_os = "espidf"))]
pub fn init_logging() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()?;
    Ok(())
}

/// Drive the pipeline from a monitor thread and the 30 ms cadence ticker.
///
/// With `cycles: None` the monitor runs forever, as on the device.  A panic
/// on the monitor thread comes back as an error.
pub fn run<A, M>(mic: A, leds: M, cycles: Option<usize>) -> anyhow::Result<Vec<CycleReport>>
where
    A: Acquire + Send + 'static,
    M: LedMatrix + Send + 'static,
{
    let coordinator = Arc::new(CycleCoordinator::new());
    let mut monitor = NoiseMonitor::new(mic, leds);

    let task_coordinator = Arc::clone(&coordinator);
    let handle = thread::Builder::new()
        .name("monitor".into())
        .stack_size(STACK_MONITOR)
        .spawn(move || match cycles {
            Some(n) => tasks::monitor::run_cycles(&task_coordinator, &mut monitor, n),
            None => tasks::monitor::monitor_task(task_coordinator, monitor),
        })?;

    let _ticker = Ticker::start(coordinator, Duration::from_micros(SAMPLE_PERIOD_US))?;

    handle
        .join()
        .map_err(|_| anyhow::anyhow!("monitor task panicked"))
}
