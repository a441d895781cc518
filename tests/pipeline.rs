// End-to-end checks over the public pipeline with in-memory collaborators.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use noisewatch::cadence::Ticker;
use noisewatch::config::*;
use noisewatch::matrix::{FrameBuffer, OFF, RINGS};
use noisewatch::sampling::FixedSamples;
use noisewatch::sim::{ConsoleMatrix, SyntheticMic};
use noisewatch::tasks::monitor::poll;
use noisewatch::{CycleCoordinator, NoiseMonitor};

fn run_once(samples: FixedSamples) -> (noisewatch::CycleReport, FrameBuffer) {
    let mut monitor = NoiseMonitor::new(samples, FrameBuffer::new());
    let report = monitor.run_cycle().expect("cycle");
    (report, monitor.leds().clone())
}

#[test]
fn silence_lights_nothing() {
    let (report, frame) = run_once(FixedSamples::constant(2048));
    assert_eq!(report.level, 0);
    assert!(report.magnitude.abs() < 1e-6);
    assert!(frame.lit().is_empty());
    assert_eq!(frame.flush_count(), 1);
}

#[test]
fn steady_offsets_map_to_each_level() {
    let cases = [(2079u16, 1u8), (2100, 2), (2120, 3), (2141, 4), (1976, 3)];
    for (code, level) in cases {
        let (report, frame) = run_once(FixedSamples::constant(code));
        assert_eq!(report.level, level, "code {code} -> {}", report.magnitude);
        assert_ne!(frame.pixels()[CENTER_LED], OFF);
    }
}

#[test]
fn level_four_frame_is_center_plus_all_rings() {
    let (report, frame) = run_once(FixedSamples::constant(2141));
    assert_eq!(report.level, 4);

    let mut expected: Vec<usize> = RINGS.iter().flat_map(|r| r.iter().copied()).collect();
    expected.push(CENTER_LED);
    expected.sort_unstable();
    assert_eq!(frame.lit(), expected);
}

#[test]
fn rail_to_rail_overflows_rendered_levels() {
    let (report, frame) = run_once(FixedSamples::alternating(0, ADC_MAX_CODE));

    let raw_rms = f64::from(ADC_MAX_CODE) / 2f64.sqrt();
    let want = 2.0 * (raw_rms * 3.3 / 4096.0 - 1.65);
    assert!((f64::from(report.magnitude) - want).abs() < 1e-3);
    assert_eq!(report.level, 41);
    assert!(!report.is_rendered());
    assert!(frame.lit().is_empty());
    assert_eq!(frame.flush_count(), 1);
}

#[test]
fn same_input_same_output() {
    let mut monitor = NoiseMonitor::new(FixedSamples::alternating(1900, 2250), FrameBuffer::new());
    let first = monitor.run_cycle().unwrap();
    let first_frame = monitor.leds().pixels().to_owned();
    let second = monitor.run_cycle().unwrap();

    assert_eq!(first, second);
    assert_eq!(&first_frame, monitor.leds().pixels());
}

#[test]
fn ticker_drives_cycles_one_at_a_time() {
    let coordinator = Arc::new(CycleCoordinator::new());
    let mut monitor = NoiseMonitor::new(SyntheticMic::default(), ConsoleMatrix::new());
    let ticker = Ticker::start(Arc::clone(&coordinator), Duration::from_millis(5)).unwrap();

    let mut reports = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while reports.len() < 5 && Instant::now() < deadline {
        if let Some(report) = poll(&coordinator, &mut monitor) {
            reports.push(report);
        }
        thread::sleep(Duration::from_millis(1));
    }
    drop(ticker);

    assert_eq!(reports.len(), 5);
    assert!(!coordinator.is_in_progress());
    assert_eq!(monitor.leds().frame().flush_count(), 5);
    // The sweep starts silent and gets louder over the first steps.
    assert_eq!(reports[0].level, 0);
    assert_eq!(reports[0].magnitude, 0.0);
    assert!(reports[4].magnitude > reports[0].magnitude);
}
