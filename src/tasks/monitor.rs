// NoiseWatch: Monitor Task
//
// Cooperative main loop.  Waits for the cadence flag, runs one pipeline
// cycle at a time, and yields between checks so lower-priority tasks (and
// the idle task's watchdog feed) still get the core.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::*;
use crate::cycle::CycleCoordinator;
use crate::events::CycleReport;
use crate::matrix::LedMatrix;
use crate::monitor::NoiseMonitor;
use crate::sampling::Acquire;

pub fn monitor_task<A: Acquire, M: LedMatrix>(
    coordinator: Arc<CycleCoordinator>,
    mut monitor: NoiseMonitor<A, M>,
) -> ! {
    log::info!("Monitor task started");

    let poll_interval = Duration::from_millis(CYCLE_POLL_INTERVAL_MS);

    loop {
        poll(&coordinator, &mut monitor);
        thread::sleep(poll_interval);
    }
}

/// Bounded variant of [`monitor_task`]: returns once `cycles` cycles have
/// completed.
pub fn run_cycles<A: Acquire, M: LedMatrix>(
    coordinator: &CycleCoordinator,
    monitor: &mut NoiseMonitor<A, M>,
    cycles: usize,
) -> Vec<CycleReport> {
    let poll_interval = Duration::from_millis(CYCLE_POLL_INTERVAL_MS);
    let mut reports = Vec::with_capacity(cycles);

    while reports.len() < cycles {
        reports.extend(poll(coordinator, monitor));
        thread::sleep(poll_interval);
    }
    reports
}

/// Run a cycle if one is due.  Returns the report of a completed cycle.
///
/// Driver faults abandon the current cycle only; the guard is released on
/// the way out and the next tick starts afresh.
pub fn poll<A: Acquire, M: LedMatrix>(
    coordinator: &CycleCoordinator,
    monitor: &mut NoiseMonitor<A, M>,
) -> Option<CycleReport> {
    let _cycle = coordinator.try_begin()?;

    match monitor.run_cycle() {
        Ok(report) => Some(report),
        Err(e) => {
            log::warn!("Noise cycle failed: {:#}", e);
            None
        }
    }
}
