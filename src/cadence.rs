// NoiseWatch: Cadence Scheduler
//
// The periodic tick only raises the request flag.  On the device the tick
// comes from an `esp_timer`; on the host a plain thread stands in for it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::cycle::CycleCoordinator;

/// Timer callback body.  Returns `true` to keep the timer running.
#[inline]
pub fn on_tick(coordinator: &CycleCoordinator) -> bool {
    coordinator.request();
    true
}

/// Thread-backed periodic ticker for targets without a hardware timer.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(coordinator: Arc<CycleCoordinator>, period: Duration) -> anyhow::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("cadence".into())
            .spawn(move || {
                let mut next = Instant::now() + period;
                while !thread_stop.load(Ordering::Relaxed) {
                    let now = Instant::now();
                    if now < next {
                        thread::sleep(next - now);
                    }
                    if !on_tick(&coordinator) {
                        break;
                    }
                    next += period;
                }
            })?;

        log::info!("Cadence ticker started ({} ms)", period.as_millis());
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
