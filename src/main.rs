// NoiseWatch: Firmware Entry Point
//
// Boot sequence:
//   1. Wait 2 s so a serial monitor can attach.
//   2. Bring up the WS2812 matrix (RMT) and the microphone ADC (DMA).
//   3. Spawn the monitor task.
//   4. Arm the 30 ms cadence timer.
//
// Any peripheral that cannot be claimed aborts start-up.
//
// On a development host the same pipeline runs against a synthetic
// microphone and a console matrix.

#[cfg(target_os = "espidf")]
use std::sync::Arc;
#[cfg(target_os = "espidf")]
use std::thread;
#[cfg(target_os = "espidf")]
use std::time::Duration;

#[cfg(target_os = "espidf")]
use noisewatch::config::*;
#[cfg(target_os = "espidf")]
use noisewatch::{tasks, CycleCoordinator, NoiseMonitor};

// ---------------------------------------------------------------------------
// Main (ESP32-C3)
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::prelude::*;
    use esp_idf_svc::timer::EspTaskTimerService;
    use noisewatch::cadence;
    use noisewatch::drivers::mic::DmaMicrophone;
    use noisewatch::drivers::ws2812::Ws2812Matrix;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    thread::sleep(Duration::from_millis(BOOT_SERIAL_DELAY_MS));
    log::info!("NoiseWatch firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    let leds = Ws2812Matrix::new(peripherals.rmt.channel0, peripherals.pins.gpio10)?;
    let mic = DmaMicrophone::new()?;

    // ---- Shared state -----------------------------------------------------
    let coordinator = Arc::new(CycleCoordinator::new());

    // ---- Monitor task -----------------------------------------------------
    let monitor = NoiseMonitor::new(mic, leds);
    let task_coordinator = Arc::clone(&coordinator);
    thread::Builder::new()
        .name("monitor".into())
        .stack_size(STACK_MONITOR)
        .spawn(move || {
            tasks::monitor::monitor_task(task_coordinator, monitor);
        })?;

    // ---- Cadence timer ----------------------------------------------------
    // The callback runs on the esp_timer task and must return immediately.
    let timer_service = EspTaskTimerService::new()?;
    let tick_coordinator = Arc::clone(&coordinator);
    let timer = timer_service.timer(move || {
        cadence::on_tick(&tick_coordinator);
    })?;
    timer.every(Duration::from_micros(SAMPLE_PERIOD_US))?;
    log::info!("Cadence timer armed ({} µs)", SAMPLE_PERIOD_US);

    // Main thread has nothing left to do; park it forever.
    // (`timer` must stay alive for the cadence to keep firing.)
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

// ---------------------------------------------------------------------------
// Main (host simulator)
// ---------------------------------------------------------------------------
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use noisewatch::sim::{self, ConsoleMatrix, SyntheticMic};

    sim::init_logging()?;
    log::info!("NoiseWatch simulator starting…");

    // Unbounded: returns only if the monitor task panics.
    sim::run(SyntheticMic::default(), ConsoleMatrix::new(), None)?;
    Ok(())
}
