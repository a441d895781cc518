// NoiseWatch: Microphone noise level meter with a 5 × 5 LED ring display
//
// Every 30 ms a timer requests a cycle; the monitor task samples the
// microphone, estimates the RMS noise magnitude, quantizes it to a level and
// draws the matching ring pattern.  Hardware drivers only build for ESP-IDF;
// everything else (and the host simulator) builds anywhere.

pub mod cadence;
pub mod classifier;
pub mod config;
pub mod cycle;
pub mod drivers;
pub mod estimator;
pub mod events;
pub mod matrix;
pub mod monitor;
pub mod sampling;
pub mod sim;
pub mod tasks;

pub use cycle::CycleCoordinator;
pub use events::{CycleReport, Level};
pub use monitor::NoiseMonitor;
