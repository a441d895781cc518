// NoiseWatch: Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_MIC_ADC: u32 = 2;     // D0/A0: Microphone output
pub const PIN_LED_MATRIX: i32 = 10; // D10:   WS2812 matrix data in

// ---------------------------------------------------------------------------
// ADC (microphone acquisition)
// ---------------------------------------------------------------------------
pub const MIC_ADC_CHANNEL: u32 = 2;                                   // ADC1 channel N is GPIO N on the C3
pub const ADC_RESOLUTION_BITS: u32 = 12;
pub const ADC_CODE_SPAN: f32 = (1u32 << ADC_RESOLUTION_BITS) as f32; // 4096
pub const ADC_MAX_CODE: u16 = (1u16 << ADC_RESOLUTION_BITS) - 1;     // 4095
pub const ADC_FULL_SCALE_V: f32 = 3.3;                                // 11 dB attenuation
pub const ADC_SAMPLE_FREQ_HZ: u32 = 20_000;                           // 200 samples ≈ 10 ms
pub const ADC_BYTES_PER_RESULT: usize = 4;                            // TYPE2 output format

/// Raw readings captured per cycle.
pub const SAMPLES: usize = 200;

// ---------------------------------------------------------------------------
// Level quantization
// ---------------------------------------------------------------------------
pub const LEVEL_COUNT: usize = 5;
pub const LEVEL_STEP_V: f32 = ADC_FULL_SCALE_V / LEVEL_COUNT as f32; // 0.66 V per band
pub const LEVEL_SUBDIVISIONS: f32 = 20.0;
/// Amount subtracted per classifier iteration (0.033 V).
pub const LEVEL_QUANTUM_V: f32 = LEVEL_STEP_V / LEVEL_SUBDIVISIONS;

// ---------------------------------------------------------------------------
// LED matrix (5 × 5 WS2812)
// ---------------------------------------------------------------------------
pub const MATRIX_WIDTH: usize = 5;
pub const MATRIX_HEIGHT: usize = 5;
pub const LED_COUNT: usize = MATRIX_WIDTH * MATRIX_HEIGHT; // 25
pub const CENTER_LED: usize = LED_COUNT / 2;               // 12
pub const RING_COUNT: usize = 3;

// WS2812 bit timings (nanoseconds)
pub const WS2812_T0H_NS: u64 = 350;
pub const WS2812_T0L_NS: u64 = 800;
pub const WS2812_T1H_NS: u64 = 700;
pub const WS2812_T1L_NS: u64 = 600;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------
pub const SAMPLE_PERIOD_US: u64 = 30_000;  // cadence timer period
pub const CYCLE_POLL_INTERVAL_MS: u64 = 1; // main loop yield between flag checks
pub const BOOT_SERIAL_DELAY_MS: u64 = 2000; // let the serial monitor attach

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_MONITOR: usize = 8192;
