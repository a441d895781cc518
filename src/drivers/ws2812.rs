// NoiseWatch: WS2812 Matrix Driver (RMT)
//
// Builds the frame in a `FrameBuffer` and, on flush, clocks all 25 pixels
// out in one RMT transmission: 24 bits per pixel, GRB order, MSB first.

use smart_leds::RGB8;

/// Wire word for one pixel: green, red, blue in the low 24 bits.
pub fn grb_word(color: RGB8) -> u32 {
    (u32::from(color.g) << 16) | (u32::from(color.r) << 8) | u32::from(color.b)
}

/// Bits of one pixel in transmission order.
pub fn pixel_bits(color: RGB8) -> impl Iterator<Item = bool> {
    let word = grb_word(color);
    (0..24).rev().map(move |bit| word & (1 << bit) != 0)
}

#[cfg(target_os = "espidf")]
pub use self::esp::Ws2812Matrix;

#[cfg(target_os = "espidf")]
mod esp {
    use std::time::Duration;

    use esp_idf_hal::gpio::OutputPin;
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_hal::rmt::config::TransmitConfig;
    use esp_idf_hal::rmt::{PinState, Pulse, RmtChannel, TxRmtDriver, VariableLengthSignal};
    use smart_leds::RGB8;

    use super::pixel_bits;
    use crate::config::*;
    use crate::matrix::{FrameBuffer, LedMatrix};

    pub struct Ws2812Matrix<'d> {
        tx: TxRmtDriver<'d>,
        frame: FrameBuffer,
        zero: [Pulse; 2],
        one: [Pulse; 2],
    }

    impl<'d> Ws2812Matrix<'d> {
        pub fn new<C: RmtChannel>(
            channel: impl Peripheral<P = C> + 'd,
            pin: impl Peripheral<P = impl OutputPin> + 'd,
        ) -> anyhow::Result<Self> {
            let config = TransmitConfig::new().clock_divider(1);
            let tx = TxRmtDriver::new(channel, pin, &config)?;

            let ticks_hz = tx.counter_clock()?;
            let pulse = |state, ns| Pulse::new_with_duration(ticks_hz, state, &Duration::from_nanos(ns));
            let zero = [
                pulse(PinState::High, WS2812_T0H_NS)?,
                pulse(PinState::Low, WS2812_T0L_NS)?,
            ];
            let one = [
                pulse(PinState::High, WS2812_T1H_NS)?,
                pulse(PinState::Low, WS2812_T1L_NS)?,
            ];

            log::info!("WS2812 matrix ready ({} LEDs on GPIO{})", LED_COUNT, PIN_LED_MATRIX);
            Ok(Self {
                tx,
                frame: FrameBuffer::new(),
                zero,
                one,
            })
        }
    }

    impl LedMatrix for Ws2812Matrix<'_> {
        fn clear(&mut self) {
            self.frame.clear();
        }

        fn set_pixel(&mut self, index: usize, color: RGB8) -> anyhow::Result<()> {
            self.frame.set_pixel(index, color)
        }

        fn flush(&mut self) -> anyhow::Result<()> {
            let mut signal = VariableLengthSignal::with_capacity(LED_COUNT * 24 * 2);
            for &px in self.frame.pixels() {
                for bit in pixel_bits(px) {
                    let symbol = if bit { &self.one } else { &self.zero };
                    signal.push(symbol.iter())?;
                }
            }

            self.tx.start_blocking(&signal)?;
            self.frame.flush()
        }
    }
}
