// NoiseWatch: Microphone Driver (ADC continuous mode + DMA)
//
// ESP-IDF's continuous ADC driver runs the converter free and lets the
// peripheral's DMA engine stream results into a driver-owned pool.  Each
// acquisition flushes the pool, starts conversion, blocks until exactly
// `SAMPLES` results for the microphone channel have been copied out, then
// stops conversion again.

use crate::config::*;

/// Decode one TYPE2 conversion result (ESP32-C3 layout):
/// bits 0–11 data, bits 13–15 channel, bit 16 unit.
///
/// Returns the 12-bit code when the result belongs to ADC1 / `channel`.
pub fn decode_result(bytes: [u8; ADC_BYTES_PER_RESULT], channel: u32) -> Option<u16> {
    let word = u32::from_le_bytes(bytes);
    let data = (word & 0x0FFF) as u16;
    let result_channel = (word >> 13) & 0x7;
    let unit = (word >> 16) & 0x1;

    (unit == 0 && result_channel == channel).then_some(data)
}

/// Close out a block transfer: `stop` always runs, and a failed read is
/// reported ahead of a failed stop.
pub fn finish_block(
    read: anyhow::Result<()>,
    stop: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let stopped = stop();
    read.and(stopped)
}

#[cfg(target_os = "espidf")]
pub use self::esp::DmaMicrophone;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_sys::{self as sys, esp};

    use super::{decode_result, finish_block};
    use crate::config::*;
    use crate::sampling::{Acquire, SampleBuffer};

    const FRAME_BYTES: usize = SAMPLES * ADC_BYTES_PER_RESULT;
    /// `ADC_MAX_DELAY`: block until data arrives.
    const READ_FOREVER: u32 = u32::MAX;

    pub struct DmaMicrophone {
        handle: sys::adc_continuous_handle_t,
        raw: [u8; FRAME_BYTES],
    }

    // SAFETY: the driver handle is only touched through `&mut self`, and the
    // microphone is owned by the single monitor task.
    unsafe impl Send for DmaMicrophone {}

    impl DmaMicrophone {
        /// Claim the continuous ADC driver for the microphone channel.
        /// Failure here is fatal for the firmware.
        pub fn new() -> anyhow::Result<Self> {
            let mut handle: sys::adc_continuous_handle_t = core::ptr::null_mut();

            unsafe {
                let handle_cfg = sys::adc_continuous_handle_cfg_t {
                    max_store_buf_size: (2 * FRAME_BYTES) as u32,
                    conv_frame_size: FRAME_BYTES as u32,
                    ..core::mem::zeroed()
                };
                esp!(sys::adc_continuous_new_handle(&handle_cfg, &mut handle))?;

                let mut pattern = sys::adc_digi_pattern_config_t {
                    atten: sys::adc_atten_t_ADC_ATTEN_DB_11 as u8,
                    channel: MIC_ADC_CHANNEL as u8,
                    unit: sys::adc_unit_t_ADC_UNIT_1 as u8,
                    bit_width: sys::adc_bitwidth_t_ADC_BITWIDTH_12 as u8,
                };
                let dig_cfg = sys::adc_continuous_config_t {
                    pattern_num: 1,
                    adc_pattern: &mut pattern,
                    sample_freq_hz: ADC_SAMPLE_FREQ_HZ,
                    conv_mode: sys::adc_digi_convert_mode_t_ADC_CONV_SINGLE_UNIT_1,
                    format: sys::adc_digi_output_format_t_ADC_DIGI_OUTPUT_FORMAT_TYPE2,
                };
                if let Err(e) = esp!(sys::adc_continuous_config(handle, &dig_cfg)) {
                    sys::adc_continuous_deinit(handle);
                    return Err(e.into());
                }
            }

            log::info!(
                "Microphone ADC ready (GPIO{}, {} Hz, {} samples/cycle)",
                PIN_MIC_ADC,
                ADC_SAMPLE_FREQ_HZ,
                SAMPLES
            );
            Ok(Self {
                handle,
                raw: [0; FRAME_BYTES],
            })
        }

        fn read_block(&mut self, buffer: &mut SampleBuffer) -> anyhow::Result<()> {
            let mut filled = 0;

            while filled < SAMPLES {
                let wanted = (SAMPLES - filled) * ADC_BYTES_PER_RESULT;
                let mut got: u32 = 0;
                esp!(unsafe {
                    sys::adc_continuous_read(
                        self.handle,
                        self.raw.as_mut_ptr(),
                        wanted as u32,
                        &mut got,
                        READ_FOREVER,
                    )
                })?;

                for chunk in self.raw[..got as usize].chunks_exact(ADC_BYTES_PER_RESULT) {
                    let bytes = [chunk[0], chunk[1], chunk[2], chunk[3]];
                    if let Some(code) = decode_result(bytes, MIC_ADC_CHANNEL) {
                        buffer[filled] = code;
                        filled += 1;
                        if filled == SAMPLES {
                            break;
                        }
                    }
                }
            }

            Ok(())
        }
    }

    impl Acquire for DmaMicrophone {
        fn acquire(&mut self, buffer: &mut SampleBuffer) -> anyhow::Result<()> {
            // Drop anything left over from the previous block.
            esp!(unsafe { sys::adc_continuous_flush_pool(self.handle) })?;
            esp!(unsafe { sys::adc_continuous_start(self.handle) })?;

            let handle = self.handle;
            let read = self.read_block(buffer);

            finish_block(read, || {
                esp!(unsafe { sys::adc_continuous_stop(handle) })?;
                Ok(())
            })
        }
    }

    impl Drop for DmaMicrophone {
        fn drop(&mut self) {
            unsafe {
                sys::adc_continuous_deinit(self.handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(code: u16, channel: u32, unit: u32) -> [u8; 4] {
        (u32::from(code) | (channel << 13) | (unit << 16)).to_le_bytes()
    }

    #[test]
    fn decodes_microphone_result() {
        assert_eq!(decode_result(encode(0, 2, 0), 2), Some(0));
        assert_eq!(decode_result(encode(2048, 2, 0), 2), Some(2048));
        assert_eq!(decode_result(encode(ADC_MAX_CODE, 2, 0), 2), Some(ADC_MAX_CODE));
    }

    #[test]
    fn ignores_other_channels_and_units() {
        assert_eq!(decode_result(encode(1000, 3, 0), 2), None);
        assert_eq!(decode_result(encode(1000, 2, 1), 2), None);
    }

    #[test]
    fn reserved_bits_do_not_leak_into_data() {
        let word = u32::from_le_bytes(encode(0x0ABC, 2, 0)) | (1 << 12) | (0xFF << 24);
        assert_eq!(decode_result(word.to_le_bytes(), 2), Some(0x0ABC));
    }

    #[test]
    fn read_error_wins_over_stop_error() {
        let err = finish_block(Err(anyhow::anyhow!("read timed out")), || {
            anyhow::bail!("stop failed")
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "read timed out");
    }

    #[test]
    fn stop_runs_after_failed_read() {
        let mut stopped = false;
        let result = finish_block(Err(anyhow::anyhow!("read timed out")), || {
            stopped = true;
            Ok(())
        });
        assert!(result.is_err());
        assert!(stopped);
    }

    #[test]
    fn stop_error_reported_after_clean_read() {
        let err = finish_block(Ok(()), || anyhow::bail!("stop failed")).unwrap_err();
        assert_eq!(err.to_string(), "stop failed");
        assert!(finish_block(Ok(()), || Ok(())).is_ok());
    }
}
