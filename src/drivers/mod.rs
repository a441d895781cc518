pub mod mic;
pub mod ws2812;
