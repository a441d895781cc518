// NoiseWatch: LED Matrix Patterns
//
// 5 × 5 pixel layout, linear index `row * 5 + col`.  The centre pixel shows
// the level colour; rings are the pixels at Manhattan distance 1, 2 and 3
// from the centre (corners are never lit).
//
//    0  1  2  3  4          .  3  2  3  .
//    5  6  7  8  9          3  2  1  2  3
//   10 11 12 13 14   ring → 2  1  C  1  2
//   15 16 17 18 19          3  2  1  2  3
//   20 21 22 23 24          .  3  2  3  .

use smart_leds::RGB8;

use crate::config::*;
use crate::events::Level;

// ---------------------------------------------------------------------------
// LED matrix collaborator
// ---------------------------------------------------------------------------

/// Addressable LED matrix with a frame that is built first and then pushed to
/// the device in one go.
pub trait LedMatrix {
    /// Turn every pixel of the pending frame off.
    fn clear(&mut self);

    /// Set one pixel of the pending frame.
    fn set_pixel(&mut self, index: usize, color: RGB8) -> anyhow::Result<()>;

    /// Push the pending frame to the device.
    fn flush(&mut self) -> anyhow::Result<()>;
}

impl<M: LedMatrix + ?Sized> LedMatrix for &mut M {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) -> anyhow::Result<()> {
        (**self).set_pixel(index, color)
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        (**self).flush()
    }
}

pub const OFF: RGB8 = RGB8::new(0, 0, 0);

// ---------------------------------------------------------------------------
// In-memory frame
// ---------------------------------------------------------------------------

/// Pending frame contents.  `flush` is a no-op apart from counting; device
/// drivers wrap one of these and push `pixels()` on their own flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [RGB8; LED_COUNT],
    flushes: usize,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            pixels: [OFF; LED_COUNT],
            flushes: 0,
        }
    }

    pub fn pixels(&self) -> &[RGB8; LED_COUNT] {
        &self.pixels
    }

    /// Indices of every pixel that is not off, ascending.
    pub fn lit(&self) -> Vec<usize> {
        self.pixels
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != OFF)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl LedMatrix for FrameBuffer {
    fn clear(&mut self) {
        self.pixels = [OFF; LED_COUNT];
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) -> anyhow::Result<()> {
        anyhow::ensure!(index < LED_COUNT, "pixel {} outside {}-LED matrix", index, LED_COUNT);
        self.pixels[index] = color;
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pattern tables
// ---------------------------------------------------------------------------

/// Ring membership, innermost first.
pub const RINGS: [&[usize]; RING_COUNT] = [
    &[7, 11, 13, 17],
    &[2, 6, 8, 10, 14, 16, 18, 22],
    &[1, 3, 5, 9, 15, 19, 21, 23],
];

pub const RING_COLOR: RGB8 = RGB8::new(0, 0, 80);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub center: RGB8,
    /// Rings lit, counted from the innermost.
    pub rings: usize,
}

/// Pattern per level; `None` leaves the frame dark.
pub const LEVEL_PATTERNS: [Option<Pattern>; LEVEL_COUNT] = [
    None,
    Some(Pattern { center: RGB8::new(0, 0, 80), rings: 0 }),   // blue (dim)
    Some(Pattern { center: RGB8::new(0, 0, 120), rings: 1 }),  // blue
    Some(Pattern { center: RGB8::new(60, 60, 0), rings: 2 }),  // yellow
    Some(Pattern { center: RGB8::new(80, 0, 0), rings: 3 }),   // red
];

/// Pattern for `level`, or `None` for level 0 and levels past the table.
pub fn pattern_for(level: Level) -> Option<Pattern> {
    LEVEL_PATTERNS.get(usize::from(level)).copied().flatten()
}

// ---------------------------------------------------------------------------
// Render dispatcher
// ---------------------------------------------------------------------------

/// Draw the pattern for `level` and flush it exactly once.
pub fn render<M: LedMatrix + ?Sized>(level: Level, leds: &mut M) -> anyhow::Result<()> {
    leds.clear();

    match pattern_for(level) {
        Some(pattern) => {
            leds.set_pixel(CENTER_LED, pattern.center)?;
            for ring in &RINGS[..pattern.rings] {
                for &index in ring.iter() {
                    leds.set_pixel(index, RING_COLOR)?;
                }
            }
        }
        None if usize::from(level) >= LEVEL_COUNT => {
            log::debug!("Level {} has no pattern; frame left dark", level);
        }
        None => {}
    }

    leds.flush()
}
