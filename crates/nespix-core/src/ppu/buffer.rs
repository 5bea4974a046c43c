//! Double-buffered frame of palette indices.
//!
//! The back plane is written while visible scanlines are drawn; when the last
//! visible scanline completes the planes swap and the front plane holds the
//! finished frame until the next swap.

use core::fmt;

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;
pub const SCREEN_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// One frame-buffer cell.
///
/// Bits 0-3 hold the 4-bit palette index (palette select in bits 2-3, pixel
/// value in bits 0-1); bit 4 is set for sprite pixels. The raw value is the
/// palette-RAM offset the pixel is resolved through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel(u8);

impl Pixel {
    const SPRITE_LAYER: u8 = 0x10;
    const INDEX_MASK: u8 = 0x0F;

    /// The universal backdrop.
    pub const BACKDROP: Pixel = Pixel(0);

    pub const fn background(index: u8) -> Self {
        Self(index & Self::INDEX_MASK)
    }

    pub const fn sprite(index: u8) -> Self {
        Self((index & Self::INDEX_MASK) | Self::SPRITE_LAYER)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::INDEX_MASK | Self::SPRITE_LAYER))
    }

    pub const fn palette_index(self) -> u8 {
        self.0 & Self::INDEX_MASK
    }

    pub const fn is_background(self) -> bool {
        self.0 & Self::SPRITE_LAYER == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FrameBuffer {
    planes: [Box<[u8]>; 2],
    /// Index of the plane currently being drawn.
    back: usize,
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("back", &self.back)
            .finish_non_exhaustive()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            planes: [
                vec![0; SCREEN_SIZE].into_boxed_slice(),
                vec![0; SCREEN_SIZE].into_boxed_slice(),
            ],
            back: 0,
        }
    }

    /// Writes a pixel into the plane being drawn. Out-of-range coordinates
    /// are ignored.
    pub(crate) fn put(&mut self, x: usize, y: usize, pixel: Pixel) {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.planes[self.back][y * SCREEN_WIDTH + x] = pixel.bits();
        }
    }

    /// Publishes the back plane as the new front plane.
    pub(crate) fn swap(&mut self) {
        self.back ^= 1;
    }

    /// The last completed frame, row-major.
    ///
    /// Each byte is a 5-bit palette-RAM offset rather than a bare 4-bit
    /// palette index: bits 0-3 hold the index and bit 4 is set for sprite
    /// pixels. [`pixel`](Self::pixel) and [`pixels`](Self::pixels) decode
    /// the same cells as [`Pixel`]s.
    pub fn front(&self) -> &[u8] {
        &self.planes[self.back ^ 1]
    }

    /// The frame currently being drawn, in the same cell layout as
    /// [`front`](Self::front).
    pub fn back(&self) -> &[u8] {
        &self.planes[self.back]
    }

    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        Pixel::from_bits(self.front()[y * SCREEN_WIDTH + x])
    }

    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.front().iter().map(|&bits| Pixel::from_bits(bits))
    }
}
