use bitflags::bitflags;

bitflags! {
    /// PPUSTATUS (`$2002`) flag bits.
    ///
    /// The low five bits are not driven by the PPU; a read fills them from
    /// the latch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// More than eight sprites were found on a scanline.
        const SPRITE_OVERFLOW = 0b0010_0000;
        /// An opaque sprite 0 pixel overlapped an opaque background pixel.
        const SPRITE_ZERO_HIT = 0b0100_0000;
        /// Set at scanline 241 dot 1.
        const VBLANK = 0b1000_0000;
    }
}

/// Bits of a PPUSTATUS read that come from the latch.
pub const LATCH_MASK: u8 = 0x1F;
