use bitflags::bitflags;

use crate::memory::ppu as ppu_mem;

bitflags! {
    /// PPUCTRL (`$2000`), write-only.
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// V P H B S I N N
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Control: u8 {
        /// Base name table select: `$2000 + $400 * NN`.
        const NAMETABLE = 0b0000_0011;
        /// PPUDATA cursor step: 32 (down a column) instead of 1.
        const INCREMENT_32 = 0b0000_0100;
        /// Sprite pattern table at `$1000` for 8x8 sprites.
        const SPRITE_TABLE = 0b0000_1000;
        /// Background pattern table at `$1000`.
        const BACKGROUND_TABLE = 0b0001_0000;
        /// 8x16 sprites.
        const SPRITE_SIZE_16 = 0b0010_0000;
        /// EXT pin direction. Latched but has no effect on a stock console.
        const MASTER_SLAVE = 0b0100_0000;
        /// Raise NMI when vblank starts.
        const VBLANK_NMI = 0b1000_0000;
    }
}

impl Control {
    pub fn nametable_addr(self) -> u16 {
        ppu_mem::NAMETABLE_BASE + (self.bits() & 0b11) as u16 * ppu_mem::NAMETABLE_SIZE
    }

    pub fn nametable_index(self) -> u8 {
        self.bits() & 0b11
    }

    pub fn background_pattern_addr(self) -> u16 {
        ((self & Control::BACKGROUND_TABLE).bits() as u16) << 8
    }

    pub fn sprite_pattern_addr(self) -> u16 {
        if self.contains(Control::SPRITE_TABLE) {
            ppu_mem::PATTERN_TABLE_1
        } else {
            ppu_mem::PATTERN_TABLE_0
        }
    }

    pub fn addr_increment(self) -> u16 {
        if self.contains(Control::INCREMENT_32) { 32 } else { 1 }
    }

    pub fn sprite_height(self) -> u8 {
        if self.contains(Control::SPRITE_SIZE_16) { 16 } else { 8 }
    }

    pub fn vblank_nmi(self) -> bool {
        self.contains(Control::VBLANK_NMI)
    }
}
