//! PPU address translation.
//!
//! Every VRAM access goes through [`translate`], so two raw addresses that
//! alias the same location always observe the same stored byte.

use crate::memory::ppu as ppu_mem;

/// Maps a raw PPU address to the canonical index into the 16 KiB store.
///
/// - the bus is 14 bits wide, so bits 14-15 are dropped;
/// - `$3000-$3EFF` folds down onto the name tables at `$2000-$2EFF`;
/// - palette space repeats every `$20` bytes, and the sprite half
///   `$3F10-$3F1F` folds onto `$3F00-$3F0F`, so the sprite backdrop slots
///   `$3F10/$3F14/$3F18/$3F1C` share storage with `$3F00/$3F04/$3F08/$3F0C`.
///
/// The mapping is idempotent.
pub fn translate(addr: u16) -> u16 {
    let addr = addr & ppu_mem::VRAM_ADDR_MASK;
    if (ppu_mem::NAMETABLE_MIRROR_START..ppu_mem::PALETTE_BASE).contains(&addr) {
        addr - 0x1000
    } else if addr & ppu_mem::PALETTE_BASE == ppu_mem::PALETTE_BASE {
        let addr = addr & 0xFF1F;
        if addr & 0x10 == 0x10 { addr & 0xFF0F } else { addr }
    } else {
        addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nametable_mirror_folds_down() {
        assert_eq!(translate(0x3000), 0x2000);
        assert_eq!(translate(0x3456), 0x2456);
        assert_eq!(translate(0x3EFF), 0x2EFF);
        assert_eq!(translate(0x2FFF), 0x2FFF);
    }

    #[test]
    fn palette_mirrors() {
        assert_eq!(translate(0x3F10), 0x3F00);
        assert_eq!(translate(0x3F14), 0x3F04);
        assert_eq!(translate(0x3F18), 0x3F08);
        assert_eq!(translate(0x3F1C), 0x3F0C);
        assert_eq!(translate(0x3F11), 0x3F01);
        assert_eq!(translate(0x3F15), 0x3F05);
        assert_eq!(translate(0x3F1F), 0x3F0F);
        assert_eq!(translate(0x3F25), 0x3F05);
        assert_eq!(translate(0x3FF1), 0x3F01);
        assert_eq!(translate(0x3FFC), 0x3F0C);
    }

    #[test]
    fn other_regions_are_untouched() {
        assert_eq!(translate(0x0000), 0x0000);
        assert_eq!(translate(0x1FFF), 0x1FFF);
        assert_eq!(translate(0x23C0), 0x23C0);
    }

    #[test]
    fn upper_bus_bits_are_dropped() {
        assert_eq!(translate(0x4000), 0x0000);
        assert_eq!(translate(0x7F10), 0x3F00);
        assert_eq!(translate(0xF000), 0x2000);
    }
}
