//! Register file behind the eight CPU-visible ports.
//!
//! Bit layouts live in submodules; the side effects of each port live next
//! to the PPU in `ppu/ports.rs` so that latch updates, flag clears and cursor
//! advances always happen in the same place as the access that causes them.

mod control;
mod mask;
mod status;

pub use control::Control;
pub use mask::Mask;
pub use status::{LATCH_MASK, Status};

use super::latch::DataLatch;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Registers {
    pub(crate) control: Control,
    pub(crate) mask: Mask,
    pub(crate) status: Status,
    /// Last value seen on the PPU's internal data bus.
    pub(crate) latch: DataLatch,
    /// OAM cursor driven by `$2003`/`$2004`; wraps at 256.
    pub(crate) oam_addr: u8,
    /// Shared PPUSCROLL/PPUADDR toggle, 0 before the first write of a pair.
    pub(crate) write_toggle: u8,
    pub(crate) scroll_x: u8,
    pub(crate) scroll_y: u8,
    /// PPUDATA cursor. Kept at full 16-bit width; the translator folds it.
    pub(crate) ppu_addr: u16,
    /// While set, reads are non-destructive and writes leave the latch alone.
    pub(crate) protect: bool,
}

impl Registers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Advances the shared toggle and returns the value it landed on.
    pub(crate) fn flip_toggle(&mut self) -> u8 {
        self.write_toggle = (self.write_toggle + 1) % 2;
        self.write_toggle
    }

    /// Updates the latch unless reads/writes are currently protected.
    pub(crate) fn drive_latch(&mut self, value: u8) {
        if !self.protect {
            self.latch.set(value);
        }
    }

    /// Warm reset: the CPU-written configuration is cleared, memories and
    /// flags owned by the timing logic are not.
    pub(crate) fn warm_reset(&mut self) {
        self.control = Control::empty();
        self.mask = Mask::empty();
        self.latch.reset();
        self.write_toggle = 0;
        self.scroll_x = 0;
        self.scroll_y = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_alternates_between_one_and_zero() {
        let mut regs = Registers::new();
        assert_eq!(regs.flip_toggle(), 1);
        assert_eq!(regs.flip_toggle(), 0);
        assert_eq!(regs.flip_toggle(), 1);
    }

    #[test]
    fn protected_latch_is_left_alone() {
        let mut regs = Registers::new();
        regs.drive_latch(0x12);
        regs.protect = true;
        regs.drive_latch(0x34);
        assert_eq!(regs.latch.sample(), 0x12);
    }

    #[test]
    fn warm_reset_keeps_cursor_and_flags() {
        let mut regs = Registers::new();
        regs.control = Control::VBLANK_NMI;
        regs.status = Status::VBLANK;
        regs.ppu_addr = 0x2345;
        regs.write_toggle = 1;
        regs.warm_reset();
        assert_eq!(regs.control, Control::empty());
        assert_eq!(regs.status, Status::VBLANK);
        assert_eq!(regs.ppu_addr, 0x2345);
        assert_eq!(regs.write_toggle, 0);
    }
}
