//! Side-effect-free register inspection for debuggers and test harnesses.

use core::fmt;

use tracing::trace;

use super::Ppu;

/// Values a debugger sees when it peeks at the register window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterSnapshot {
    /// PPUSTATUS as the CPU would read it, latch bits included.
    pub status: u8,
    /// Byte under the OAM cursor.
    pub oam_data: u8,
    /// Byte under the PPUDATA cursor.
    pub ppu_data: u8,
    pub ppu_addr: u16,
    pub write_toggle: u8,
    pub oam_addr: u8,
    pub latch: u8,
    pub scanline: u16,
    pub dot: u16,
    pub frame: u64,
}

impl fmt::Display for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "F:{} SL:{:>3} DOT:{:>3} STATUS:{:02X} V:{:04X} W:{} OAM:{:02X}={:02X} DATA:{:02X} LATCH:{:02X}",
            self.frame,
            self.scanline,
            self.dot,
            self.status,
            self.ppu_addr,
            self.write_toggle,
            self.oam_addr,
            self.oam_data,
            self.ppu_data,
            self.latch,
        )
    }
}

impl Ppu {
    /// Reads the readable ports under protection.
    ///
    /// The vblank flag, write toggle, PPUDATA cursor and latch are all left
    /// exactly as they were.
    pub fn debug_registers(&mut self) -> RegisterSnapshot {
        let mut ppu = self.protect();
        let snapshot = RegisterSnapshot {
            status: ppu.read_status(),
            oam_data: ppu.read_oam_data(),
            ppu_data: ppu.read_data(),
            ppu_addr: ppu.ppu_addr(),
            write_toggle: ppu.write_toggle(),
            oam_addr: ppu.oam_addr(),
            latch: ppu.latch(),
            scanline: ppu.scanline(),
            dot: ppu.dot(),
            frame: ppu.frame_count(),
        };
        trace!(%snapshot, "register snapshot");
        snapshot
    }
}
