//! CPU-facing register ports and their side effects.

use tracing::{debug, trace};

use super::{
    Ppu,
    registers::{Control, LATCH_MASK, Mask, Status},
};
use crate::{
    memory::ppu::{self as ppu_mem, Register},
    system::DmaSource,
};

impl Ppu {
    /// Handles a CPU write anywhere in `$2000-$3FFF`.
    ///
    /// `$4014` needs CPU memory and goes through
    /// [`write_oam_dma`](Self::write_oam_dma) instead.
    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        match Register::from_cpu_addr(addr) {
            Register::Control => self.write_ctrl(value),
            Register::Mask => self.write_mask(value),
            Register::Status | Register::OamDma => {}
            Register::OamAddr => self.write_oam_addr(value),
            Register::OamData => self.write_oam_data(value),
            Register::Scroll => self.write_scroll(value),
            Register::Addr => self.write_addr(value),
            Register::Data => self.write_data(value),
        }
    }

    /// Handles a CPU read anywhere in `$2000-$3FFF`.
    ///
    /// Write-only registers answer with the latch, which they leave untouched.
    pub fn cpu_read(&mut self, addr: u16) -> u8 {
        let register = Register::from_cpu_addr(addr);
        if !register.is_readable() {
            return self.registers.latch.sample();
        }
        match register {
            Register::Status => self.read_status(),
            Register::OamData => self.read_oam_data(),
            _ => self.read_data(),
        }
    }

    fn gate_write(&self, register: Register, value: u8) -> bool {
        let ready = self.is_ready();
        if !ready {
            trace!(
                ?register,
                value,
                cycle = self.position.cycle,
                "register write dropped before warm-up"
            );
        }
        ready
    }

    /// PPUCTRL (`$2000`).
    pub fn write_ctrl(&mut self, value: u8) {
        if !self.gate_write(Register::Control, value) {
            return;
        }
        self.registers.drive_latch(value);
        self.registers.control = Control::from_bits_retain(value);
    }

    /// PPUMASK (`$2001`).
    pub fn write_mask(&mut self, value: u8) {
        if !self.gate_write(Register::Mask, value) {
            return;
        }
        self.registers.drive_latch(value);
        self.registers.mask = Mask::from_bits_retain(value);
    }

    /// PPUSTATUS (`$2002`).
    ///
    /// The low five bits come from the latch. Unless protected, the read
    /// clears vblank and resets the shared write toggle.
    pub fn read_status(&mut self) -> u8 {
        let regs = &mut self.registers;
        let status = regs.latch.apply(LATCH_MASK, regs.status.bits());
        if !regs.protect {
            regs.status.remove(Status::VBLANK);
            regs.write_toggle = 0;
        }
        regs.drive_latch(status);
        status
    }

    /// OAMADDR (`$2003`).
    pub fn write_oam_addr(&mut self, value: u8) {
        self.registers.drive_latch(value);
        self.registers.oam_addr = value;
    }

    /// OAMDATA (`$2004`) write; the cursor advances and wraps at 256.
    pub fn write_oam_data(&mut self, value: u8) {
        self.registers.drive_latch(value);
        let cursor = self.registers.oam_addr;
        self.oam[cursor as usize] = value;
        self.registers.oam_addr = cursor.wrapping_add(1);
    }

    /// OAMDATA (`$2004`) read; the cursor stays put.
    pub fn read_oam_data(&mut self) -> u8 {
        let value = self.oam[self.registers.oam_addr as usize];
        self.registers.drive_latch(value);
        value
    }

    /// PPUSCROLL (`$2005`). The toggle landing on 1 selects X, on 0 selects Y.
    pub fn write_scroll(&mut self, value: u8) {
        if !self.gate_write(Register::Scroll, value) {
            return;
        }
        self.registers.drive_latch(value);
        if self.registers.flip_toggle() == 1 {
            self.registers.scroll_x = value;
        } else {
            self.registers.scroll_y = value;
        }
    }

    /// PPUADDR (`$2006`). High byte first, low byte second.
    pub fn write_addr(&mut self, value: u8) {
        self.registers.drive_latch(value);
        let addr = self.registers.ppu_addr;
        self.registers.ppu_addr = if self.registers.flip_toggle() == 1 {
            (addr & 0x00FF) | (value as u16) << 8
        } else {
            (addr & 0xFF00) | value as u16
        };
    }

    /// PPUDATA (`$2007`) write.
    pub fn write_data(&mut self, value: u8) {
        self.registers.drive_latch(value);
        let addr = self.registers.ppu_addr;
        self.write_byte(addr, value);
        self.registers.ppu_addr = addr.wrapping_add(self.registers.control.addr_increment());
    }

    /// PPUDATA (`$2007`) read. Returns the stored byte directly; the cursor
    /// only advances when unprotected.
    pub fn read_data(&mut self) -> u8 {
        let addr = self.registers.ppu_addr;
        let value = self.read_byte(addr);
        if !self.registers.protect {
            self.registers.ppu_addr = addr.wrapping_add(self.registers.control.addr_increment());
        }
        self.registers.drive_latch(value);
        value
    }

    /// OAMDMA (`$4014`): copies `page * $100 ..= page * $100 + $FF` into OAM,
    /// starting at the OAM cursor and wrapping within OAM.
    ///
    /// The copy is atomic here; stalling the CPU for 513/514 cycles is the
    /// host's job.
    pub fn write_oam_dma<S: DmaSource + ?Sized>(&mut self, page: u8, source: &mut S) {
        let base = (page as u16) << 8;
        let start = self.registers.oam_addr;
        debug!(page, cursor = start, "OAM DMA");

        for offset in 0..ppu_mem::OAM_RAM_SIZE as u16 {
            let value = source.dma_read(base + offset);
            self.oam[start.wrapping_add(offset as u8) as usize] = value;
            // Each byte travels over OAMDATA, so the latch ends on the last one.
            self.registers.drive_latch(value);
        }
    }
}
