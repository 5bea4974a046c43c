//! Picture Processing Unit (2C02).
//!
//! The CPU talks to the PPU through eight registers mirrored across
//! `$2000-$3FFF` plus the OAM DMA port at `$4014`. Everything behind those
//! ports lives here: the register file, VRAM and OAM, the dot/scanline clock
//! with its vblank and NMI timing, and a per-dot renderer writing palette
//! indices into a double-buffered frame.
//!
//! Time is measured in master cycles, one per PPU dot. After
//! [`step_to(c)`](Ppu::step_to) the PPU sits on dot `c % 341` of scanline
//! `(c / 341) % 262`, with the events of that dot already applied.

pub mod address;
pub mod buffer;
pub mod debug;
pub mod palette;
pub mod registers;
pub mod sprite;
pub mod timing;

mod background;
mod latch;
mod ports;
mod protect;

use core::fmt;

use tracing::debug;

use crate::{
    component::{Component, NmiLine, SystemLink},
    config::PpuConfig,
    error::Error,
    mem_block::ppu::{OamRam, Vram},
    memory::ppu as ppu_mem,
};
use background::TileFetch;
use buffer::{FrameBuffer, Pixel};
use registers::{Control, Mask, Registers, Status};
use sprite::SpriteLine;
use timing::{POST_RENDER_SCANLINE, PRE_RENDER_SCANLINE, Position, PpuState, VBLANK_SCANLINE};

pub use address::translate;
pub use debug::RegisterSnapshot;
pub use protect::ProtectGuard;

/// Last dot of a scanline that outputs a pixel.
const LAST_VISIBLE_DOT: u16 = 256;
/// Dot at which sprites for the next scanline are evaluated.
const SPRITE_EVAL_DOT: u16 = 257;

#[derive(Clone)]
pub struct Ppu {
    registers: Registers,
    /// Flat 16 KiB address space, indexed only through [`translate`].
    vram: Vram,
    oam: OamRam,
    position: Position,
    state: PpuState,
    config: PpuConfig,
    /// Highest cycle any caller has asked to reach.
    target: u64,
    frame_buffer: FrameBuffer,
    /// Set when a frame is published, cleared by [`Ppu::take_frame_ready`].
    frame_ready: bool,
    bg_tile: TileFetch,
    sprite_line: SpriteLine,
    nmi: NmiLine,
    stop_logged: bool,
}

impl fmt::Debug for Ppu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ppu")
            .field("registers", &self.registers)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("config", &self.config)
            .field("nmi", &self.nmi)
            .finish_non_exhaustive()
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Creates a powered-on PPU with cleared memories and an unconnected NMI line.
    pub fn new() -> Self {
        Self::with_config(PpuConfig::default())
    }

    pub fn with_config(config: PpuConfig) -> Self {
        Self {
            registers: Registers::new(),
            vram: Vram::new(),
            oam: OamRam::new(),
            position: Position::default(),
            state: PpuState::default(),
            config,
            target: 0,
            frame_buffer: FrameBuffer::new(),
            frame_ready: false,
            bg_tile: TileFetch::default(),
            sprite_line: SpriteLine::default(),
            nmi: NmiLine::new(),
            stop_logged: false,
        }
    }

    /// Halts the clock once `frame` frames have completed.
    pub fn stop_after_frame(&mut self, frame: u64) {
        self.config.stop_after_frame = Some(frame);
        self.stop_logged = false;
    }

    /// Reads the PPU address space through the mirror translator.
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.vram[translate(addr) as usize]
    }

    /// Writes the PPU address space through the mirror translator.
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.vram[translate(addr) as usize] = value;
    }

    /// Copies CHR data to `$0000`. Both pattern tables fit in 8 KiB.
    pub fn load_pattern_tables(&mut self, chr: &[u8]) -> Result<(), Error> {
        if chr.len() > ppu_mem::CHR_SIZE {
            return Err(Error::PatternDataTooLarge { actual: chr.len() });
        }
        self.vram[..chr.len()].copy_from_slice(chr);
        Ok(())
    }

    /// Writes `data` through the translator starting at `addr`, as a run of
    /// PPUDATA writes with increment 1 would.
    pub fn load_vram(&mut self, addr: u16, data: &[u8]) -> Result<(), Error> {
        if addr as usize + data.len() > ppu_mem::VRAM_SIZE {
            return Err(Error::VramOverflow {
                addr,
                len: data.len(),
            });
        }
        for (offset, &value) in data.iter().enumerate() {
            self.write_byte(addr + offset as u16, value);
        }
        Ok(())
    }

    /// Replaces the whole sprite memory.
    pub fn load_oam(&mut self, image: &[u8]) -> Result<(), Error> {
        if image.len() != ppu_mem::OAM_RAM_SIZE {
            return Err(Error::OamSize {
                actual: image.len(),
            });
        }
        self.oam.copy_from_slice(image);
        Ok(())
    }

    /// `true` once the warm-up period has elapsed and PPUCTRL, PPUMASK and
    /// PPUSCROLL accept writes.
    pub fn is_ready(&self) -> bool {
        self.position.cycle >= self.config.warmup_cycles
    }

    /// `true` while both background and sprite rendering are disabled.
    pub fn is_render_off(&self) -> bool {
        !self.registers.mask.rendering_enabled()
    }

    pub fn is_protected(&self) -> bool {
        self.registers.protect
    }

    /// Suspends destructive side effects until the returned guard drops.
    pub fn protect(&mut self) -> ProtectGuard<'_> {
        ProtectGuard::new(self)
    }

    /// Runs `f` with destructive side effects suspended.
    pub fn with_protection<R>(&mut self, f: impl FnOnce(&mut Ppu) -> R) -> R {
        let mut guard = self.protect();
        f(&mut *guard)
    }

    pub fn is_stopped(&self) -> bool {
        self.config
            .stop_after_frame
            .is_some_and(|frame| self.position.frame >= frame)
    }

    pub fn control(&self) -> Control {
        self.registers.control
    }

    pub fn mask(&self) -> Mask {
        self.registers.mask
    }

    pub fn status(&self) -> Status {
        self.registers.status
    }

    pub fn ppu_addr(&self) -> u16 {
        self.registers.ppu_addr
    }

    pub fn write_toggle(&self) -> u8 {
        self.registers.write_toggle
    }

    /// `(x, y)` as last written through PPUSCROLL.
    pub fn scroll(&self) -> (u8, u8) {
        (self.registers.scroll_x, self.registers.scroll_y)
    }

    pub fn oam_addr(&self) -> u8 {
        self.registers.oam_addr
    }

    pub fn latch(&self) -> u8 {
        self.registers.latch.sample()
    }

    pub fn oam(&self) -> &[u8] {
        &self.oam
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> PpuState {
        self.state
    }

    pub fn config(&self) -> &PpuConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u64 {
        self.position.frame
    }

    pub fn scanline(&self) -> u16 {
        self.position.scanline
    }

    pub fn dot(&self) -> u16 {
        self.position.dot
    }

    pub fn cycle(&self) -> u64 {
        self.position.cycle
    }

    /// The NMI line this PPU drives; replaced on [`Component::power_on`].
    pub fn nmi_line(&self) -> &NmiLine {
        &self.nmi
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Returns `true` once per published frame.
    pub fn take_frame_ready(&mut self) -> bool {
        core::mem::take(&mut self.frame_ready)
    }

    /// Advances to the absolute master cycle `cycle`.
    ///
    /// # Panics
    ///
    /// Panics when `cycle` is below a previously requested target.
    pub fn step_to(&mut self, cycle: u64) {
        assert!(
            cycle >= self.target,
            "PPU stepped backwards: {} -> {}",
            self.target,
            cycle
        );
        self.target = cycle;

        while self.position.cycle < cycle {
            if self.is_stopped() {
                if !self.stop_logged {
                    debug!(
                        frame = self.position.frame,
                        cycle = self.position.cycle,
                        "frame limit reached, PPU halted"
                    );
                    self.stop_logged = true;
                }
                return;
            }
            self.clock();
        }
    }

    /// Advances a single dot and applies the events of the dot landed on.
    pub fn clock(&mut self) {
        self.position.advance();
        let Position { scanline, dot, .. } = self.position;

        match (scanline, dot) {
            (VBLANK_SCANLINE, 1) => self.enter_vblank(),
            (PRE_RENDER_SCANLINE, 1) => {
                self.registers.status.remove(Status::all());
                self.state = self.state.on_pre_render();
            }
            (PRE_RENDER_SCANLINE, SPRITE_EVAL_DOT) => self.sprite_line.clear(),
            (POST_RENDER_SCANLINE, 0) => self.publish_frame(),
            _ if self.position.is_visible_line() => self.visible_dot(scanline, dot),
            _ => {}
        }
    }

    fn enter_vblank(&mut self) {
        self.registers.status.insert(Status::VBLANK);
        let previous = self.state;
        self.state = self.state.on_vblank_start();
        if self.state != previous {
            debug!(from = ?previous, to = ?self.state, "PPU lifecycle");
        }
        if self.registers.control.vblank_nmi() {
            debug!(frame = self.position.frame, "NMI raised");
            self.nmi.raise();
        }
    }

    fn publish_frame(&mut self) {
        self.frame_buffer.swap();
        self.frame_ready = true;
        debug!(frame = self.position.frame, "frame complete");
    }

    fn visible_dot(&mut self, scanline: u16, dot: u16) {
        match dot {
            1..=LAST_VISIBLE_DOT => {
                if dot == 1 {
                    self.bg_tile.invalidate();
                }
                let previous = self.state;
                self.state = self.state.on_visible_dot();
                if self.state != previous {
                    debug!(frame = self.position.frame, "PPU rendering");
                }
                let (x, y) = ((dot - 1) as usize, scanline as usize);
                if self.is_render_off() {
                    // Forced blanking: no fetches, the backdrop fills the line.
                    self.frame_buffer.put(x, y, Pixel::BACKDROP);
                } else {
                    self.render_pixel(x, y);
                }
            }
            SPRITE_EVAL_DOT => {
                if self.is_render_off() {
                    self.sprite_line.clear();
                } else {
                    self.evaluate_sprites(scanline);
                }
            }
            _ => {}
        }
    }

    /// Composites background and sprite layers at `(x, y)`.
    fn render_pixel(&mut self, x: usize, y: usize) {
        let mask = self.registers.mask;
        let bg = if mask.background_visible_at(x) {
            self.background_index(x, y)
        } else {
            0
        };
        let sprite = if mask.sprites_visible_at(x) {
            self.sprite_line.pixel_at(x)
        } else {
            None
        };

        let pixel = match sprite {
            Some(sp) => {
                if sp.sprite_zero && bg != 0 && x != 255 {
                    self.registers.status.insert(Status::SPRITE_ZERO_HIT);
                }
                if bg == 0 || !sp.behind_background {
                    Pixel::sprite(sp.index)
                } else {
                    Pixel::background(bg)
                }
            }
            None => Pixel::background(bg),
        };
        self.frame_buffer.put(x, y, pixel);
    }
}

impl Component for Ppu {
    fn power_on(&mut self, link: &SystemLink) {
        *self = Self::with_config(self.config);
        self.nmi = link.nmi.clone();
        debug!(warmup_cycles = self.config.warmup_cycles, "PPU power-on");
    }

    fn reset(&mut self) {
        self.registers.warm_reset();
        debug!(cycle = self.position.cycle, "PPU reset");
    }

    fn step_to(&mut self, cycle: u64) {
        Ppu::step_to(self, cycle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::timing::CYCLES_PER_FRAME;

    fn ready_ppu() -> Ppu {
        Ppu::with_config(PpuConfig::default().with_warmup_cycles(0))
    }

    #[test]
    fn step_to_lands_on_the_requested_dot() {
        let mut ppu = Ppu::new();
        ppu.step_to(Position::cycle_of(0, 241, 0));
        assert_eq!((ppu.scanline(), ppu.dot()), (241, 0));
        assert!(!ppu.status().contains(Status::VBLANK));

        ppu.step_to(Position::cycle_of(0, 241, 1));
        assert!(ppu.status().contains(Status::VBLANK));

        ppu.step_to(Position::cycle_of(0, 261, 0));
        assert!(ppu.status().contains(Status::VBLANK));
        ppu.step_to(Position::cycle_of(0, 261, 1));
        assert!(!ppu.status().contains(Status::VBLANK));
    }

    #[test]
    fn pre_render_clears_every_flag() {
        let mut ppu = Ppu::new();
        ppu.step_to(Position::cycle_of(0, 250, 0));
        ppu.registers.status = Status::all();
        ppu.step_to(Position::cycle_of(0, 261, 1));
        assert_eq!(ppu.status(), Status::empty());
    }

    #[test]
    #[should_panic(expected = "stepped backwards")]
    fn stepping_backwards_panics() {
        let mut ppu = Ppu::new();
        ppu.step_to(1_000);
        ppu.step_to(999);
    }

    #[test]
    fn write_gate_opens_at_warmup_cycle() {
        let mut ppu = Ppu::new();
        ppu.step_to(crate::config::WARMUP_CYCLES - 1);
        ppu.write_ctrl(0x80);
        assert_eq!(ppu.control(), Control::empty());
        ppu.step_to(crate::config::WARMUP_CYCLES);
        ppu.write_ctrl(0x80);
        assert!(ppu.control().vblank_nmi());
    }

    #[test]
    fn lifecycle_reaches_rendering_on_third_frame() {
        let mut ppu = Ppu::new();
        ppu.step_to(Position::cycle_of(0, 241, 1));
        assert_eq!(ppu.state(), PpuState::FirstVblank);
        ppu.step_to(Position::cycle_of(1, 241, 1));
        assert_eq!(ppu.state(), PpuState::SecondVblank);
        ppu.step_to(Position::cycle_of(1, 261, 1));
        assert_eq!(ppu.state(), PpuState::Ready);
        ppu.step_to(Position::cycle_of(2, 0, 1));
        assert_eq!(ppu.state(), PpuState::Rendering);
    }

    #[test]
    fn stop_after_frame_halts_the_clock() {
        let mut ppu = Ppu::with_config(PpuConfig::default().with_stop_after_frame(1));
        ppu.step_to(CYCLES_PER_FRAME * 3);
        assert_eq!(ppu.cycle(), CYCLES_PER_FRAME);
        assert_eq!(ppu.frame_count(), 1);
        assert!(ppu.is_stopped());

        ppu.stop_after_frame(2);
        ppu.step_to(CYCLES_PER_FRAME * 3);
        assert_eq!(ppu.frame_count(), 2);
    }

    #[test]
    fn frame_is_published_once_per_frame() {
        let mut ppu = Ppu::new();
        ppu.step_to(Position::cycle_of(0, 239, 340));
        assert!(!ppu.take_frame_ready());
        ppu.step_to(Position::cycle_of(0, 240, 0));
        assert!(ppu.take_frame_ready());
        assert!(!ppu.take_frame_ready());
    }

    #[test]
    fn loaders_validate_sizes() {
        let mut ppu = Ppu::new();
        assert_eq!(
            ppu.load_pattern_tables(&[0; 0x2001]),
            Err(Error::PatternDataTooLarge { actual: 0x2001 })
        );
        assert_eq!(
            ppu.load_vram(0x3FFF, &[1, 2]),
            Err(Error::VramOverflow { addr: 0x3FFF, len: 2 })
        );
        assert_eq!(ppu.load_oam(&[0; 255]), Err(Error::OamSize { actual: 255 }));

        ppu.load_pattern_tables(&[7; 16]).unwrap();
        ppu.load_vram(0x3FFF, &[9]).unwrap();
        assert_eq!(ppu.read_byte(0x000F), 7);
        assert_eq!(ppu.read_byte(0x3F1F), 9);
        assert_eq!(ppu.vram[0x3F0F], 9);
    }

    #[test]
    fn power_on_wipes_state_and_binds_link() {
        let mut ppu = ready_ppu();
        ppu.write_ctrl(0x80);
        ppu.write_byte(0x2000, 0x55);
        ppu.step_to(500);

        let link = SystemLink::new();
        ppu.power_on(&link);
        assert_eq!(ppu.cycle(), 0);
        assert_eq!(ppu.control(), Control::empty());
        assert_eq!(ppu.read_byte(0x2000), 0);
        assert_eq!(ppu.config().warmup_cycles, 0);

        ppu.write_ctrl(0x80);
        ppu.step_to(Position::cycle_of(0, 241, 1));
        assert_eq!(link.nmi.raised_count(), 1);
    }

    #[test]
    fn reset_keeps_memories_and_timing() {
        let mut ppu = ready_ppu();
        ppu.write_ctrl(0x80);
        ppu.write_mask(0x1E);
        ppu.write_byte(0x2000, 0x55);
        ppu.step_to(Position::cycle_of(0, 241, 1));

        Component::reset(&mut ppu);
        assert_eq!(ppu.control(), Control::empty());
        assert_eq!(ppu.mask(), Mask::empty());
        assert_eq!(ppu.read_byte(0x2000), 0x55);
        assert_eq!(ppu.scanline(), 241);
        assert!(ppu.status().contains(Status::VBLANK));
    }

    #[test]
    fn sprite_zero_never_hits_at_last_column() {
        let mut ppu = ready_ppu();
        // Tile 1: all pixels colour 1.
        ppu.load_pattern_tables(&[[0u8; 16], [0xFF; 16]].concat()).unwrap();
        for addr in 0x2000..0x23C0 {
            ppu.write_byte(addr, 1);
        }
        let mut oam = [0xFFu8; 256];
        oam[..4].copy_from_slice(&[9, 1, 0, 255]);
        ppu.load_oam(&oam).unwrap();
        ppu.write_mask(0x1E);

        ppu.step_to(Position::cycle_of(0, 20, 0));
        assert!(!ppu.status().contains(Status::SPRITE_ZERO_HIT));
    }
}
