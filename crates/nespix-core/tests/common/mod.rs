#![allow(dead_code)]

use anyhow::{Result, bail, ensure};
use nespix_core::{
    Ppu, PpuConfig,
    ppu::timing::{CYCLES_PER_FRAME, Position},
};

/// PPUMASK: background and sprites on, including the leftmost column.
pub const MASK_SHOW_ALL: u8 = 0x1E;
/// PPUMASK: background only, including the leftmost column.
pub const MASK_BACKGROUND: u8 = 0x0A;
/// PPUMASK: sprites only, including the leftmost column.
pub const MASK_SPRITES: u8 = 0x14;

/// A PPU whose write gate is already open.
pub fn ready_ppu() -> Ppu {
    Ppu::with_config(PpuConfig::default().with_warmup_cycles(0))
}

/// One 8×8 tile whose every pixel has colour `value` (0..=3).
pub fn solid_tile(value: u8) -> [u8; 16] {
    let mut tile = [0u8; 16];
    if value & 1 != 0 {
        tile[..8].fill(0xFF);
    }
    if value & 2 != 0 {
        tile[8..].fill(0xFF);
    }
    tile
}

/// Writes `tile` as tile number `index` of pattern table `table` (0 or 1).
pub fn put_tile(ppu: &mut Ppu, table: u16, index: u8, tile: &[u8; 16]) -> Result<()> {
    ensure!(table < 2, "pattern table {table} does not exist");
    let addr = table * 0x1000 + index as u16 * 16;
    ppu.load_vram(addr, tile)?;
    Ok(())
}

/// Fills the tile area of name table 0 with `tile`.
pub fn fill_nametable(ppu: &mut Ppu, tile: u8) -> Result<()> {
    ppu.load_vram(0x2000, &[tile; 0x3C0])?;
    Ok(())
}

/// An OAM image with every sprite parked below the screen.
pub fn hidden_oam() -> [u8; 256] {
    [0xFF; 256]
}

/// Writes through PPUADDR/PPUDATA the way a game would.
pub fn write_via_ports(ppu: &mut Ppu, addr: u16, data: &[u8]) {
    ppu.write_addr((addr >> 8) as u8);
    ppu.write_addr(addr as u8);
    for &byte in data {
        ppu.write_data(byte);
    }
}

/// Steps to `(scanline, dot)` of the current frame.
pub fn run_to(ppu: &mut Ppu, scanline: u16, dot: u16) -> Result<()> {
    let target = Position::cycle_of(ppu.frame_count(), scanline, dot);
    ensure!(
        target >= ppu.cycle(),
        "({scanline}, {dot}) already passed in frame {}",
        ppu.frame_count()
    );
    ppu.step_to(target);
    if ppu.cycle() != target {
        bail!("PPU halted at cycle {} before reaching {target}", ppu.cycle());
    }
    Ok(())
}

/// Renders the rest of the current frame and checks that it was published.
pub fn render_frame(ppu: &mut Ppu) -> Result<()> {
    run_to(ppu, 240, 0)?;
    ensure!(ppu.take_frame_ready(), "frame {} was not published", ppu.frame_count());
    Ok(())
}

pub fn frames(n: u64) -> u64 {
    n * CYCLES_PER_FRAME
}
