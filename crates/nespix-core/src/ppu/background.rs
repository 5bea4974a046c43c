//! Background tile fetch.
//!
//! Each tile is fetched once when the beam enters it: name-table byte,
//! attribute byte, then the two pattern bit-planes for the current row. The
//! latched fetch then feeds the pixels of that tile until the beam moves on.

use super::{Ppu, registers::Control};
use crate::memory::ppu as ppu_mem;

/// Width and height of the four-screen background plane.
const PLANE_WIDTH: usize = 512;
const PLANE_HEIGHT: usize = 480;

/// Identifies one row of one tile in the four-screen plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TileRow {
    nametable: u16,
    coarse_x: u16,
    coarse_y: u16,
    fine_y: u16,
}

impl TileRow {
    fn nametable_base(self) -> u16 {
        ppu_mem::NAMETABLE_BASE + self.nametable * ppu_mem::NAMETABLE_SIZE
    }

    fn name_addr(self) -> u16 {
        self.nametable_base() + self.coarse_y * 32 + self.coarse_x
    }

    fn attribute_addr(self) -> u16 {
        self.nametable_base()
            + ppu_mem::ATTRIBUTE_OFFSET
            + (self.coarse_y / 4) * 8
            + self.coarse_x / 4
    }

    /// Shift selecting this tile's quadrant inside its attribute byte.
    fn attribute_shift(self) -> u8 {
        (((self.coarse_y & 2) << 1) | (self.coarse_x & 2)) as u8
    }
}

/// Finds the tile row under screen pixel `(x, y)` and the column inside it.
pub(crate) fn locate(
    control: Control,
    scroll_x: u8,
    scroll_y: u8,
    x: usize,
    y: usize,
) -> (TileRow, u8) {
    let nt = control.nametable_index() as usize;
    let px = (x + scroll_x as usize + (nt & 1) * 256) % PLANE_WIDTH;
    let py = (y + scroll_y as usize + (nt >> 1) * 240) % PLANE_HEIGHT;

    let (local_x, local_y) = (px % 256, py % 240);
    let row = TileRow {
        nametable: ((px / 256) + (py / 240) * 2) as u16,
        coarse_x: (local_x / 8) as u16,
        coarse_y: (local_y / 8) as u16,
        fine_y: (local_y % 8) as u16,
    };
    (row, (local_x % 8) as u8)
}

/// Data latched by the most recent tile fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct TileFetch {
    row: Option<TileRow>,
    /// Attribute palette select, already placed in bits 2-3.
    palette_high: u8,
    /// `[bitplane0, bitplane1]`.
    pattern: [u8; 2],
}

impl TileFetch {
    pub(crate) fn invalidate(&mut self) {
        self.row = None;
    }

    /// 4-bit palette index of column `fine_x` (0 = transparent).
    fn pixel(&self, fine_x: u8) -> u8 {
        let bit = 7 - fine_x;
        let value = ((self.pattern[1] >> bit) & 1) << 1 | ((self.pattern[0] >> bit) & 1);
        if value == 0 { 0 } else { self.palette_high | value }
    }
}

impl Ppu {
    /// Background palette index at screen pixel `(x, y)`, fetching the tile
    /// when the beam has moved onto a new one.
    pub(super) fn background_index(&mut self, x: usize, y: usize) -> u8 {
        let regs = &self.registers;
        let (row, fine_x) = locate(regs.control, regs.scroll_x, regs.scroll_y, x, y);
        if self.bg_tile.row != Some(row) {
            self.fetch_tile(row);
        }
        self.bg_tile.pixel(fine_x)
    }

    fn fetch_tile(&mut self, row: TileRow) {
        let tile_index = self.read_byte(row.name_addr());
        let attribute = self.read_byte(row.attribute_addr());
        let pattern_addr = self.registers.control.background_pattern_addr()
            + tile_index as u16 * 16
            + row.fine_y;

        self.bg_tile = TileFetch {
            row: Some(row),
            palette_high: ((attribute >> row.attribute_shift()) & 0b11) << 2,
            pattern: [self.read_byte(pattern_addr), self.read_byte(pattern_addr + 8)],
        };
    }
}
