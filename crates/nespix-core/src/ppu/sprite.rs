use bitflags::bitflags;

use super::{Ppu, registers::Status};

/// Sprites the PPU can draw on one scanline.
pub const SPRITES_PER_LINE: usize = 8;
const BYTES_PER_SPRITE: usize = 4;

bitflags! {
    /// Attribute bits stored in sprite byte 2.
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// V H P . . . p p
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpriteAttributes: u8 {
        const PALETTE = 0b0000_0011;
        const BEHIND_BACKGROUND = 0b0010_0000;
        const FLIP_HORIZONTAL = 0b0100_0000;
        const FLIP_VERTICAL = 0b1000_0000;
    }
}

impl SpriteAttributes {
    pub fn palette(self) -> u8 {
        self.bits() & 0b11
    }
}

/// Decoded copy of one OAM record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OamEntry {
    /// Top row minus one: the sprite is drawn from scanline `y + 1`.
    pub y: u8,
    pub tile: u8,
    pub attributes: SpriteAttributes,
    pub x: u8,
}

impl OamEntry {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), BYTES_PER_SPRITE);
        Self {
            y: bytes[0],
            tile: bytes[1],
            attributes: SpriteAttributes::from_bits_retain(bytes[2]),
            x: bytes[3],
        }
    }

    /// Iterates over the 64 records of an OAM image.
    pub fn iter(oam: &[u8]) -> impl Iterator<Item = OamEntry> + '_ {
        oam.chunks_exact(BYTES_PER_SPRITE).map(OamEntry::from_bytes)
    }

    /// Pattern-table address of sprite row `row` (`0..height`, flip applied).
    fn pattern_addr(&self, row: u8, height: u8, table_8x8: u16) -> u16 {
        let row = if self.attributes.contains(SpriteAttributes::FLIP_VERTICAL) {
            height - 1 - row
        } else {
            row
        };
        let (table, tile) = if height == 16 {
            let table = if self.tile & 1 != 0 { 0x1000 } else { 0x0000 };
            (table, (self.tile & 0xFE) as u16 + (row / 8) as u16)
        } else {
            (table_8x8, self.tile as u16)
        };
        table + tile * 16 + (row % 8) as u16
    }
}

/// A sprite selected for the scanline being drawn, pattern already fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
struct LineSprite {
    x: u8,
    attributes: SpriteAttributes,
    /// `[bitplane0, bitplane1]`, horizontally flipped when requested.
    pattern: [u8; 2],
    sprite_zero: bool,
}

/// Opaque sprite pixel found at a screen column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpritePixel {
    /// 4-bit palette index (sprite palette in bits 2-3).
    pub(crate) index: u8,
    pub(crate) behind_background: bool,
    pub(crate) sprite_zero: bool,
}

/// Up to eight sprites for one scanline, in OAM order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct SpriteLine {
    sprites: [LineSprite; SPRITES_PER_LINE],
    count: usize,
}

impl SpriteLine {
    pub(crate) fn clear(&mut self) {
        self.count = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    fn push(&mut self, sprite: LineSprite) {
        self.sprites[self.count] = sprite;
        self.count += 1;
    }

    /// First opaque sprite pixel at column `x`; lower OAM index wins.
    pub(crate) fn pixel_at(&self, x: usize) -> Option<SpritePixel> {
        self.sprites[..self.count].iter().find_map(|sprite| {
            let offset = x.checked_sub(sprite.x as usize).filter(|&o| o < 8)?;
            let bit = 7 - offset;
            let value = ((sprite.pattern[1] >> bit) & 1) << 1 | ((sprite.pattern[0] >> bit) & 1);
            (value != 0).then(|| SpritePixel {
                index: (sprite.attributes.palette() << 2) | value,
                behind_background: sprite.attributes.contains(SpriteAttributes::BEHIND_BACKGROUND),
                sprite_zero: sprite.sprite_zero,
            })
        })
    }
}

impl Ppu {
    /// Selects the sprites that cover the scanline after `scanline`.
    ///
    /// More than eight candidates raise sprite overflow. The hardware's
    /// diagonal-scan false positives and negatives are not reproduced.
    pub(super) fn evaluate_sprites(&mut self, scanline: u16) {
        let height = self.registers.control.sprite_height();
        let table = self.registers.control.sprite_pattern_addr();
        let mut line = SpriteLine::default();
        let mut overflow = false;

        for (n, entry) in OamEntry::iter(&self.oam).enumerate() {
            let Some(row) = scanline.checked_sub(entry.y as u16).filter(|&r| r < height as u16)
            else {
                continue;
            };
            if line.len() == SPRITES_PER_LINE {
                overflow = true;
                break;
            }

            let addr = entry.pattern_addr(row as u8, height, table);
            let mut pattern = [self.read_byte(addr), self.read_byte(addr + 8)];
            if entry.attributes.contains(SpriteAttributes::FLIP_HORIZONTAL) {
                pattern = pattern.map(u8::reverse_bits);
            }
            line.push(LineSprite {
                x: entry.x,
                attributes: entry.attributes,
                pattern,
                sprite_zero: n == 0,
            });
        }

        if overflow {
            self.registers.status.insert(Status::SPRITE_OVERFLOW);
        }
        self.sprite_line = line;
    }
}
