//! Palette lookup and conversion of finished frames to RGB.

use super::{Ppu, buffer::Pixel};
use crate::memory::ppu as ppu_mem;

/// 2C02 NTSC master palette as `0xRRGGBB`.
pub const NTSC_RGB: [u32; 64] = [
    0x545454, 0x001E74, 0x081090, 0x300088, 0x440064, 0x5C0030, 0x540400, 0x3C1800,
    0x202A00, 0x083A00, 0x004000, 0x003C00, 0x00302C, 0x000000, 0x000000, 0x000000,
    0x989698, 0x084CC4, 0x3032EC, 0x5C1EE4, 0x8814B0, 0xA01464, 0x982220, 0x783C00,
    0x545A00, 0x287200, 0x087C00, 0x007628, 0x006678, 0x000000, 0x000000, 0x000000,
    0xECEEEC, 0x3C7EEC, 0x5C5CEC, 0x8844EC, 0xB02CEC, 0xE028B0, 0xD83C50, 0xC45400,
    0xAC7000, 0x808800, 0x409C30, 0x20A458, 0x209A88, 0x404040, 0x000000, 0x000000,
    0xECEEEC, 0xA8BCEC, 0xBCACEC, 0xD4A0EC, 0xEC94EC, 0xEC90D4, 0xEC9CB4, 0xE4B090,
    0xDCC878, 0xD4DC78, 0xB8EC98, 0xA8ECBC, 0xA0E4E4, 0xA0A0A0, 0x000000, 0x000000,
];

/// Colour index bits that survive grayscale mode.
const GRAYSCALE_MASK: u8 = 0x30;

/// Palette-RAM address a 4-bit palette index resolves through.
///
/// Index 0 of every group is the one shared backdrop at `$3F00`, whichever
/// layer asks for it.
pub fn palette_addr(is_background: bool, index: u8) -> u16 {
    let index = (index & 0x0F) as u16;
    if index == 0 {
        ppu_mem::PALETTE_BASE
    } else if is_background {
        ppu_mem::PALETTE_BASE | index
    } else {
        ppu_mem::SPRITE_PALETTE_BASE | index
    }
}

impl Ppu {
    /// Colour byte stored for a 4-bit palette index of the given layer.
    pub fn palette_color(&self, is_background: bool, index: u8) -> u8 {
        self.read_byte(palette_addr(is_background, index))
    }

    /// Colour byte for a frame-buffer cell.
    pub fn pixel_color(&self, pixel: Pixel) -> u8 {
        let color = self.palette_color(pixel.is_background(), pixel.palette_index()) & 0x3F;
        if self.registers.mask.grayscale() {
            color & GRAYSCALE_MASK
        } else {
            color
        }
    }

    /// The last completed frame as `0xRRGGBB`, row-major.
    pub fn frame_rgb(&self) -> Vec<u32> {
        self.frame_buffer
            .pixels()
            .map(|pixel| NTSC_RGB[self.pixel_color(pixel) as usize])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backdrop_is_shared_by_both_layers() {
        assert_eq!(palette_addr(true, 0), 0x3F00);
        assert_eq!(palette_addr(false, 0), 0x3F00);
        assert_eq!(palette_addr(true, 0x5), 0x3F05);
        assert_eq!(palette_addr(false, 0x5), 0x3F15);
    }

    #[test]
    fn sprite_half_shares_storage_with_background_half() {
        let mut ppu = Ppu::new();
        ppu.write_byte(0x3F00, 0x0F);
        ppu.write_byte(0x3F05, 0x16);

        assert_eq!(ppu.palette_color(true, 0), 0x0F);
        assert_eq!(ppu.palette_color(false, 0), 0x0F);
        assert_eq!(ppu.palette_color(true, 5), 0x16);
        assert_eq!(ppu.palette_color(false, 5), 0x16);

        // A write through the sprite half lands on the background entry.
        ppu.write_byte(0x3F15, 0x2A);
        assert_eq!(ppu.read_byte(0x3F05), 0x2A);
        assert_eq!(ppu.pixel_color(Pixel::sprite(5)), 0x2A);
        assert_eq!(ppu.pixel_color(Pixel::background(5)), 0x2A);
    }

    #[test]
    fn sprite_backdrop_slot_aliases_background() {
        let mut ppu = Ppu::new();
        ppu.write_byte(0x3F14, 0x21);
        assert_eq!(ppu.palette_color(true, 4), 0x21);
        assert_eq!(ppu.palette_color(false, 4), 0x21);
    }
}
