use bitflags::bitflags;

bitflags! {
    /// PPUMASK (`$2001`), write-only.
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// B G R s b M m g
    /// ```
    /// `m`/`M` unclip the leftmost 8 pixels of background/sprites; `B G R`
    /// are colour emphasis bits, latched for the presentation side.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mask: u8 {
        const GRAYSCALE = 0b0000_0001;
        const BACKGROUND_LEFT = 0b0000_0010;
        const SPRITES_LEFT = 0b0000_0100;
        const SHOW_BACKGROUND = 0b0000_1000;
        const SHOW_SPRITES = 0b0001_0000;
        const EMPHASIZE_RED = 0b0010_0000;
        const EMPHASIZE_GREEN = 0b0100_0000;
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl Mask {
    pub fn show_background(self) -> bool {
        self.contains(Mask::SHOW_BACKGROUND)
    }

    pub fn show_sprites(self) -> bool {
        self.contains(Mask::SHOW_SPRITES)
    }

    pub fn grayscale(self) -> bool {
        self.contains(Mask::GRAYSCALE)
    }

    /// Forced blanking is in effect when both layers are off.
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES)
    }

    /// Background pixel visible at column `x` (left clip applied).
    pub fn background_visible_at(self, x: usize) -> bool {
        self.show_background() && (x >= 8 || self.contains(Mask::BACKGROUND_LEFT))
    }

    /// Sprite pixel visible at column `x` (left clip applied).
    pub fn sprites_visible_at(self, x: usize) -> bool {
        self.show_sprites() && (x >= 8 || self.contains(Mask::SPRITES_LEFT))
    }
}
