//! Dot/scanline/frame bookkeeping and the power-on lifecycle.

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
/// Scanlines `0..240` produce pixels.
pub const VISIBLE_SCANLINES: u16 = 240;
pub const POST_RENDER_SCANLINE: u16 = 240;
/// Vblank starts at dot 1 of this line.
pub const VBLANK_SCANLINE: u16 = 241;
pub const PRE_RENDER_SCANLINE: u16 = 261;
pub const CYCLES_PER_FRAME: u64 = DOTS_PER_SCANLINE as u64 * SCANLINES_PER_FRAME as u64;

/// Where the PPU is in the frame grid.
///
/// `cycle` counts every dot since power-on; `dot`, `scanline` and `frame` are
/// derived from it by the wrap rules, so the three always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub cycle: u64,
    pub dot: u16,
    pub scanline: u16,
    pub frame: u64,
}

impl Position {
    /// Master cycle at which the PPU sits on `(frame, scanline, dot)`.
    pub const fn cycle_of(frame: u64, scanline: u16, dot: u16) -> u64 {
        frame * CYCLES_PER_FRAME
            + scanline as u64 * DOTS_PER_SCANLINE as u64
            + dot as u64
    }

    /// Moves one dot forward. Returns `true` when a new frame begins.
    pub(crate) fn advance(&mut self) -> bool {
        self.cycle += 1;
        self.dot += 1;
        if self.dot < DOTS_PER_SCANLINE {
            return false;
        }
        self.dot = 0;
        self.scanline += 1;
        if self.scanline < SCANLINES_PER_FRAME {
            return false;
        }
        self.scanline = 0;
        self.frame += 1;
        true
    }

    pub fn is_at(&self, scanline: u16, dot: u16) -> bool {
        self.scanline == scanline && self.dot == dot
    }

    pub fn is_visible_line(&self) -> bool {
        self.scanline < VISIBLE_SCANLINES
    }
}

/// Power-on lifecycle of the PPU. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum PpuState {
    #[default]
    PowerOn,
    /// The first vblank flag after power-on has been raised.
    FirstVblank,
    /// The second vblank flag has been raised.
    SecondVblank,
    /// Warm-up is over; waiting for the next frame to start.
    Ready,
    /// Steady state, every frame from here on renders.
    Rendering,
}

impl PpuState {
    pub(crate) fn on_vblank_start(self) -> Self {
        match self {
            Self::PowerOn => Self::FirstVblank,
            Self::FirstVblank => Self::SecondVblank,
            other => other,
        }
    }

    pub(crate) fn on_pre_render(self) -> Self {
        match self {
            Self::SecondVblank => Self::Ready,
            other => other,
        }
    }

    pub(crate) fn on_visible_dot(self) -> Self {
        match self {
            Self::Ready => Self::Rendering,
            other => other,
        }
    }
}
