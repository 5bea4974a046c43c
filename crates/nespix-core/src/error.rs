use thiserror::Error;

use crate::memory::ppu as ppu_mem;

/// Caller-facing failures of the PPU core.
///
/// Hardware behaviour is never reported through this type: dropped early
/// writes, wrapping cursors and mirrored addresses all succeed silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("address {addr:#06X} is not a PPU register")]
    UnmappedRegister { addr: u16 },

    #[error("pattern data is {actual} bytes, at most {} fit in $0000-$1FFF", ppu_mem::CHR_SIZE)]
    PatternDataTooLarge { actual: usize },

    #[error("loading {len} bytes at {addr:#06X} runs past the 16 KiB PPU address space")]
    VramOverflow { addr: u16, len: usize },

    #[error("OAM image must be {} bytes, got {actual}", ppu_mem::OAM_RAM_SIZE)]
    OamSize { actual: usize },
}
