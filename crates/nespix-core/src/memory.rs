//! Shared definitions for the PPU memory map.
//!
//! Centralizing address-related constants keeps the hardware layout in one
//! location and prevents magic numbers from sneaking into the register and
//! rendering code.

/// CPU-facing register window and the PPU's own 16 KiB address space.
pub mod ppu {
    use crate::error::Error;

    /// First CPU-visible PPU register address.
    pub const REGISTER_BASE: u16 = 0x2000;
    /// Last CPU address mirrored to the PPU register set.
    pub const REGISTER_MIRROR_END: u16 = 0x3FFF;
    /// Mask for decoding register mirrors (`addr & 0x0007`).
    pub const REGISTER_SELECT_MASK: u16 = 0x0007;
    /// DMA register used for transferring OAM data (`$4014`).
    pub const OAM_DMA: u16 = 0x4014;

    /// Logical size of the PPU address space (16 KiB).
    pub const VRAM_SIZE: usize = 0x4000;
    /// The PPU address bus is 14 bits wide.
    pub const VRAM_ADDR_MASK: u16 = 0x3FFF;

    /// Pattern table base address for table 0.
    pub const PATTERN_TABLE_0: u16 = 0x0000;
    /// Pattern table base address for table 1.
    pub const PATTERN_TABLE_1: u16 = 0x1000;
    /// Total size of both pattern tables (`$0000-$1FFF`).
    pub const CHR_SIZE: usize = 0x2000;

    /// Base address of name table 0.
    pub const NAMETABLE_BASE: u16 = 0x2000;
    /// Size of a single name table in bytes, attribute table included.
    pub const NAMETABLE_SIZE: u16 = 0x0400;
    /// Offset of the attribute table inside a name table.
    pub const ATTRIBUTE_OFFSET: u16 = 0x03C0;
    /// Start of the name table mirror folded back by `$1000`.
    pub const NAMETABLE_MIRROR_START: u16 = 0x3000;

    /// Palette RAM base address (`$3F00`), also the universal backdrop entry.
    pub const PALETTE_BASE: u16 = 0x3F00;
    /// First sprite palette entry (`$3F10`).
    pub const SPRITE_PALETTE_BASE: u16 = 0x3F10;

    /// Primary Object Attribute Memory (OAM) byte count.
    pub const OAM_RAM_SIZE: usize = 0x100;

    /// CPU-visible PPU register identifiers.
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Register {
        /// `$2000` - PPUCTRL
        Control = 0x2000,
        /// `$2001` - PPUMASK
        Mask = 0x2001,
        /// `$2002` - PPUSTATUS
        Status = 0x2002,
        /// `$2003` - OAMADDR
        OamAddr = 0x2003,
        /// `$2004` - OAMDATA
        OamData = 0x2004,
        /// `$2005` - PPUSCROLL
        Scroll = 0x2005,
        /// `$2006` - PPUADDR
        Addr = 0x2006,
        /// `$2007` - PPUDATA
        Data = 0x2007,
        /// `$4014` - OAMDMA
        OamDma = 0x4014,
    }

    impl Register {
        /// Raw address backing the register.
        pub const fn addr(self) -> u16 {
            self as u16
        }

        /// Resolves the canonical register for a CPU address in `$2000-$3FFF`.
        pub const fn from_cpu_addr(addr: u16) -> Self {
            match addr & REGISTER_SELECT_MASK {
                0 => Self::Control,
                1 => Self::Mask,
                2 => Self::Status,
                3 => Self::OamAddr,
                4 => Self::OamData,
                5 => Self::Scroll,
                6 => Self::Addr,
                _ => Self::Data,
            }
        }

        /// Whether the CPU can read a value back from this register.
        pub const fn is_readable(self) -> bool {
            matches!(self, Self::Status | Self::OamData | Self::Data)
        }
    }

    impl TryFrom<u16> for Register {
        type Error = Error;

        fn try_from(addr: u16) -> Result<Self, Self::Error> {
            match addr {
                REGISTER_BASE..=REGISTER_MIRROR_END => Ok(Self::from_cpu_addr(addr)),
                OAM_DMA => Ok(Self::OamDma),
                _ => Err(Error::UnmappedRegister { addr }),
            }
        }
    }
}
