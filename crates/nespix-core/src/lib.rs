//! Cycle-stepped NES picture processing unit.
//!
//! [`Ppu`] reproduces the CPU-visible behaviour of the 2C02: the register
//! window with its latch and shared write toggle, the power-on write gate,
//! PPU address-space mirroring, vblank/NMI timing on the 341×262 dot grid,
//! and a background/sprite renderer producing palette-indexed frames.
//!
//! Hosts drive it either directly through [`Ppu::step_to`] and the register
//! ports, or by attaching it to a [`System`] next to other [`Component`]s.

pub mod component;
pub mod config;
pub mod error;
pub mod mem_block;
pub mod memory;
pub mod ppu;
pub mod system;

pub use component::{Component, NmiLine, SystemLink};
pub use config::PpuConfig;
pub use error::Error;
pub use ppu::Ppu;
pub use system::{DmaSource, System};
