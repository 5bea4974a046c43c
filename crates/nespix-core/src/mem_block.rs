use core::ops::{Deref, DerefMut};

#[cfg(any(feature = "boxed-memblock", target_arch = "wasm32"))]
type MemBlockStorage<T, const N: usize> = Box<[T; N]>;

#[cfg(not(any(feature = "boxed-memblock", target_arch = "wasm32")))]
type MemBlockStorage<T, const N: usize> = [T; N];

/// Fixed-size backing store allocated once and kept for the emulator's lifetime.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemBlock<T, const N: usize>(MemBlockStorage<T, N>);

/// Convenience alias for a `MemBlock` of bytes.
pub type ByteBlock<const N: usize> = MemBlock<u8, N>;

pub mod ppu {
    use crate::memory::ppu as ppu_mem;

    /// The full 16 KiB PPU address space; only translated addresses index it.
    pub type Vram = super::ByteBlock<{ ppu_mem::VRAM_SIZE }>;
    /// Primary sprite memory: 64 entries of 4 bytes.
    pub type OamRam = super::ByteBlock<{ ppu_mem::OAM_RAM_SIZE }>;
}

impl<T, const N: usize> MemBlock<T, N> {
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0[..]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0[..]
    }
}

impl<T: Copy + Default, const N: usize> MemBlock<T, N> {
    pub fn new() -> Self {
        Self(new_storage(T::default()))
    }
}

impl<T: Copy + Default, const N: usize> Default for MemBlock<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Deref for MemBlock<T, N> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for MemBlock<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

#[cfg(any(feature = "boxed-memblock", target_arch = "wasm32"))]
fn new_storage<T: Copy, const N: usize>(value: T) -> MemBlockStorage<T, N> {
    Box::new([value; N])
}

#[cfg(not(any(feature = "boxed-memblock", target_arch = "wasm32")))]
fn new_storage<T: Copy, const N: usize>(value: T) -> MemBlockStorage<T, N> {
    [value; N]
}
