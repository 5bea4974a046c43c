use core::ops::{Deref, DerefMut};

use super::Ppu;

/// Scoped suspension of destructive register side effects.
///
/// While a guard is alive, PPUSTATUS reads keep the vblank flag and write
/// toggle, PPUDATA reads keep the address cursor, and no access touches the
/// latch. Dropping the guard restores whatever protection was in effect
/// when it was taken, so nested guards unwind correctly and the state is
/// restored on panic as well.
pub struct ProtectGuard<'a> {
    ppu: &'a mut Ppu,
    previous: bool,
}

impl<'a> ProtectGuard<'a> {
    pub(super) fn new(ppu: &'a mut Ppu) -> Self {
        let previous = ppu.registers.protect;
        ppu.registers.protect = true;
        Self { ppu, previous }
    }
}

impl Deref for ProtectGuard<'_> {
    type Target = Ppu;

    fn deref(&self) -> &Ppu {
        self.ppu
    }
}

impl DerefMut for ProtectGuard<'_> {
    fn deref_mut(&mut self) -> &mut Ppu {
        self.ppu
    }
}

impl Drop for ProtectGuard<'_> {
    fn drop(&mut self) {
        self.ppu.registers.protect = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    #[test]
    fn nested_guards_restore_outer_protection() {
        let mut ppu = Ppu::new();
        assert!(!ppu.is_protected());
        {
            let mut outer = ppu.protect();
            assert!(outer.is_protected());
            {
                let inner = outer.protect();
                assert!(inner.is_protected());
            }
            assert!(outer.is_protected(), "inner release must not unprotect");
        }
        assert!(!ppu.is_protected());
    }

    #[test]
    fn guard_is_released_on_panic() {
        let mut ppu = Ppu::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            ppu.with_protection(|inner| {
                if inner.is_protected() {
                    panic!("inspection failed");
                }
            });
        }));
        assert!(result.is_err());
        assert!(!ppu.is_protected());
    }
}
