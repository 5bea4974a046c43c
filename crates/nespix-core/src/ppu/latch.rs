/// The PPU's internal data bus latch ("open bus").
///
/// Real hardware lets undriven bits decay after roughly a frame, but the
/// timing is random and no software depends on it, so bits never decay here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct DataLatch {
    value: u8,
}

impl DataLatch {
    pub(crate) fn reset(&mut self) {
        self.value = 0;
    }

    pub(crate) fn set(&mut self, value: u8) {
        self.value = value;
    }

    /// Combines `value` with the latched bits selected by `mask`.
    pub(crate) fn apply(&self, mask: u8, value: u8) -> u8 {
        value | (self.value & mask)
    }

    pub(crate) fn sample(&self) -> u8 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_fills_only_masked_bits() {
        let mut latch = DataLatch::default();
        latch.set(0xFF);
        assert_eq!(latch.apply(0x1F, 0x80), 0x9F);
        latch.set(0x0A);
        assert_eq!(latch.apply(0x1F, 0x00), 0x0A);
    }
}
