//! Test and debug configuration for the PPU core.

/// Master cycles the PPU needs after power-on before PPUCTRL, PPUMASK and
/// PPUSCROLL accept writes.
pub const WARMUP_CYCLES: u64 = 29_659;

/// Runtime configuration of a [`Ppu`](crate::ppu::Ppu).
///
/// None of these knobs are hardware features; the defaults describe the real
/// console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PpuConfig {
    /// Stop advancing once the frame counter reaches this value.
    pub stop_after_frame: Option<u64>,
    /// Cycle at which the register write gate opens.
    pub warmup_cycles: u64,
}

impl Default for PpuConfig {
    fn default() -> Self {
        Self {
            stop_after_frame: None,
            warmup_cycles: WARMUP_CYCLES,
        }
    }
}

impl PpuConfig {
    pub fn with_stop_after_frame(mut self, frame: u64) -> Self {
        self.stop_after_frame = Some(frame);
        self
    }

    /// Overrides the warm-up threshold. Harnesses that do not care about
    /// power-on behaviour can pass `0` to open the gate immediately.
    pub fn with_warmup_cycles(mut self, cycles: u64) -> Self {
        self.warmup_cycles = cycles;
        self
    }
}
