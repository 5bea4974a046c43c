//! Minimal host driver for components implementing [`Component`].
//!
//! The real console wires CPU, APU, PPU and mapper together; this driver only
//! keeps the parts every component shares: the master clock, the power/reset
//! fan-out and the NMI line. CPU memory stays with the host and is reached
//! through [`DmaSource`] when the PPU needs it.

use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::component::{Component, NmiLine, SystemLink};

/// PPU dots per CPU cycle on NTSC hardware. The host applies this ratio when
/// converting CPU time into master cycles.
pub const PPU_CYCLES_PER_CPU_CYCLE: u64 = 3;

/// External memory that OAM DMA copies from.
pub trait DmaSource {
    fn dma_read(&mut self, addr: u16) -> u8;
}

impl DmaSource for [u8] {
    fn dma_read(&mut self, addr: u16) -> u8 {
        self.get(addr as usize).copied().unwrap_or(0)
    }
}

impl<const N: usize> DmaSource for [u8; N] {
    fn dma_read(&mut self, addr: u16) -> u8 {
        self.as_mut_slice().dma_read(addr)
    }
}

/// Owns a flat list of components and drives them in lockstep.
#[derive(Debug, Default)]
pub struct System {
    components: Vec<Rc<RefCell<dyn Component>>>,
    link: SystemLink,
    cycle: u64,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component and returns a typed handle the host can keep for
    /// register access.
    pub fn attach<C: Component + 'static>(&mut self, component: C) -> Rc<RefCell<C>> {
        let handle = Rc::new(RefCell::new(component));
        let erased: Rc<RefCell<dyn Component>> = handle.clone();
        self.components.push(erased);
        handle
    }

    pub fn power_on(&mut self) {
        debug!(components = self.components.len(), "system power-on");
        self.cycle = 0;
        for component in &self.components {
            component.borrow_mut().power_on(&self.link);
        }
    }

    pub fn reset(&mut self) {
        debug!(cycle = self.cycle, "system reset");
        for component in &self.components {
            component.borrow_mut().reset();
        }
    }

    /// Advances every component to the absolute master cycle `cycle`.
    pub fn step_to(&mut self, cycle: u64) {
        assert!(
            cycle >= self.cycle,
            "system stepped backwards: {} -> {}",
            self.cycle,
            cycle
        );
        self.cycle = cycle;
        for component in &self.components {
            component.borrow_mut().step_to(cycle);
        }
    }

    /// Advances by a number of CPU cycles.
    pub fn run_cpu_cycles(&mut self, cpu_cycles: u64) {
        self.step_to(self.cycle + cpu_cycles * PPU_CYCLES_PER_CPU_CYCLE);
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn nmi(&self) -> &NmiLine {
        &self.link.nmi
    }
}
