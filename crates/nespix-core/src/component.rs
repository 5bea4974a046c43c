//! Uniform lifecycle interface shared by every hardware block on the board.
//!
//! The host system owns a flat collection of components and drives them all
//! through the same three entry points. Anything a component needs from the
//! host (currently only the NMI line) is handed over once at power-on through
//! a [`SystemLink`] instead of being looked up through a back-reference.

use std::{cell::Cell, fmt, rc::Rc};

/// Capability set implemented by the PPU, CPU, APU and mapper variants.
pub trait Component: fmt::Debug {
    /// Cold boot: clears all state and keeps the link for the component's lifetime.
    fn power_on(&mut self, link: &SystemLink);

    /// Warm reset triggered by the console's reset button.
    fn reset(&mut self);

    /// Advances the component to an absolute master cycle.
    ///
    /// Targets must be monotonically non-decreasing across calls; going
    /// backwards is a host bug and panics.
    fn step_to(&mut self, cycle: u64);
}

/// Dependencies a component resolves from its owning system at power-on.
#[derive(Debug, Clone, Default)]
pub struct SystemLink {
    pub nmi: NmiLine,
}

impl SystemLink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
struct NmiEdges {
    raised: Cell<u64>,
    pending: Cell<bool>,
}

/// Edge-triggered NMI signal shared between the PPU and the host.
///
/// Clones observe the same line. The producer calls [`raise`](Self::raise)
/// once per edge; the consumer acknowledges with
/// [`take_pending`](Self::take_pending).
#[derive(Clone, Default)]
pub struct NmiLine(Rc<NmiEdges>);

impl fmt::Debug for NmiLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NmiLine")
            .field("raised", &self.0.raised.get())
            .field("pending", &self.0.pending.get())
            .finish()
    }
}

impl NmiLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals one NMI edge.
    pub fn raise(&self) {
        self.0.raised.set(self.0.raised.get() + 1);
        self.0.pending.set(true);
    }

    /// Returns `true` once per batch of edges raised since the last call.
    pub fn take_pending(&self) -> bool {
        self.0.pending.replace(false)
    }

    /// Returns `true` while an edge is waiting to be acknowledged.
    pub fn is_pending(&self) -> bool {
        self.0.pending.get()
    }

    /// Total number of edges ever raised on this line.
    pub fn raised_count(&self) -> u64 {
        self.0.raised.get()
    }
}
