//! IRQ-to-poll-loop signaling primitives
//!
//! The bridge chip signals "receive data available" by pulling its IRQ
//! line low. The interrupt handler must not talk to the bus itself (the
//! bus transaction primitive is usually not interrupt-safe), so it only
//! records that the edge happened; the main loop picks the flag up and
//! does the actual register reads. These two types are that handoff,
//! owned by the application rather than the driver.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Single-slot latch set from interrupt context and drained by a loop
///
/// `notify` may be called any number of times between polls; the loop
/// observes at most one pending event per [`take`](IrqLatch::take).
pub struct IrqLatch {
    pending: AtomicBool,
}

impl IrqLatch {
    /// Create an empty latch
    ///
    /// `const` so it can live in a `static` next to the IRQ handler.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Record an event (interrupt-context safe)
    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the pending event, if any
    ///
    /// Returns `true` exactly once per recorded event burst.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Check for a pending event without consuming it
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for IrqLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum-interval gate for a dribbling interrupt line
///
/// The chip keeps re-asserting IRQ while the receive FIFO is non-empty,
/// which floods the handler with edges during a burst. `Debounce` passes
/// an event through only when at least `min_interval_ms` has elapsed
/// since the last accepted one. It owns no clock; the caller supplies a
/// monotonic millisecond timestamp (wrapping is handled).
///
/// Intended for a single caller (the IRQ handler); concurrent `accept`
/// calls may both pass during the same interval.
pub struct Debounce {
    min_interval_ms: u32,
    last_ms: AtomicU32,
}

impl Debounce {
    /// Create a gate that was last triggered at `now_ms`
    ///
    /// Matching the original loop's startup behavior, events within the
    /// first interval after construction are suppressed.
    pub const fn new(min_interval_ms: u32, now_ms: u32) -> Self {
        Self {
            min_interval_ms,
            last_ms: AtomicU32::new(now_ms),
        }
    }

    /// Report an event at `now_ms`; returns `true` if it should be acted on
    pub fn accept(&self, now_ms: u32) -> bool {
        let last = self.last_ms.load(Ordering::Acquire);
        if now_ms.wrapping_sub(last) >= self.min_interval_ms {
            self.last_ms.store(now_ms, Ordering::Release);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_takes_once() {
        let latch = IrqLatch::new();
        assert!(!latch.take());

        latch.notify();
        assert!(latch.is_pending());
        assert!(latch.take());
        assert!(!latch.take());
    }

    #[test]
    fn test_latch_coalesces_bursts() {
        let latch = IrqLatch::new();
        latch.notify();
        latch.notify();
        latch.notify();
        assert!(latch.take());
        assert!(!latch.take());
    }

    #[test]
    fn test_debounce_suppresses_close_events() {
        let gate = Debounce::new(1000, 0);
        // Still inside the startup interval
        assert!(!gate.accept(500));
        assert!(gate.accept(1000));
        assert!(!gate.accept(1900));
        assert!(gate.accept(2000));
    }

    #[test]
    fn test_debounce_wraps() {
        let gate = Debounce::new(1000, u32::MAX - 100);
        // 200ms elapsed across the wrap point
        assert!(!gate.accept(100));
        assert!(gate.accept(900));
    }
}
