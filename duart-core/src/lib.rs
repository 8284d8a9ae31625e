//! Board-agnostic support types for the duart bridge driver
//!
//! This crate contains the pieces that do not depend on a specific bus or
//! chip:
//!
//! - Serial line-format configuration types
//! - IRQ-to-poll-loop signaling primitives for the consuming application

#![no_std]
#![deny(unsafe_code)]

pub mod serial;
pub mod signal;

pub use serial::{LineConfig, Parity};
pub use signal::{Debounce, IrqLatch};
