//! Duart Hardware Abstraction Layer
//!
//! This crate defines the bus and pin traits the bridge driver is written
//! against. Platform crates (RP2040, STM32, Linux userspace, test mocks)
//! implement these traits; the driver itself never touches a peripheral
//! register directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (polling / IRQ loop)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  duart-drivers (SC16IS752 driver)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  duart-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ platform HAL  │       │ embedded-hal  │
//! │ (direct impl) │       │ (compat mod)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C master operations
//! - [`spi::SpiBus`] - SPI master operations
//! - [`gpio::InputPin`], [`gpio::OutputPin`] - digital I/O (IRQ and reset
//!   lines of the bridge chip)

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "embedded-hal")]
pub mod compat;
pub mod gpio;
pub mod i2c;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
pub use spi::SpiBus;
