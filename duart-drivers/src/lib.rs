//! Chip driver implementations
//!
//! This crate provides the register-level drivers of the duart stack,
//! written against the bus traits from `duart-hal`:
//!
//! - UART bridge chips (SC16IS752 dual-channel I2C/SPI bridge)
//! - The register-bus seam and its I2C/SPI transports

#![no_std]
#![deny(unsafe_code)]

pub mod bridge;
