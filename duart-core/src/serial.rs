//! Serial line-format configuration types
//!
//! These types describe a UART frame the way the 16C450-family line
//! control register thinks about it. They are deliberately permissive:
//! the chip documents a fallback for out-of-range data lengths rather
//! than an error, and callers rely on that, so the fields stay numeric
//! instead of closed enums.

/// Parity mode selector
///
/// The discriminants are the chip's documented mode numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Parity {
    /// No parity bit
    #[default]
    None = 0,
    /// Odd parity
    Odd = 1,
    /// Even parity
    Even = 2,
    /// Parity bit forced to 1 ("mark")
    ForcedOne = 3,
    /// Reserved mode; selecting it leaves the parity field untouched
    Reserved = 4,
}

impl Parity {
    /// Get the mode as its numeric selector
    pub fn as_mode(self) -> u8 {
        self as u8
    }

    /// Create a parity mode from its numeric selector
    pub fn from_mode(mode: u8) -> Option<Self> {
        match mode {
            0 => Some(Parity::None),
            1 => Some(Parity::Odd),
            2 => Some(Parity::Even),
            3 => Some(Parity::ForcedOne),
            4 => Some(Parity::Reserved),
            _ => None,
        }
    }
}

/// UART frame format
///
/// `data_bits` outside 5..=8 falls back to 8 when applied; any
/// `stop_bits` value other than 2 means one stop bit. Both fallbacks are
/// chip-documented behavior, not validation gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineConfig {
    /// Data bits per character (5-8)
    pub data_bits: u8,
    /// Parity mode
    pub parity: Parity,
    /// Stop bits (1 or 2)
    pub stop_bits: u8,
}

impl Default for LineConfig {
    fn default() -> Self {
        // 8N1
        Self {
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
        }
    }
}

impl LineConfig {
    /// Create a line format
    pub const fn new(data_bits: u8, parity: Parity, stop_bits: u8) -> Self {
        Self {
            data_bits,
            parity,
            stop_bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_mode_roundtrip() {
        for mode in 0..=4 {
            let parity = Parity::from_mode(mode).unwrap();
            assert_eq!(parity.as_mode(), mode);
        }
        assert_eq!(Parity::from_mode(5), None);
        assert_eq!(Parity::from_mode(0xFF), None);
    }

    #[test]
    fn test_default_is_8n1() {
        let line = LineConfig::default();
        assert_eq!(line.data_bits, 8);
        assert_eq!(line.parity, Parity::None);
        assert_eq!(line.stop_bits, 1);
    }
}
