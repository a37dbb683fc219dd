//! Broadcast counter

use core::fmt::Write;

use heapless::String;

/// Decimal digits of `u32::MAX`
pub const MAX_DIGITS: usize = 10;

/// Counter value sent with every datagram
///
/// Starts at 0 and wraps back to 0 after `u32::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Counter {
    value: u32,
}

impl Counter {
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Decimal text of the current value
    pub fn payload(&self) -> String<MAX_DIGITS> {
        let mut text = String::new();
        // every u32 fits into MAX_DIGITS characters
        let _ = write!(text, "{}", self.value);
        text
    }

    /// Moves on to the next value
    pub fn advance(&mut self) {
        self.value = self.value.wrapping_add(1);
    }
}
