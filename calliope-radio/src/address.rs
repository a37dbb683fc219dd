//! Radio group addressing
//!
//! The micro:bit radio uses the base address `"uBit"` and the radio group as
//! address prefix, so devices only hear packets of their own group. Both radios
//! put the same bits on air, but the nRF51 shifts every byte out LSB first and
//! the nRF24L01+ MSB first. All bytes handed to the nRF24L01+ are therefore
//! bit-reversed.

/// Base address bytes as the nRF24L01+ expects them (least significant first)
const BASE: [u8; 4] = [b'u', b'b', b'i', b't'];

/// Number of address bytes on air
pub const ADDRESS_WIDTH: usize = 5;

/// Address of one radio group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address {
    group: u8,
}

impl Address {
    /// Address for the given radio group
    pub const fn new(group: u8) -> Self {
        Self { group }
    }

    /// The radio group this address belongs to
    pub const fn group(&self) -> u8 {
        self.group
    }

    /// Address bytes in the order the nRF24L01+ address registers take them
    pub fn register_bytes(&self) -> [u8; ADDRESS_WIDTH] {
        let mut bytes = [0u8; ADDRESS_WIDTH];
        bytes[0] = self.group;
        bytes[1..].copy_from_slice(&BASE);
        bytes.map(u8::reverse_bits)
    }

    /// Address bytes in the order they are transmitted
    ///
    /// The packet CRC is seeded with these bytes.
    pub fn air_bytes(&self) -> [u8; ADDRESS_WIDTH] {
        let mut bytes = self.register_bytes();
        bytes.reverse();
        bytes
    }
}
