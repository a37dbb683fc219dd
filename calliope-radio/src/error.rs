//! Error types

use thiserror::Error;

/// Errors raised while building or checking a micro:bit radio packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The payload does not fit into a single 32-byte packet
    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLong { len: usize, max: usize },

    /// The length byte is smaller than the datagram header
    #[error("frame length {0} is shorter than the header")]
    TooShort(u8),

    /// The length byte points past the end of the packet
    #[error("frame length {0} does not fit in a packet")]
    TooLong(u8),

    /// The received checksum does not match the computed one
    #[error("checksum mismatch: computed {computed:#06x}, received {received:#06x}")]
    ChecksumMismatch { computed: u16, received: u16 },
}

/// Errors raised by the nRF24L01+ driver and the radio modes built on it
///
/// `S` is the SPI device error, `P` the chip-enable pin error.
#[derive(Debug, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError<S, P> {
    /// SPI transaction failed
    #[error("SPI transaction failed: {0:?}")]
    Spi(S),

    /// Driving the chip-enable line failed
    #[error("chip enable pin failed: {0:?}")]
    Pin(P),

    /// Nothing answered like an nRF24L01+ on the bus
    #[error("no nRF24L01+ transceiver responded")]
    NotDetected,

    /// The frequency band is outside the range the micro:bit radio allows
    #[error("frequency band {0} is outside 0..=83")]
    InvalidBand(u8),

    /// Packet encoding or decoding failed
    #[error("framing failed: {0}")]
    Frame(#[from] FrameError),
}
