//! Calliope mini / micro:bit compatible radio
//!
//! The Calliope mini talks to its peers with the micro:bit DAL radio stack: an
//! nRF51 radio in its proprietary 1 Mbit/s mode, a 5-byte address derived from
//! the radio group, a small datagram header, a CRC-16 and data whitening.
//!
//! This crate reproduces that packet format on an nRF24L01+ transceiver so any
//! microcontroller with an SPI bus can send datagrams a Calliope receives, and
//! receive the datagrams a Calliope sends.
//!
//! # Layers
//! - [`address`], [`whitening`], [`frame`]: pure packet encoding and decoding
//! - [`nrf24`]: async register-level nRF24L01+ driver
//! - [`radio`]: standby, transmit and receive modes speaking micro:bit frames
//! - [`counter`], [`broadcast`]: the repeated counter broadcast loop

#![cfg_attr(not(test), no_std)]

pub mod address;
pub mod broadcast;
pub mod counter;
pub mod error;
pub mod frame;
pub mod nrf24;
pub mod radio;
pub mod whitening;

pub use address::Address;
pub use broadcast::{BroadcastConfig, Broadcaster, DatagramRadio, StepOutcome};
pub use counter::Counter;
pub use error::{FrameError, RadioError};
pub use frame::{Frame, MAX_PAYLOAD, PACKET_SIZE};
pub use radio::{RadioConfig, Receiver, SendOutcome, Standby, Transmitter, TxPower};
