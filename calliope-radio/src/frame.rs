//! micro:bit datagram packets
//!
//! A packet on air is always [`PACKET_SIZE`] bytes:
//!
//! ```text
//! +--------+---------+-------+----------+-------------+--------+---------+
//! | length | version | group | protocol | payload ... | crc hi | crc lo  | padding
//! +--------+---------+-------+----------+-------------+--------+---------+
//! ```
//!
//! `length` counts the bytes after itself up to the end of the payload. Header
//! and payload are bit-reversed for the nRF24L01+, the CRC-16/CCITT-FALSE is
//! computed over the address followed by the reversed bytes, and finally the
//! whole packet is whitened.

use crc::{Crc, CRC_16_IBM_3740};
use heapless::Vec;

use crate::address::Address;
use crate::error::FrameError;
use crate::whitening;

/// Size of every packet on air
pub const PACKET_SIZE: usize = 32;

/// Length, version, group and protocol bytes
pub const HEADER_SIZE: usize = 4;

/// Size of the trailing checksum
pub const CRC_SIZE: usize = 2;

/// Largest payload a single datagram can carry
pub const MAX_PAYLOAD: usize = PACKET_SIZE - HEADER_SIZE - CRC_SIZE;

/// Header version written by the micro:bit DAL
pub const VERSION: u8 = 1;

/// Protocol number of plain datagrams
pub const PROTOCOL_DATAGRAM: u8 = 1;

/// CRC-16/CCITT-FALSE, the polynomial the nRF51 radio is configured with
const PACKET_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// One decoded datagram
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub version: u8,
    /// Group byte of the header; the datagram layer always sends 0 here and
    /// filters by address instead
    pub group: u8,
    pub protocol: u8,
    pub payload: Vec<u8, MAX_PAYLOAD>,
}

impl Frame {
    /// Payload as text, if it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }
}

/// Builds the on-air packet carrying `payload` as a datagram for `address`
pub fn encode(payload: &[u8], address: &Address) -> Result<[u8; PACKET_SIZE], FrameError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLong {
            len: payload.len(),
            max: MAX_PAYLOAD,
        });
    }

    let length = payload.len() + HEADER_SIZE - 1;
    let mut packet = [0u8; PACKET_SIZE];
    packet[0] = length as u8;
    packet[1] = VERSION;
    packet[2] = 0;
    packet[3] = PROTOCOL_DATAGRAM;
    packet[HEADER_SIZE..=length].copy_from_slice(payload);

    let mut digest = PACKET_CRC.digest();
    digest.update(&address.air_bytes());
    for byte in &mut packet[..=length] {
        *byte = byte.reverse_bits();
    }
    digest.update(&packet[..=length]);
    let crc = digest.finalize();
    packet[length + 1..length + 1 + CRC_SIZE].copy_from_slice(&crc.to_be_bytes());

    whitening::apply(&mut packet);
    Ok(packet)
}

/// Recovers the datagram from a packet received on `address`
pub fn decode(packet: &[u8; PACKET_SIZE], address: &Address) -> Result<Frame, FrameError> {
    let mut data = *packet;
    whitening::apply(&mut data);

    let length_byte = data[0].reverse_bits();
    let length = length_byte as usize;
    if length < HEADER_SIZE - 1 {
        return Err(FrameError::TooShort(length_byte));
    }
    if length + 1 + CRC_SIZE > PACKET_SIZE {
        return Err(FrameError::TooLong(length_byte));
    }

    let mut digest = PACKET_CRC.digest();
    digest.update(&address.air_bytes());
    digest.update(&data[..=length]);
    let computed = digest.finalize();
    let received = u16::from_be_bytes([data[length + 1], data[length + 2]]);
    if computed != received {
        return Err(FrameError::ChecksumMismatch { computed, received });
    }

    for byte in &mut data[..=length] {
        *byte = byte.reverse_bits();
    }

    // length was checked against the packet size, so the payload always fits
    let payload = Vec::from_slice(&data[HEADER_SIZE..=length])
        .map_err(|_| FrameError::TooLong(length_byte))?;
    Ok(Frame {
        version: data[1],
        group: data[2],
        protocol: data[3],
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP_7: Address = Address::new(7);

    /// Tail of every packet: whitened zero padding
    const PADDING: [u8; 24] = [
        0x2f, 0xaa, 0x16, 0xf3, 0x95, 0x98, 0x36, 0xba, 0x32, 0x20, 0x49, 0xa7, 0xb8, 0x7f, 0x1d,
        0x8a, 0x5f, 0x54, 0x2d, 0xe7, 0x2b, 0x30, 0x6d, 0x74,
    ];

    #[test]
    fn encodes_counter_zero_like_a_calliope() {
        let packet = encode(b"0", &GROUP_7).unwrap();
        assert_eq!(packet[..8], [0x39, 0x90, 0x24, 0x53, 0xd0, 0x6d, 0xb6, 0xc5]);
        assert_eq!(packet[8..], PADDING);
    }

    #[test]
    fn encodes_two_digit_payload() {
        let packet = encode(b"42", &GROUP_7).unwrap();
        assert_eq!(packet[..8], [0xb9, 0x90, 0x24, 0x53, 0xf0, 0x73, 0x97, 0xfc]);
        assert_eq!(packet[8..], PADDING);
    }

    #[test]
    fn encodes_empty_payload() {
        let packet = encode(b"", &GROUP_7).unwrap();
        assert_eq!(packet[..7], [0xd9, 0x90, 0x24, 0x53, 0x6f, 0x00, 0x8e]);
    }

    #[test]
    fn group_changes_the_checksum() {
        let packet = encode(b"hello", &Address::new(0)).unwrap();
        assert_eq!(
            packet[..11],
            [0x09, 0x90, 0x24, 0x53, 0xca, 0x99, 0xb8, 0xf3, 0xd9, 0xdd, 0x94]
        );
        assert!(matches!(
            decode(&packet, &GROUP_7),
            Err(FrameError::ChecksumMismatch { received: 0x7782, .. })
        ));
        assert_eq!(decode(&packet, &Address::new(0)).unwrap().text(), Some("hello"));
    }

    #[test]
    fn decodes_every_payload_length() {
        let source: [u8; MAX_PAYLOAD] = core::array::from_fn(|i| b'a' + i as u8);
        for len in 0..=MAX_PAYLOAD {
            let packet = encode(&source[..len], &GROUP_7).unwrap();
            let frame = decode(&packet, &GROUP_7).unwrap();
            assert_eq!(frame.payload.as_slice(), &source[..len]);
            assert_eq!(frame.version, VERSION);
            assert_eq!(frame.group, 0);
            assert_eq!(frame.protocol, PROTOCOL_DATAGRAM);
        }
    }

    #[test]
    fn rejects_oversized_payload() {
        let payload = [b'x'; MAX_PAYLOAD + 1];
        assert_eq!(
            encode(&payload, &GROUP_7),
            Err(FrameError::PayloadTooLong { len: 27, max: 26 })
        );
    }

    #[test]
    fn rejects_flipped_payload_bit() {
        let mut packet = encode(b"1234", &GROUP_7).unwrap();
        packet[5] ^= 0x04;
        assert!(matches!(
            decode(&packet, &GROUP_7),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn rejects_length_shorter_than_header() {
        let mut packet = [0u8; PACKET_SIZE];
        packet[0] = 2u8.reverse_bits();
        whitening::apply(&mut packet);
        assert_eq!(decode(&packet, &GROUP_7), Err(FrameError::TooShort(2)));
    }

    #[test]
    fn rejects_length_past_packet_end() {
        let mut packet = [0u8; PACKET_SIZE];
        packet[0] = 30u8.reverse_bits();
        whitening::apply(&mut packet);
        assert_eq!(decode(&packet, &GROUP_7), Err(FrameError::TooLong(30)));
    }

    #[test]
    fn text_is_available_for_utf8_payloads() {
        let frame = decode(&encode(b"17", &GROUP_7).unwrap(), &GROUP_7).unwrap();
        assert_eq!(frame.text(), Some("17"));
    }
}
