//! nRF51 data whitening
//!
//! The nRF51 radio XORs every packet with the output of a 7-bit LFSR
//! (x^7 + x^4 + 1) to avoid long runs of equal bits. The nRF24L01+ has no
//! whitening, so it is applied in software. Whitening is its own inverse.

/// Initial value the micro:bit DAL loads into DATAWHITEIV
const WHITENING_IV: u8 = 0x18;

/// Whitens (or de-whitens) `data` in place
pub fn apply(data: &mut [u8]) {
    // bit 6 is forced to one by the radio, the register is 7 bits wide and
    // shifted out in reverse order
    let mut lfsr = (WHITENING_IV | 0x40).reverse_bits() >> 1;
    for byte in data.iter_mut() {
        for bit in 0..8 {
            let mask = 1 << (7 - bit);
            lfsr <<= 1;
            if lfsr & 0x80 != 0 {
                lfsr ^= 0x11;
                *byte ^= mask;
            }
        }
    }
}
