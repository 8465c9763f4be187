//! CRC16 integrity check.
//!
//! CRC-16/XMODEM: polynomial `0x1021`, initial value `0`, no reflection,
//! no final XOR. Computed over the header and payload, transmitted low
//! byte first.

use crc::{Crc, CRC_16_XMODEM};

pub static CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Folds one byte into a running checksum.
#[inline]
pub fn accumulate(byte: u8, prior: u16) -> u16 {
    let mut digest = CRC16.digest_with_initial(prior);
    digest.update(&[byte]);
    digest.finalize()
}

/// Folds a slice into a running checksum.
pub fn accumulate_slice(data: &[u8], prior: u16) -> u16 {
    let mut digest = CRC16.digest_with_initial(prior);
    digest.update(data);
    digest.finalize()
}

/// Checksum of `data` starting from zero.
pub fn checksum(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}
