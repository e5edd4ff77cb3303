//! Extended Hamming (8, 4, 4) code.
//!
//! The (7, 4, 3) Hamming code plus a global parity bit, packed into a `u8`:
//! tag at bit 0, global parity at bit 1, check bits at 2..=4 and a 3-bit value
//! at 5..=7.

use crate::ecc::secded::{Correction, SecDedCode};
use crate::error::Result;

/// Number of value bits protected by the code
pub const VALUE_BITS: usize = 3;

/// The (8, 4) code. The low nibble `1` in masks 0 and 1 selects the tag bit.
pub const CODE: SecDedCode<u8> = SecDedCode::from_masks(&[
    0xa1, // check bit 0
    0xc1, // check bit 1
    0xe0, // check bit 2
]);

/// Packs the low 3 bits of `value` and `tag` into a codeword.
///
/// Returns `Error::InputTooLarge` if `value` does not fit in 3 bits.
pub fn pack_with_check_bits(value: u8, tag: bool) -> Result<u8> {
    CODE.pack(value, tag)
}

/// Like [`pack_with_check_bits`], silently dropping value bits above bit 2
pub fn pack_masked(value: u8, tag: bool) -> u8 {
    CODE.pack_masked(value, tag)
}

/// Corrects a single bit error or detects a double bit error in `codeword`
pub fn correct(codeword: u8) -> Correction<u8> {
    CODE.correct(codeword)
}

/// Corrects `codeword` and returns its value and tag
pub fn decode(codeword: u8) -> Result<(u8, bool)> {
    CODE.decode(codeword)
}
