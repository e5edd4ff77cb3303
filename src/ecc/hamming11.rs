//! Extended Hamming (16, 11, 4) code.
//!
//! The (15, 11, 3) Hamming code plus a global parity bit, packed into a `u16`:
//! tag at bit 0, global parity at bit 1, check bits at 2..=5 and a 10-bit value
//! at 6..=15.

use crate::ecc::secded::{Correction, SecDedCode};
use crate::error::Result;

/// Number of value bits protected by the code
pub const VALUE_BITS: usize = 10;

/// The (16, 11) code. The low nibble `1` in masks 0 and 1 selects the tag bit.
pub const CODE: SecDedCode<u16> = SecDedCode::from_masks(&[
    0xab41, // check bit 0
    0xcd81, // check bit 1
    0xf1c0, // check bit 2
    0xfe00, // check bit 3
]);

/// Packs the low 10 bits of `value` and `tag` into a codeword.
///
/// Returns `Error::InputTooLarge` if `value` does not fit in 10 bits.
pub fn pack_with_check_bits(value: u16, tag: bool) -> Result<u16> {
    CODE.pack(value, tag)
}

pub fn pack_masked(value: u16, tag: bool) -> u16 {
    CODE.pack_masked(value, tag)
}

/// Corrects a single bit error or detects a double bit error in `codeword`
pub fn correct(codeword: u16) -> Correction<u16> {
    CODE.correct(codeword)
}

/// Corrects `codeword` and returns its value and tag
pub fn decode(codeword: u16) -> Result<(u16, bool)> {
    CODE.decode(codeword)
}
