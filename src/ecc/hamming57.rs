//! Extended Hamming (64, 57, 4) code.
//!
//! The (63, 57, 3) Hamming code plus a global parity bit, packed into a `u64`:
//! tag at bit 0, global parity at bit 1, check bits at 2..=7 and a 56-bit value
//! at 8..=63.
//!
//! # Examples
//!
//! ```rust
//! use hamming_secded::hamming57;
//!
//! let word = hamming57::pack_with_check_bits(0xdead_beef, false).unwrap();
//! assert_eq!(hamming57::decode(word ^ (1 << 40)).unwrap(), (0xdead_beef, false));
//! assert!(hamming57::decode(word ^ (1 << 40) ^ (1 << 3)).is_err());
//! ```

use crate::ecc::secded::{Correction, SecDedCode};
use crate::error::Result;

/// Number of value bits protected by the code
pub const VALUE_BITS: usize = 56;

/// The (64, 57) code. The low byte `01` in masks 0 and 1 selects the tag bit;
/// the other seven bits of that byte hold the check and parity bits.
pub const CODE: SecDedCode<u64> = SecDedCode::from_masks(&[
    0xaaaa_aaab_5556_ad01, // check bit 0
    0xcccc_cccd_999b_3601, // check bit 1
    0xf0f0_f0f1_e1e3_c700, // check bit 2
    0xff00_ff01_fe03_f800, // check bit 3
    0xffff_0001_fffc_0000, // check bit 4
    0xffff_fffe_0000_0000, // check bit 5
]);

/// Packs the low 56 bits of `value` and `tag` into a codeword.
///
/// Returns `Error::InputTooLarge` if `value` does not fit in 56 bits.
pub fn pack_with_check_bits(value: u64, tag: bool) -> Result<u64> {
    CODE.pack(value, tag)
}

/// Like [`pack_with_check_bits`], silently dropping the top byte of `value`
pub fn pack_masked(value: u64, tag: bool) -> u64 {
    CODE.pack_masked(value, tag)
}

/// Corrects a single bit error or detects a double bit error in `codeword`
pub fn correct(codeword: u64) -> Correction<u64> {
    CODE.correct(codeword)
}

pub fn decode(codeword: u64) -> Result<(u64, bool)> {
    CODE.decode(codeword)
}
