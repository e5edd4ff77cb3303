//! Extended Hamming SEC-DED engine over a single machine word.
//!
//! An extended Hamming code adds one global parity bit to a classical Hamming
//! code, which lifts it from single-error correcting to Single-Error Correcting,
//! Double-Error Detecting (SEC-DED). Any one flipped bit is located and repaired;
//! any two flipped bits are reported as uncorrectable.
//!
//! The codeword packs four fields into one unsigned integer, from the least
//! significant bit upwards:
//!
//! | Field         | Bits          | Width |
//! |---------------|---------------|-------|
//! | Tag           | 0             | 1     |
//! | Global parity | 1             | 1     |
//! | Check bits    | 2 ..= r + 1   | r     |
//! | Value         | r + 2 .. n    | n-r-2 |
//!
//! Check bit `i` is the parity of the word under mask `M_i`. The masks follow
//! the classical construction over the value positions, except that the tag bit
//! is folded into `M_0` and `M_1` only. A flipped tag therefore yields syndrome
//! `3`, a value no other single-bit error can produce.
//!
//! The design follows the ECC chapter of Henry S. Warren's "Hacker's Delight".

use crate::error::{Error, Result};
use log::{debug, warn};
use num_traits::{PrimInt, Unsigned};
use std::fmt::{Binary, Debug, LowerHex};

/// Position of the caller-supplied tag bit
const TAG_BIT: usize = 0;

/// Position of the global parity bit
const GLOBAL_PARITY_BIT: usize = 1;

/// Position of check bit 0; check bit `i` lives at `FIRST_CHECK_BIT + i`
const FIRST_CHECK_BIT: usize = 2;

/// Syndrome produced by a flipped tag bit
const TAG_SYNDROME: u32 = 3;

/// Unsigned machine words usable as codewords.
pub trait CodeWord:
    PrimInt + Unsigned + Debug + Binary + LowerHex + Send + Sync + 'static
{
    /// Width of the word in bits
    const WIDTH: u32;
}

macro_rules! impl_code_word {
    ($($t:ty),*) => {
        $(
            impl CodeWord for $t {
                const WIDTH: u32 = <$t>::BITS;
            }
        )*
    };
}

impl_code_word!(u8, u16, u64);

/// Field of the codeword that held a corrected bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitLocation {
    /// The tag bit (position 0)
    Tag,
    /// The global parity bit (position 1)
    GlobalParity,
    /// Check bit with the given index
    Check(u32),
    /// Value bit with the given index, 0 being the least significant value bit
    Value(u32),
}

/// Outcome of running [`SecDedCode::correct`] on a received word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction<W> {
    /// No error; the word is returned unchanged
    Clean(W),
    /// Exactly one bit was flipped and has been repaired
    Corrected {
        /// The repaired codeword
        codeword: W,
        /// Absolute bit position that was flipped back
        position: u32,
        /// Field the flipped bit belongs to
        location: BitLocation,
    },
    /// Two bits were flipped; nothing can be recovered
    Uncorrectable,
}

impl<W: CodeWord> Correction<W> {
    /// Number of bit errors detected: 0, 1 or 2
    pub fn error_count(&self) -> u8 {
        match self {
            Correction::Clean(_) => 0,
            Correction::Corrected { .. } => 1,
            Correction::Uncorrectable => 2,
        }
    }

    /// The valid codeword, if one could be recovered
    pub fn codeword(&self) -> Option<W> {
        match *self {
            Correction::Clean(codeword) | Correction::Corrected { codeword, .. } => Some(codeword),
            Correction::Uncorrectable => None,
        }
    }

    /// Field of the repaired bit, for single-bit corrections
    pub fn location(&self) -> Option<BitLocation> {
        match *self {
            Correction::Corrected { location, .. } => Some(location),
            _ => None,
        }
    }

    pub fn is_uncorrectable(&self) -> bool {
        matches!(self, Correction::Uncorrectable)
    }

    /// Flattens the outcome into an `(error_count, word)` pair.
    ///
    /// An uncorrectable word yields `(2, 0)`. The zero is a sentinel, not a
    /// decoded codeword, and must not be interpreted as one.
    pub fn into_parts(self) -> (u8, W) {
        let count = self.error_count();
        (count, self.codeword().unwrap_or_else(W::zero))
    }
}

/// An extended Hamming SEC-DED code over the word type `W`.
///
/// The code is fully described by its check-bit masks: `r = check_masks.len()`
/// check bits, a word of `n = 2^r` bits and a value field of `n - r - 2` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecDedCode<W: 'static> {
    /// Covering mask of each check bit, indexed by check bit
    check_masks: &'static [W],
}

impl<W: 'static> SecDedCode<W> {
    /// Builds a code from a mask table known to be well formed.
    pub(crate) const fn from_masks(check_masks: &'static [W]) -> Self {
        SecDedCode { check_masks }
    }
}

impl<W: CodeWord> SecDedCode<W> {
    /// Creates a code from a table of check-bit covering masks.
    ///
    /// # Arguments
    ///
    /// * `check_masks` - Mask `M_i` for every check bit `i`, least significant first
    ///
    /// # Returns
    ///
    /// A new `SecDedCode`, or `Error::InvalidInput` if the masks do not describe an
    /// extended Hamming code with the tag fold over a `W`-sized word
    pub fn new(check_masks: &'static [W]) -> Result<Self> {
        let code = Self::from_masks(check_masks);
        let r = check_masks.len();

        if r < 2 {
            return Err(Error::InvalidInput(format!(
                "At least 2 check bits are required, got {}",
                r
            )));
        }

        if r >= W::WIDTH as usize || 1usize << r != code.code_bits() {
            return Err(Error::InvalidInput(format!(
                "{} check bits do not fit a {}-bit word",
                r,
                code.code_bits()
            )));
        }

        let reserved = code.check_field_mask() | bit::<W>(GLOBAL_PARITY_BIT);
        for (i, &mask) in check_masks.iter().enumerate() {
            if mask & reserved != W::zero() {
                return Err(Error::InvalidInput(format!(
                    "Check mask {} ({:#x}) covers the parity or check field",
                    i, mask
                )));
            }

            let covers_tag = mask & bit::<W>(TAG_BIT) != W::zero();
            if covers_tag != (i < 2) {
                return Err(Error::InvalidInput(format!(
                    "Tag bit must be covered by check masks 0 and 1 only, mask {} ({:#x}) disagrees",
                    i, mask
                )));
            }
        }

        for position in code.value_shift()..code.code_bits() {
            let syndrome = check_masks
                .iter()
                .enumerate()
                .filter(|&(_, &mask)| mask & bit::<W>(position) != W::zero())
                .fold(0u32, |syndrome, (i, _)| syndrome | 1 << i);

            let maps_back = syndrome != 0
                && syndrome != TAG_SYNDROME
                && !syndrome.is_power_of_two()
                && code.position_of(code.locate(syndrome)) as usize == position;

            if !maps_back {
                return Err(Error::InvalidInput(format!(
                    "Value bit {} has syndrome {:#x}, which does not locate it",
                    position, syndrome
                )));
            }
        }

        Ok(code)
    }

    /// Covering masks of the check bits
    pub fn check_masks(&self) -> &'static [W] {
        self.check_masks
    }

    /// Number of Hamming check bits (r)
    pub fn check_bits(&self) -> usize {
        self.check_masks.len()
    }

    /// Total codeword width in bits (n)
    pub fn code_bits(&self) -> usize {
        W::WIDTH as usize
    }

    /// Position of the least significant value bit
    pub fn value_shift(&self) -> usize {
        FIRST_CHECK_BIT + self.check_bits()
    }

    /// Width of the protected value field
    pub fn value_bits(&self) -> usize {
        self.code_bits() - self.value_shift()
    }

    /// Largest value the code can protect
    pub fn max_value(&self) -> W {
        W::max_value() >> self.value_shift()
    }

    fn check_field_mask(&self) -> W {
        ((W::one() << self.check_bits()) - W::one()) << FIRST_CHECK_BIT
    }

    /// Packs `value` and `tag` into a checkable codeword.
    ///
    /// # Arguments
    ///
    /// * `value` - Payload; must fit in `value_bits()` bits
    /// * `tag` - Auxiliary bit stored at position 0
    ///
    /// # Returns
    ///
    /// The codeword, or `Error::InputTooLarge` if `value` has bits above the value field
    pub fn pack(&self, value: W, tag: bool) -> Result<W> {
        if value > self.max_value() {
            return Err(Error::InputTooLarge {
                length: (W::WIDTH - value.leading_zeros()) as usize,
                max_length: self.value_bits(),
            });
        }

        Ok(self.encode(value, tag))
    }

    /// Packs the low `value_bits()` bits of `value` with `tag`, dropping the rest.
    pub fn pack_masked(&self, value: W, tag: bool) -> W {
        self.encode(value & self.max_value(), tag)
    }

    fn encode(&self, value: W, tag: bool) -> W {
        let mut word = value << self.value_shift();
        if tag {
            word = word | bit(TAG_BIT);
        }

        word = word | self.compute_check_bits(word);

        if parity(word) {
            word = word | bit(GLOBAL_PARITY_BIT);
        }
        word
    }

    /// Computes the check bits for `word`, placed at their codeword positions.
    ///
    /// The masks never cover the parity or check field, so the result does not
    /// depend on what those fields currently hold.
    pub fn compute_check_bits(&self, word: W) -> W {
        self.check_masks
            .iter()
            .enumerate()
            .filter(|&(_, &mask)| parity(word & mask))
            .fold(W::zero(), |bits, (i, _)| bits | bit(FIRST_CHECK_BIT + i))
    }

    /// The check bits currently stored in `word`, in place
    pub fn stored_check_bits(&self, word: W) -> W {
        word & self.check_field_mask()
    }

    /// Recomputed check bits XOR stored check bits, with bit `i` of the
    /// result belonging to check bit `i`.
    pub fn syndrome(&self, word: W) -> u32 {
        let diff = self.compute_check_bits(word) ^ self.stored_check_bits(word);
        (0..self.check_bits())
            .filter(|&i| diff & bit::<W>(FIRST_CHECK_BIT + i) != W::zero())
            .fold(0, |syndrome, i| syndrome | 1 << i)
    }

    /// Maps a nonzero syndrome to the field holding the flipped bit.
    ///
    /// # Panics
    ///
    /// Panics if `syndrome` is zero or does not fit in `check_bits()` bits. Both
    /// indicate a logic error in the caller; no received word can produce them.
    pub fn locate(&self, syndrome: u32) -> BitLocation {
        let r = self.check_bits() as u32;
        assert!(syndrome < 1 << r, "syndrome too big ({:#x})", syndrome);

        match syndrome {
            0 => panic!("syndrome not mapped ({:#x})", syndrome),
            TAG_SYNDROME => BitLocation::Tag,
            s if s.is_power_of_two() => BitLocation::Check(s.trailing_zeros()),
            s => {
                // One extra position for every check bit above s
                let position = s + (r - 1 - s.ilog2());
                let shift = self.value_shift() as u32;
                debug_assert!(position >= shift && position < W::WIDTH);
                BitLocation::Value(position - shift)
            }
        }
    }

    /// Absolute bit position of `location` within the codeword
    pub fn position_of(&self, location: BitLocation) -> u32 {
        match location {
            BitLocation::Tag => TAG_BIT as u32,
            BitLocation::GlobalParity => GLOBAL_PARITY_BIT as u32,
            BitLocation::Check(index) => FIRST_CHECK_BIT as u32 + index,
            BitLocation::Value(index) => self.value_shift() as u32 + index,
        }
    }

    /// Checks `word` and repairs a single flipped bit.
    ///
    /// | parity | syndrome | outcome                           |
    /// |--------|----------|-----------------------------------|
    /// | even   | zero     | `Clean`, word unchanged           |
    /// | even   | nonzero  | `Uncorrectable` (two bits)        |
    /// | odd    | zero     | global parity bit flipped back    |
    /// | odd    | nonzero  | bit located by the syndrome fixed |
    pub fn correct(&self, word: W) -> Correction<W> {
        let odd = parity(word);
        let syndrome = self.syndrome(word);

        match (odd, syndrome) {
            (false, 0) => Correction::Clean(word),
            (false, _) => {
                warn!(
                    "Uncorrectable {}-bit codeword {:#x}: syndrome {:#x} with even parity",
                    self.code_bits(),
                    word,
                    syndrome
                );
                Correction::Uncorrectable
            }
            (true, 0) => self.repair(word, BitLocation::GlobalParity),
            (true, s) => self.repair(word, self.locate(s)),
        }
    }

    fn repair(&self, word: W, location: BitLocation) -> Correction<W> {
        let position = self.position_of(location);
        debug!(
            "Corrected bit {} ({:?}) of {}-bit codeword {:#x}",
            position,
            location,
            self.code_bits(),
            word
        );

        Correction::Corrected {
            codeword: word ^ bit(position as usize),
            position,
            location,
        }
    }

    /// Value field of `word`, without any checking
    pub fn value_of(&self, word: W) -> W {
        word >> self.value_shift()
    }

    /// Tag bit of `word`, without any checking
    pub fn tag_of(&self, word: W) -> bool {
        word & bit::<W>(TAG_BIT) != W::zero()
    }

    /// Corrects `word` and splits it into its value and tag.
    ///
    /// Returns `Error::Uncorrectable` when a double bit error is detected.
    pub fn decode(&self, word: W) -> Result<(W, bool)> {
        let codeword = self
            .correct(word)
            .codeword()
            .ok_or(Error::Uncorrectable)?;
        Ok((self.value_of(codeword), self.tag_of(codeword)))
    }
}

fn bit<W: CodeWord>(position: usize) -> W {
    W::one() << position
}

fn parity<W: CodeWord>(word: W) -> bool {
    word.count_ones() & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::{hamming11, hamming4, hamming57};

    /// Classical Hamming masks with the tag folded into the two lowest masks.
    fn derived_masks<W: CodeWord>(r: usize) -> Vec<W> {
        let mut masks = vec![W::zero(); r];
        masks[0] = bit(TAG_BIT);
        masks[1] = bit(TAG_BIT);

        let value_syndromes = (1u32..1 << r).filter(|s| *s != 3 && !s.is_power_of_two());
        for (index, syndrome) in value_syndromes.enumerate() {
            let position = FIRST_CHECK_BIT + r + index;
            for (i, mask) in masks.iter_mut().enumerate() {
                if syndrome & (1 << i) != 0 {
                    *mask = *mask | bit(position);
                }
            }
        }
        masks
    }

    static TOO_FEW: [u8; 1] = [0x01];
    static WRONG_WIDTH: [u16; 3] = [0xa1, 0xc1, 0xe0];
    static COVERS_CHECK_FIELD: [u8; 3] = [0xa1 | 0x04, 0xc1, 0xe0];
    static TAG_IN_HIGH_MASK: [u8; 3] = [0xa1, 0xc1, 0xe1];
    static TAG_MISSING: [u8; 3] = [0xa0, 0xc1, 0xe0];
    static DUPLICATE_SYNDROME: [u8; 3] = [0xe1, 0xc1, 0xe0];

    #[test]
    fn test_builtin_masks_validate() {
        assert_eq!(SecDedCode::new(hamming4::CODE.check_masks()).unwrap(), hamming4::CODE);
        assert_eq!(SecDedCode::new(hamming11::CODE.check_masks()).unwrap(), hamming11::CODE);
        assert_eq!(SecDedCode::new(hamming57::CODE.check_masks()).unwrap(), hamming57::CODE);
    }

    #[test]
    fn test_builtin_masks_match_construction() {
        assert_eq!(derived_masks::<u8>(3), hamming4::CODE.check_masks());
        assert_eq!(derived_masks::<u16>(4), hamming11::CODE.check_masks());
        assert_eq!(derived_masks::<u64>(6), hamming57::CODE.check_masks());
    }

    #[test]
    fn test_invalid_masks() {
        for masks in [
            &TOO_FEW[..],
            &COVERS_CHECK_FIELD[..],
            &TAG_IN_HIGH_MASK[..],
            &TAG_MISSING[..],
            &DUPLICATE_SYNDROME[..],
        ] {
            let result = SecDedCode::new(masks);
            assert!(matches!(result, Err(Error::InvalidInput(_))), "{:x?}", masks);
        }

        assert!(matches!(
            SecDedCode::new(&WRONG_WIDTH[..]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_geometry() {
        let code = hamming11::CODE;
        assert_eq!(code.check_bits(), 4);
        assert_eq!(code.code_bits(), 16);
        assert_eq!(code.value_shift(), 6);
        assert_eq!(code.value_bits(), 10);
        assert_eq!(code.max_value(), 0x3ff);
        assert_eq!(code.check_field_mask(), 0x3c);

        let code = hamming57::CODE;
        assert_eq!(code.value_bits(), 56);
        assert_eq!(code.check_field_mask(), 0xfc);
        assert_eq!(code.max_value(), (1u64 << 56) - 1);
    }

    #[test]
    fn test_locate_value_offsets() {
        let code = hamming57::CODE;
        let expected = [(5, 8), (7, 10), (9, 11), (15, 17), (17, 18), (31, 32), (33, 33), (63, 63)];
        for (syndrome, position) in expected {
            assert_eq!(code.position_of(code.locate(syndrome)), position);
        }

        let code = hamming11::CODE;
        for (syndrome, position) in [(5, 6), (7, 8), (9, 9), (15, 15)] {
            assert_eq!(code.position_of(code.locate(syndrome)), position);
        }
    }

    #[test]
    fn test_locate_special_syndromes() {
        let code = hamming57::CODE;
        assert_eq!(code.locate(3), BitLocation::Tag);
        for i in 0..6 {
            assert_eq!(code.locate(1 << i), BitLocation::Check(i));
            assert_eq!(code.position_of(BitLocation::Check(i)), i + 2);
        }
        assert_eq!(code.position_of(BitLocation::GlobalParity), 1);
    }

    #[test]
    #[should_panic(expected = "syndrome too big")]
    fn test_locate_out_of_range_panics() {
        hamming4::CODE.locate(8);
    }

    #[test]
    #[should_panic(expected = "syndrome not mapped")]
    fn test_locate_zero_panics() {
        hamming11::CODE.locate(0);
    }

    #[test]
    fn test_check_bits_ignore_reserved_fields() {
        let code = hamming11::CODE;
        let word = code.pack(0x2a5, true).unwrap();
        let scrubbed = word & !(code.check_field_mask() | bit::<u16>(GLOBAL_PARITY_BIT));
        assert_eq!(code.compute_check_bits(word), code.compute_check_bits(scrubbed));
        assert_eq!(code.compute_check_bits(word), code.stored_check_bits(word));
    }

    #[test]
    fn test_pack_rejects_wide_values() {
        let code = hamming4::CODE;
        assert_eq!(
            code.pack(0b1000, false),
            Err(Error::InputTooLarge {
                length: 4,
                max_length: 3
            })
        );
        assert_eq!(code.pack_masked(0b1101, true), code.pack(0b101, true).unwrap());

        let code = hamming57::CODE;
        assert!(code.pack(1 << 56, false).is_err());
        assert!(code.pack((1 << 56) - 1, true).is_ok());
    }

    #[test]
    fn test_correction_parts() {
        let clean: Correction<u8> = Correction::Clean(0xa5);
        assert_eq!(clean.into_parts(), (0, 0xa5));
        assert_eq!(clean.location(), None);

        let fixed = Correction::Corrected {
            codeword: 0xa5u8,
            position: 0,
            location: BitLocation::Tag,
        };
        assert_eq!(fixed.error_count(), 1);
        assert_eq!(fixed.codeword(), Some(0xa5));
        assert_eq!(fixed.location(), Some(BitLocation::Tag));

        let lost: Correction<u8> = Correction::Uncorrectable;
        assert!(lost.is_uncorrectable());
        assert_eq!(lost.codeword(), None);
        assert_eq!(lost.into_parts(), (2, 0));
    }

    #[test]
    fn test_decode() {
        let code = hamming11::CODE;
        let word = code.pack(0x155, true).unwrap();
        assert_eq!(code.decode(word), Ok((0x155, true)));
        assert_eq!(code.decode(word ^ 0x0400), Ok((0x155, true)));
        assert_eq!(code.decode(word ^ 0x0401), Err(Error::Uncorrectable));
    }
}
