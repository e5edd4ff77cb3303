//! Error correction codes over single machine words.
//!
//! This module provides extended Hamming SEC-DED codes that protect a small
//! integer value and a one-bit tag inside a `u8`, `u16` or `u64`:
//! - `hamming4` - (8, 4) code, 3 value bits
//! - `hamming11` - (16, 11) code, 10 value bits
//! - `hamming57` - (64, 57) code, 56 value bits
//!
//! All three share one engine, [`SecDedCode`], and differ only in their word
//! type and check-bit mask table.
//!
//! # Examples
//!
//! ```rust
//! use hamming_secded::hamming4;
//!
//! let word = hamming4::pack_with_check_bits(0b101, true).unwrap();
//! let damaged = word ^ (1 << 6);
//!
//! let fixed = hamming4::correct(damaged);
//! assert_eq!(fixed.into_parts(), (1, word));
//! ```

pub use crate::error::{Error, Result};

/// Generic extended Hamming engine
pub mod secded;
pub use secded::{BitLocation, CodeWord, Correction, SecDedCode};

/// Extended Hamming (8, 4) over `u8`
pub mod hamming4;

/// Extended Hamming (16, 11) over `u16`
pub mod hamming11;

/// Extended Hamming (64, 57) over `u64`
pub mod hamming57;
