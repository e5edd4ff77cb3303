pub mod ecc;
pub mod error;

pub use ecc::{hamming11, hamming4, hamming57, BitLocation, CodeWord, Correction, SecDedCode};
pub use error::{Error, Result};
