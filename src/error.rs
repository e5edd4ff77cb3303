use thiserror::Error;

/// Errors produced by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed code parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payload has significant bits beyond the value field
    #[error("Input too large: {length} bits, field holds at most {max_length}")]
    InputTooLarge { length: usize, max_length: usize },

    /// Two bit errors were detected and nothing could be recovered
    #[error("Uncorrectable codeword: double bit error detected")]
    Uncorrectable,
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;
