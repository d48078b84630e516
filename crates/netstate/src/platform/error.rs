//! Error types for building platform objects from external input.

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning external input into platform objects.
///
/// Only expected failures live here: malformed device records, bad address
/// strings and the like. Contract violations between the cache and its
/// indices are bugs and panic instead of returning a variant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Address string not understood.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Prefix length out of range for the address family.
    #[error("invalid prefix length /{plen}: family maximum is /{max}")]
    InvalidPrefix {
        /// The rejected prefix length.
        plen: u8,
        /// Largest prefix length the family allows.
        max: u8,
    },
}
