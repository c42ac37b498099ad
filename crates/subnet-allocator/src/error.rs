//! Error types for subnet allocation

use thiserror::Error;

/// Result type for allocator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Subnet allocator errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // CIDR errors
    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error(
        "Address space exhausted: requested {requested} addresses, {remaining} remaining"
    )]
    AddressSpaceExhausted { requested: u64, remaining: u64 },

    // State transfer errors
    #[error("Invalid allocator state: {0}")]
    InvalidState(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Deferred input errors
    #[error("Deferred input failed to resolve: {0}")]
    Deferred(String),
}

impl From<ipnet::PrefixLenError> for Error {
    fn from(e: ipnet::PrefixLenError) -> Self {
        Error::InvalidCidr(e.to_string())
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(e: std::net::AddrParseError) -> Self {
        Error::InvalidCidr(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidState(e.to_string())
    }
}
