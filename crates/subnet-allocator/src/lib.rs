//! Subnet Allocator
//!
//! Carves successive, non-overlapping sub-blocks out of a parent IPv4 CIDR block:
//! - Naturally aligned blocks (each base is a multiple of its own size)
//! - Mixed prefix lengths in any order
//! - Cursor export/import so a later, independent run continues where an earlier one stopped
//!
//! Features:
//! - Dotted-quad CIDR codec
//! - Bump allocation with alignment padding
//! - Serializable allocator state
//! - DNS resolver address derivation
//! - Environment-driven configuration
//! - Mutex-shared and async (deferred input) adapters

pub mod allocator;
pub mod cidr;
pub mod config;
pub mod deferred;
pub mod dns;
pub mod error;
pub mod state;

// Re-export core types
pub use allocator::{BumpAllocator, CidrAllocator, SharedAllocator};
pub use cidr::{int_to_ip, ip_to_int, parse, CidrBlock};
pub use config::AllocatorConfig;
pub use deferred::DeferredAllocator;
pub use dns::dns_server_address;
pub use error::{Error, Result};
pub use state::AllocatorState;

/// Allocation defaults
pub mod defaults {
    /// Addresses reserved at the bottom of every parent block unless an explicit
    /// initial counter is supplied. Follows AWS subnet sizing guidance.
    pub const DEFAULT_INITIAL_COUNTER: u64 = 256;

    /// Offset of the DNS resolver from the base of a primary block
    pub const DNS_RESOLVER_OFFSET: u32 = 2;

    /// Longest valid IPv4 prefix
    pub const MAX_PREFIX_LEN: u8 = 32;

    /// One past `255.255.255.255`
    pub const ADDRESS_SPACE_END: u64 = 1 << 32;
}
