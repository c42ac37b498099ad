//! Derived addresses
//!
//! The second address after the base of a primary block is reserved for the
//! DNS resolver.

use crate::cidr::{self, int_to_ip};
use crate::defaults::DNS_RESOLVER_OFFSET;
use crate::Result;

/// DNS resolver address for a block: base + 2
pub fn dns_server_address(block: &str) -> Result<String> {
    let block = cidr::parse(block)?;
    Ok(int_to_ip(
        block.base_address().wrapping_add(DNS_RESOLVER_OFFSET),
    ))
}
