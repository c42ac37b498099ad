//! Dotted-quad CIDR codec
//!
//! Converts `a.b.c.d/n` strings to and from a base address held as a
//! big-endian `u32` plus a prefix length.

use crate::defaults::MAX_PREFIX_LEN;
use crate::{Error, Result};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 address range `[base_address, base_address + 2^(32 - prefix_len))`
///
/// The base address is kept exactly as given; it is not masked down to the
/// prefix boundary. Use [`CidrBlock::is_aligned`] to check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CidrBlock {
    base_address: u32,
    prefix_len: u8,
}

impl CidrBlock {
    /// Create a block from a raw base address and prefix length
    pub fn new(base_address: u32, prefix_len: u8) -> Result<Self> {
        if prefix_len > MAX_PREFIX_LEN {
            return Err(Error::InvalidCidr(format!(
                "Prefix length {} exceeds {}",
                prefix_len, MAX_PREFIX_LEN
            )));
        }

        Ok(Self {
            base_address,
            prefix_len,
        })
    }

    /// Base address as a `u32`
    pub fn base_address(&self) -> u32 {
        self.base_address
    }

    /// Base address as an [`Ipv4Addr`]
    pub fn addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.base_address)
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Number of addresses spanned by the block
    pub fn size(&self) -> u64 {
        block_size(self.prefix_len)
    }

    /// One past the last address in the block
    ///
    /// Held as `u64` because a block touching `255.255.255.255` ends at `2^32`.
    pub fn end(&self) -> u64 {
        u64::from(self.base_address) + self.size()
    }

    /// Whether the base address is a multiple of the block size
    pub fn is_aligned(&self) -> bool {
        u64::from(self.base_address) % self.size() == 0
    }

    /// Check if an address falls inside the block
    pub fn contains(&self, addr: u32) -> bool {
        let addr = u64::from(addr);
        addr >= u64::from(self.base_address) && addr < self.end()
    }

    /// Check if two blocks share at least one address
    pub fn overlaps(&self, other: &CidrBlock) -> bool {
        u64::from(self.base_address) < other.end() && u64::from(other.base_address) < self.end()
    }
}

/// Number of addresses in a block with the given prefix length
///
/// Callers must pass a prefix no longer than 32.
pub(crate) fn block_size(prefix_len: u8) -> u64 {
    1u64 << (32 - u32::from(prefix_len))
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", int_to_ip(self.base_address), self.prefix_len)
    }
}

impl FromStr for CidrBlock {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl TryFrom<String> for CidrBlock {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        parse(&s)
    }
}

impl From<CidrBlock> for String {
    fn from(block: CidrBlock) -> Self {
        block.to_string()
    }
}

impl From<Ipv4Net> for CidrBlock {
    fn from(net: Ipv4Net) -> Self {
        Self {
            base_address: u32::from(net.addr()),
            prefix_len: net.prefix_len(),
        }
    }
}

impl TryFrom<CidrBlock> for Ipv4Net {
    type Error = Error;

    fn try_from(block: CidrBlock) -> Result<Self> {
        Ok(Ipv4Net::new(block.addr(), block.prefix_len)?)
    }
}

/// Parse a `a.b.c.d/n` string into a [`CidrBlock`]
pub fn parse(text: &str) -> Result<CidrBlock> {
    let mut parts = text.split('/');
    let (ip, prefix) = match (parts.next(), parts.next(), parts.next()) {
        (Some(ip), Some(prefix), None) => (ip, prefix),
        _ => {
            return Err(Error::InvalidCidr(format!(
                "{:?} must contain exactly one '/'",
                text
            )))
        }
    };

    let base_address = ip_to_int(ip)?;
    let prefix_len = parse_decimal::<u8>(prefix).ok_or_else(|| {
        Error::InvalidCidr(format!("{:?} has a non-numeric prefix length", text))
    })?;

    CidrBlock::new(base_address, prefix_len)
}

/// Convert a dotted-quad address to its big-endian `u32` value
pub fn ip_to_int(ip: &str) -> Result<u32> {
    let mut octets = [0u8; 4];
    let mut count = 0;

    for part in ip.split('.') {
        if count == octets.len() {
            return Err(Error::InvalidCidr(format!(
                "{:?} has more than four octets",
                ip
            )));
        }
        octets[count] = parse_decimal::<u8>(part).ok_or_else(|| {
            Error::InvalidCidr(format!("{:?} has an invalid octet {:?}", ip, part))
        })?;
        count += 1;
    }

    if count != octets.len() {
        return Err(Error::InvalidCidr(format!(
            "{:?} has {} octets, expected 4",
            ip, count
        )));
    }

    Ok(u32::from_be_bytes(octets))
}

/// Convert a `u32` to dotted-quad notation
pub fn int_to_ip(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

/// Plain ASCII decimal, no sign or whitespace
fn parse_decimal<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
