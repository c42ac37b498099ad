//! CIDR block allocation
//!
//! Provides:
//! - A bump allocator carving aligned sub-blocks from a parent block
//! - A mutex-shared handle for callers that need one allocator across threads

mod bump;
mod shared;

pub use bump::BumpAllocator;
pub use shared::SharedAllocator;

use crate::cidr::CidrBlock;
use crate::Result;

/// Trait for CIDR sub-block allocation
pub trait CidrAllocator: Send + Sync {
    /// Allocate the next aligned block of the given prefix length
    fn allocate_block(&mut self, prefix_len: u8) -> Result<CidrBlock>;

    /// Allocate the next aligned block and format it as `a.b.c.d/n`
    fn allocate(&mut self, prefix_len: u8) -> Result<String> {
        self.allocate_block(prefix_len).map(|block| block.to_string())
    }

    /// Skip exactly `addresses` addresses without alignment
    fn reserve(&mut self, addresses: u64);

    /// Total consumed offset from the parent base, including the initial reservation
    fn counter(&self) -> u64;

    /// Free addresses between the cursor and the end of the parent block
    fn remaining(&self) -> u64;

    /// The parent block being partitioned
    fn parent(&self) -> CidrBlock;
}
