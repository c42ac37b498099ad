//! Bump allocator over a parent CIDR block
//!
//! Keeps a single cursor, the offset from the parent base to the next
//! unclaimed address. Each allocation pads the cursor up to the requested
//! block's own size boundary, claims the block, and moves the cursor past
//! it. Nothing is ever released.

use super::CidrAllocator;
use crate::cidr::{self, block_size, CidrBlock};
use crate::defaults::{ADDRESS_SPACE_END, DEFAULT_INITIAL_COUNTER, MAX_PREFIX_LEN};
use crate::state::AllocatorState;
use crate::{Error, Result};
use tracing::{debug, warn};

/// Monotonic, alignment-aware allocator for one parent block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpAllocator {
    /// Parent address space
    parent: CidrBlock,
    /// Offset from `parent.base_address()` to the next unclaimed address
    cursor: u64,
}

impl BumpAllocator {
    /// Create an allocator with the low [`DEFAULT_INITIAL_COUNTER`] addresses reserved
    pub fn new(parent: CidrBlock) -> Self {
        Self::with_initial_counter(parent, DEFAULT_INITIAL_COUNTER)
    }

    /// Create an allocator starting at an explicit cursor
    pub fn with_initial_counter(parent: CidrBlock, initial_counter: u64) -> Self {
        if !parent.is_aligned() {
            warn!(
                parent = %parent,
                "Parent block base is not aligned to its prefix, using it as given"
            );
        }

        Self {
            parent,
            cursor: initial_counter,
        }
    }

    /// Parse the parent block and create an allocator with the default reservation
    pub fn from_cidr(parent: &str) -> Result<Self> {
        Ok(Self::new(cidr::parse(parent)?))
    }

    /// Continue from a counter exported by an earlier run
    ///
    /// `increment` adds headroom beyond the saved counter, for blocks claimed
    /// by a third party between the two runs.
    pub fn resume(parent: CidrBlock, saved_counter: u64, increment: u64) -> Self {
        Self::from_state(AllocatorState::resume(parent, saved_counter, increment))
    }

    /// Rebuild an allocator from a state snapshot
    pub fn from_state(state: AllocatorState) -> Self {
        Self::with_initial_counter(state.parent, state.cursor)
    }

    /// Snapshot the allocator for persistence
    pub fn state(&self) -> AllocatorState {
        AllocatorState {
            parent: self.parent,
            cursor: self.cursor,
        }
    }

    /// Absolute address of the cursor
    fn candidate_start(&self) -> u64 {
        u64::from(self.parent.base_address()).saturating_add(self.cursor)
    }

    /// End of allocatable space; an unaligned parent may run past the top of IPv4
    fn space_end(&self) -> u64 {
        self.parent.end().min(ADDRESS_SPACE_END)
    }
}

impl CidrAllocator for BumpAllocator {
    fn allocate_block(&mut self, prefix_len: u8) -> Result<CidrBlock> {
        if prefix_len > MAX_PREFIX_LEN {
            return Err(Error::InvalidCidr(format!(
                "Prefix length {} exceeds {}",
                prefix_len, MAX_PREFIX_LEN
            )));
        }

        let size = block_size(prefix_len);
        let candidate_start = self.candidate_start();

        // Pad up to the next multiple of the requested size
        let remainder = candidate_start % size;
        let pad = if remainder == 0 { 0 } else { size - remainder };
        let aligned_start = candidate_start.saturating_add(pad);

        let space_end = self.space_end();
        if aligned_start.saturating_add(size) > space_end {
            let remaining = space_end.saturating_sub(candidate_start);
            warn!(
                parent = %self.parent,
                prefix_len,
                requested = size,
                remaining,
                "Address space exhausted"
            );
            return Err(Error::AddressSpaceExhausted {
                requested: size,
                remaining,
            });
        }

        // aligned_start + size <= space_end <= 2^32, so the start fits in a u32
        let block = CidrBlock::new(aligned_start as u32, prefix_len)?;
        self.cursor += pad + size;

        debug!(
            parent = %self.parent,
            block = %block,
            pad,
            counter = self.cursor,
            "Allocated block"
        );

        Ok(block)
    }

    fn reserve(&mut self, addresses: u64) {
        self.cursor = self.cursor.saturating_add(addresses);
    }

    fn counter(&self) -> u64 {
        self.cursor
    }

    fn remaining(&self) -> u64 {
        self.space_end().saturating_sub(self.candidate_start())
    }

    fn parent(&self) -> CidrBlock {
        self.parent
    }
}
