//! Allocator state transfer
//!
//! A deployment exports its allocator's counter (or a full state snapshot)
//! into persisted output. A later, independent deployment imports it to
//! continue allocating from the same parent without overlap. No live
//! coordination between the two runs is required.

use crate::allocator::BumpAllocator;
use crate::cidr::CidrBlock;
use crate::defaults::DEFAULT_INITIAL_COUNTER;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Serializable allocator position within a parent block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorState {
    /// Parent block, serialized as `a.b.c.d/n`
    pub parent: CidrBlock,
    /// Offset from the parent base to the next unclaimed address
    pub cursor: u64,
}

impl AllocatorState {
    /// Fresh state with the default low reservation
    pub fn new(parent: CidrBlock) -> Self {
        Self {
            parent,
            cursor: DEFAULT_INITIAL_COUNTER,
        }
    }

    /// Import a saved counter, reserving `increment` extra addresses on top
    pub fn resume(parent: CidrBlock, saved_counter: u64, increment: u64) -> Self {
        Self {
            parent,
            cursor: saved_counter.saturating_add(increment),
        }
    }

    /// Build a live allocator positioned at this state
    pub fn into_allocator(self) -> BumpAllocator {
        BumpAllocator::from_state(self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&BumpAllocator> for AllocatorState {
    fn from(allocator: &BumpAllocator) -> Self {
        allocator.state()
    }
}
