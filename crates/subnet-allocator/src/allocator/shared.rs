//! Mutex-shared allocator handle
//!
//! Serializes `allocate()` calls from several threads onto one cursor.
//! Allocation order follows lock acquisition order, so results are only
//! deterministic when callers order their own calls.

use super::{BumpAllocator, CidrAllocator};
use crate::cidr::CidrBlock;
use crate::state::AllocatorState;
use crate::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to a single [`BumpAllocator`]
#[derive(Debug, Clone)]
pub struct SharedAllocator {
    inner: Arc<Mutex<BumpAllocator>>,
}

impl SharedAllocator {
    pub fn new(allocator: BumpAllocator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(allocator)),
        }
    }

    /// Snapshot the underlying allocator
    pub fn state(&self) -> AllocatorState {
        self.inner.lock().state()
    }
}

impl From<BumpAllocator> for SharedAllocator {
    fn from(allocator: BumpAllocator) -> Self {
        Self::new(allocator)
    }
}

impl CidrAllocator for SharedAllocator {
    fn allocate_block(&mut self, prefix_len: u8) -> Result<CidrBlock> {
        self.inner.lock().allocate_block(prefix_len)
    }

    fn reserve(&mut self, addresses: u64) {
        self.inner.lock().reserve(addresses)
    }

    fn counter(&self) -> u64 {
        self.inner.lock().counter()
    }

    fn remaining(&self) -> u64 {
        self.inner.lock().remaining()
    }

    fn parent(&self) -> CidrBlock {
        self.inner.lock().parent()
    }
}
