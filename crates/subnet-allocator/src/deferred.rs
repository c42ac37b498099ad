//! Async adapter for deferred inputs
//!
//! The parent block and saved counter are often produced by other,
//! asynchronous planning steps. [`DeferredAllocator::resolve`] awaits them
//! up front and hands plain scalars to the synchronous [`BumpAllocator`].
//! After that, allocation order is the order in which `allocate` calls
//! acquire the lock, independent of when the inputs settled.

use crate::allocator::{BumpAllocator, CidrAllocator};
use crate::cidr;
use crate::defaults::DEFAULT_INITIAL_COUNTER;
use crate::state::AllocatorState;
use crate::{Error, Result};
use std::fmt::Display;
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Allocator built from asynchronously resolved inputs
#[derive(Debug)]
pub struct DeferredAllocator {
    inner: Mutex<BumpAllocator>,
}

impl DeferredAllocator {
    /// Wrap an already-built allocator
    pub fn new(allocator: BumpAllocator) -> Self {
        Self {
            inner: Mutex::new(allocator),
        }
    }

    /// Await the parent block and optional saved counter, then build the allocator
    ///
    /// A `None` counter means a first run, starting at [`DEFAULT_INITIAL_COUNTER`].
    #[instrument(skip(parent, counter))]
    pub async fn resolve<P, C, PE, CE>(parent: P, counter: C, increment: u64) -> Result<Self>
    where
        P: Future<Output = std::result::Result<String, PE>>,
        C: Future<Output = std::result::Result<Option<u64>, CE>>,
        PE: Display,
        CE: Display,
    {
        let (parent, counter) = tokio::try_join!(
            async {
                parent
                    .await
                    .map_err(|e| Error::Deferred(format!("parent block: {}", e)))
            },
            async {
                counter
                    .await
                    .map_err(|e| Error::Deferred(format!("saved counter: {}", e)))
            },
        )?;

        let parent = cidr::parse(&parent)?;
        let saved = counter.unwrap_or(DEFAULT_INITIAL_COUNTER);
        debug!(parent = %parent, saved, "Deferred inputs resolved");

        Ok(Self::new(BumpAllocator::resume(parent, saved, increment)))
    }

    /// Allocate the next aligned block as `a.b.c.d/n`
    pub async fn allocate(&self, prefix_len: u8) -> Result<String> {
        self.inner.lock().await.allocate(prefix_len)
    }

    pub async fn counter(&self) -> u64 {
        self.inner.lock().await.counter()
    }

    pub async fn state(&self) -> AllocatorState {
        self.inner.lock().await.state()
    }

    /// Take back the synchronous allocator
    pub fn into_inner(self) -> BumpAllocator {
        self.inner.into_inner()
    }
}

impl From<BumpAllocator> for DeferredAllocator {
    fn from(allocator: BumpAllocator) -> Self {
        Self::new(allocator)
    }
}
