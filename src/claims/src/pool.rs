//! Reusable scratch buffers for claim batches
//!
//! Derivations run on every authenticated request, so the batch of produced
//! claims is staged in a pooled `Vec<Claim>` instead of a fresh allocation.
//!
//! - **Exclusive checkout**: a [`PooledBuffer`] is owned by one caller until dropped
//! - **RAII release**: dropping the guard clears the buffer and returns it
//! - **Bounded retention**: oversized buffers and buffers beyond `max_idle` are freed
//!
//! # Example
//!
//! ```rust
//! use cretoai_claims::pool::{ClaimBufferPool, PoolConfig};
//! use cretoai_claims::Claim;
//!
//! let pool = ClaimBufferPool::new(PoolConfig::default());
//!
//! {
//!     let mut buffer = pool.checkout(2);
//!     buffer.push(Claim::role("Admin"));
//!     buffer.push(Claim::role("Editor"));
//!     assert_eq!(buffer.len(), 2);
//! } // cleared and returned here
//!
//! assert_eq!(pool.stats().idle, 1);
//! ```

use crate::types::Claim;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

static SHARED_POOL: Lazy<Arc<ClaimBufferPool>> =
    Lazy::new(|| Arc::new(ClaimBufferPool::new(PoolConfig::default())));

/// Buffer pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of idle buffers kept for reuse
    pub max_idle: usize,

    /// Buffers whose capacity grew beyond this are freed instead of pooled
    pub max_retained_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: 64,
            max_retained_capacity: 256,
        }
    }
}

/// Process-wide pool of claim buffers
///
/// # Thread Safety
///
/// The idle list sits behind a `parking_lot::Mutex` that is held only to pop
/// or push a buffer; counters are atomics. A checked-out buffer is never
/// shared, so callers need no locking of their own.
#[derive(Debug)]
pub struct ClaimBufferPool {
    idle: Mutex<Vec<Vec<Claim>>>,
    config: PoolConfig,
    checkouts: AtomicU64,
    reused: AtomicU64,
    allocated: AtomicU64,
    discarded: AtomicU64,
}

impl ClaimBufferPool {
    /// Create a new pool with the given configuration
    pub fn new(config: PoolConfig) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(config.max_idle)),
            config,
            checkouts: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            allocated: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    /// The process-wide shared pool
    pub fn shared() -> Arc<ClaimBufferPool> {
        Arc::clone(&SHARED_POOL)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Check out an empty buffer able to hold at least `min_capacity` claims
    /// without reallocating
    pub fn checkout(&self, min_capacity: usize) -> PooledBuffer<'_> {
        self.checkouts.fetch_add(1, Ordering::Relaxed);

        let recycled = self.idle.lock().pop();
        let buffer = match recycled {
            Some(mut buffer) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                buffer.reserve(min_capacity);
                buffer
            }
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                Vec::with_capacity(min_capacity)
            }
        };

        PooledBuffer { pool: self, buffer }
    }

    /// Return a buffer to the idle list, or free it when it would exceed the
    /// retention bounds
    fn release(&self, mut buffer: Vec<Claim>) {
        buffer.clear();

        if buffer.capacity() == 0 {
            return;
        }

        if buffer.capacity() > self.config.max_retained_capacity {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            debug!(
                capacity = buffer.capacity(),
                max = self.config.max_retained_capacity,
                "Discarding oversized claim buffer"
            );
            return;
        }

        let mut idle = self.idle.lock();
        if idle.len() >= self.config.max_idle {
            drop(idle);
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }
        idle.push(buffer);
    }

    /// Free every idle buffer
    pub fn clear(&self) {
        self.idle.lock().clear();
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            checkouts: self.checkouts.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            allocated: self.allocated.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            idle: self.idle.lock().len(),
        }
    }

    /// Whether any idle buffer still holds claims
    pub fn retains_claims(&self) -> bool {
        self.idle.lock().iter().any(|buffer| !buffer.is_empty())
    }
}

impl Default for ClaimBufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

/// Exclusively owned buffer checked out from a [`ClaimBufferPool`]
///
/// Derefs to `Vec<Claim>`. Dropping the guard clears the buffer and hands it
/// back to the pool.
pub struct PooledBuffer<'a> {
    pool: &'a ClaimBufferPool,
    buffer: Vec<Claim>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<Claim>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        self.pool.release(buffer);
    }
}

impl std::fmt::Debug for PooledBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .finish()
    }
}

/// Pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total checkouts
    pub checkouts: u64,
    /// Checkouts served from an idle buffer
    pub reused: u64,
    /// Checkouts that created a new buffer
    pub allocated: u64,
    /// Buffers freed on release instead of pooled
    pub discarded: u64,
    /// Buffers currently idle
    pub idle: usize,
}

impl PoolStats {
    /// Fraction of checkouts served from the idle list
    pub fn reuse_rate(&self) -> f64 {
        if self.checkouts == 0 {
            0.0
        } else {
            self.reused as f64 / self.checkouts as f64
        }
    }
}
