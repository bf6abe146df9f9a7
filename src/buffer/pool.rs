//! Synchronized byte-buffer pool.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Buffers whose capacity exceeds this at release time are not retained.
pub const MAX_POOLED_CAPACITY: usize = 64 * 1024;

/// Default number of idle buffers kept by a pool.
pub const DEFAULT_MAX_IDLE: usize = 64;

/// Initial capacity of freshly allocated buffers.
const INITIAL_CAPACITY: usize = 512;

static GLOBAL_POOL: OnceLock<Arc<BufferPool>> = OnceLock::new();

/// Counters describing pool effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Acquisitions served from an idle buffer.
    pub hits: u64,
    /// Acquisitions that had to allocate.
    pub misses: u64,
    /// Releases dropped because the buffer was oversized or the pool full.
    pub discarded: u64,
}

/// A thread-safe pool of `Vec<u8>` buffers.
#[derive(Debug)]
pub struct BufferPool {
    idle: Mutex<Vec<Vec<u8>>>,
    max_idle: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    discarded: AtomicU64,
}

impl BufferPool {
    /// Create a pool retaining at most `max_idle` buffers.
    pub fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    /// The process-wide pool. Created on first use and never torn down.
    pub fn global() -> &'static Arc<BufferPool> {
        GLOBAL_POOL.get_or_init(|| Arc::new(BufferPool::default()))
    }

    /// Take an empty buffer from the pool.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let reused = self.idle.lock().pop();
        let buf = match reused {
            Some(buf) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Vec::with_capacity(INITIAL_CAPACITY)
            }
        };
        PooledBuffer { buf, pool: self }
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }
        buf.clear();

        let mut idle = self.idle.lock();
        if idle.len() >= self.max_idle {
            drop(idle);
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }
        idle.push(buf);
    }

    /// Number of buffers currently idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

/// A buffer on loan from a [`BufferPool`]. Returned to the pool on drop.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl PooledBuffer<'_> {
    /// Copy the contents out; the buffer itself stays with the pool.
    pub fn to_vec(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
