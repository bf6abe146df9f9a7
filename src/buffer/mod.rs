//! Reusable byte buffers.
//!
//! # Data Flow
//! ```text
//! codec call
//!     → pool.acquire() (reuse idle buffer or allocate)
//!     → body read / JSON tree written into PooledBuffer
//!     → result copied out
//!     → guard dropped: buffer cleared and returned (or discarded if > 64 KiB)
//! ```
//!
//! # Design Decisions
//! - Release happens in `Drop`, so error paths return buffers too
//! - A pool is an explicit object handed to codecs; `BufferPool::global()`
//!   is the process-wide instance used when none is injected
//! - Oversized buffers are dropped to bound retained memory

pub mod pool;

pub use pool::{BufferPool, PoolStats, PooledBuffer, MAX_POOLED_CAPACITY};
