//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! codecs, registry, config loader
//!     → tracing events (debug: decode summaries, spills, path conflicts)
//!     → logging.rs subscriber (fmt layer on stderr, EnvFilter)
//! ```
//!
//! # Design Decisions
//! - Client input errors are returned, never logged above debug
//! - No metrics layer; pool counters are exposed via `BufferPool::stats`

pub mod logging;

pub use logging::init_logging;
