//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WireConfig (validated, immutable)
//!     → MarshalerRegistry::from_config (one shared BufferPool)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a new registry
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::WireConfig;
pub use validation::{validate_config, ValidationError};

use crate::error::CodecResult;
use crate::registry::MarshalerRegistry;

/// Wire every codec enabled in `config` into a registry.
pub fn build_registry(config: &WireConfig) -> CodecResult<MarshalerRegistry> {
    MarshalerRegistry::from_config(config)
}
