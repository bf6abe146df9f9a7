//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the codec
//! layer. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::buffer::pool::DEFAULT_MAX_IDLE;
use crate::codec::multipart::DEFAULT_MAX_MEMORY;
use crate::codec::text::DEFAULT_TEXT_FIELD;
use crate::json::JsonOptions;

/// Root configuration for the transcoding layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WireConfig {
    /// Default JSON codec, also used for `*`.
    pub json: JsonOptions,

    /// `application/x-www-form-urlencoded` codec.
    pub form: FormConfig,

    /// `application/xml` codec.
    pub xml: XmlConfig,

    /// `application/octet-stream` codec.
    pub binary: BinaryConfig,

    /// `multipart/form-data` codec.
    pub multipart: MultipartConfig,

    /// `text/plain` codec.
    pub text: TextConfig,

    /// Shared buffer pool.
    pub buffer_pool: BufferPoolConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    pub enabled: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct XmlConfig {
    pub enabled: bool,

    /// Literal indent per nesting level (e.g. `"  "`). Empty means compact.
    pub indent: String,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            indent: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BinaryConfig {
    pub enabled: bool,
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MultipartConfig {
    pub enabled: bool,

    /// In-memory budget for file parts before spilling to disk.
    pub max_memory_bytes: u64,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_memory_bytes: DEFAULT_MAX_MEMORY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TextConfig {
    pub enabled: bool,

    /// Field set from request bodies.
    pub input_field: String,

    /// Field read for response bodies.
    pub output_field: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            input_field: DEFAULT_TEXT_FIELD.to_string(),
            output_field: DEFAULT_TEXT_FIELD.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BufferPoolConfig {
    /// Maximum idle buffers retained.
    pub max_idle: usize,
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self {
            max_idle: DEFAULT_MAX_IDLE,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
