//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (memory limits > 0, pool size > 0)
//! - Reject text field names that cannot name a message field
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WireConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::WireConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem, tagged with the offending key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &WireConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.multipart.max_memory_bytes == 0 {
        errors.push(ValidationError::new(
            "multipart.max_memory_bytes",
            "must be greater than 0",
        ));
    }

    for (field, name) in [
        ("text.input_field", &config.text.input_field),
        ("text.output_field", &config.text.output_field),
    ] {
        if !is_field_name(name) {
            errors.push(ValidationError::new(
                field,
                format!("{name:?} is not a valid field name"),
            ));
        }
    }

    if config.buffer_pool.max_idle == 0 {
        errors.push(ValidationError::new(
            "buffer_pool.max_idle",
            "must be greater than 0",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Declared message field names: an identifier, never empty.
fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
