//! `text/plain` codec.

use std::sync::Arc;

use crate::buffer::BufferPool;
use crate::codec::{Marshaler, MIME_TEXT};
use crate::error::{CodecError, CodecResult};
use crate::message::{Message, Payload, MESSAGE_FIELD};

/// Default field populated from, and read for, plain text bodies.
pub const DEFAULT_TEXT_FIELD: &str = "text";

const CODEC: &str = "text";

/// Maps a plain text body onto a single string field.
///
/// Requests set `input_field` (default `text`), falling back to `message`.
/// Responses read `output_field` (default `text`), falling back to `message`;
/// a plain string payload is written as-is.
#[derive(Debug, Clone)]
pub struct TextMarshaler {
    input_field: String,
    output_field: String,
    pool: Arc<BufferPool>,
}

impl TextMarshaler {
    pub fn new() -> Self {
        Self::with_fields(DEFAULT_TEXT_FIELD, DEFAULT_TEXT_FIELD)
    }

    /// Empty names select the default field.
    pub fn with_fields(input_field: impl Into<String>, output_field: impl Into<String>) -> Self {
        Self {
            input_field: or_default_field(input_field.into()),
            output_field: or_default_field(output_field.into()),
            pool: BufferPool::global().clone(),
        }
    }

    pub fn with_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = pool;
        self
    }

    pub fn input_field(&self) -> &str {
        &self.input_field
    }

    pub fn output_field(&self) -> &str {
        &self.output_field
    }
}

impl Default for TextMarshaler {
    fn default() -> Self {
        Self::new()
    }
}

fn or_default_field(name: String) -> String {
    if name.is_empty() {
        DEFAULT_TEXT_FIELD.to_string()
    } else {
        name
    }
}

impl Marshaler for TextMarshaler {
    fn content_type(&self) -> &'static str {
        MIME_TEXT
    }

    fn marshal(&self, payload: Payload<'_>) -> CodecResult<Vec<u8>> {
        match payload {
            Payload::Message(msg) => msg
                .named_string(&self.output_field)
                .or_else(|| msg.named_string(MESSAGE_FIELD))
                .map(|text| text.as_bytes().to_vec())
                .ok_or(CodecError::NoStringField { codec: CODEC }),
            Payload::Text(text) => Ok(text.as_bytes().to_vec()),
            Payload::Bytes(_) => Err(CodecError::NoStringField { codec: CODEC }),
        }
    }

    fn unmarshal(&self, data: &[u8], target: &mut dyn Message) -> CodecResult<()> {
        let text = String::from_utf8_lossy(data).into_owned();

        if let Some(slot) = target.named_string_mut(&self.input_field) {
            *slot = text;
            return Ok(());
        }
        if let Some(slot) = target.named_string_mut(MESSAGE_FIELD) {
            *slot = text;
            return Ok(());
        }

        Err(CodecError::NoStringFieldToSet { codec: CODEC })
    }

    fn buffer_pool(&self) -> Option<&BufferPool> {
        Some(&self.pool)
    }
}
