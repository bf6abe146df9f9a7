//! `application/octet-stream` codec.
//!
//! # Responsibilities
//! - Pass raw byte payloads through untouched
//! - Prefer a message's `data` field over whole-message encoding
//! - Fall back to bincode for messages without a `data` field

use std::sync::Arc;

use crate::buffer::BufferPool;
use crate::codec::{Marshaler, MIME_OCTET_STREAM};
use crate::error::{CodecError, CodecResult};
use crate::message::{Message, Payload};

#[derive(Debug, Clone)]
pub struct BinaryMarshaler {
    pool: Arc<BufferPool>,
}

impl BinaryMarshaler {
    pub fn new() -> Self {
        Self::with_pool(BufferPool::global().clone())
    }

    pub fn with_pool(pool: Arc<BufferPool>) -> Self {
        Self { pool }
    }
}

impl Default for BinaryMarshaler {
    fn default() -> Self {
        Self::new()
    }
}

impl Marshaler for BinaryMarshaler {
    fn content_type(&self) -> &'static str {
        MIME_OCTET_STREAM
    }

    fn marshal(&self, payload: Payload<'_>) -> CodecResult<Vec<u8>> {
        match payload {
            Payload::Bytes(bytes) => Ok(bytes.to_vec()),
            // Other populated fields are intentionally not written.
            Payload::Message(msg) => match msg.data_field() {
                Some(data) => Ok(data.to_vec()),
                None => Ok(msg.encode_binary()?),
            },
            Payload::Text(_) => Err(CodecError::UnsupportedType { codec: "binary" }),
        }
    }

    fn unmarshal(&self, data: &[u8], target: &mut dyn Message) -> CodecResult<()> {
        if let Some(field) = target.data_field_mut() {
            field.clear();
            field.extend_from_slice(data);
            return Ok(());
        }

        let message = target.message_name();
        target.decode_binary(data).map_err(|source| {
            tracing::debug!(message, error = %source, "Binary fallback decode failed");
            CodecError::BinaryFallback { message, source }
        })
    }

    fn buffer_pool(&self) -> Option<&BufferPool> {
        Some(&self.pool)
    }
}
