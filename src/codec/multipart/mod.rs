//! `multipart/form-data` codec for file uploads.
//!
//! # Field Mapping
//! ```text
//! value part  name=count        → "count": 3          (type inference)
//! file part   name=file         → "file_data": [..]   (raw bytes)
//!                                 "file_name": "a.png"
//!                                 "file_type": "image/png" (if declared)
//! ```
//!
//! A message receiving uploads declares the matching fields:
//!
//! ```ignore
//! #[derive(Serialize, Deserialize, Default)]
//! struct UploadRequest {
//!     name: String,
//!     file_data: Vec<u8>,
//!     file_name: String,
//!     file_type: String,
//! }
//! ```
//!
//! # Design Decisions
//! - The boundary is taken from the body's first line; direct byte
//!   `unmarshal` is refused because it cannot know the boundary
//! - Callers holding the `Content-Type` header can use
//!   [`MultipartMarshaler::unmarshal_with_boundary`] instead
//! - Only the first file of a field is mapped
//! - Responses are encoded as JSON

pub mod boundary;
pub mod form;

use std::io::Read;
use std::sync::Arc;

use crate::buffer::BufferPool;
use crate::codec::{Marshaler, MIME_MULTIPART};
use crate::error::{CodecError, CodecResult};
use crate::json::{marshal_json, JsonMarshaler, JsonOptions, JsonValue};
use crate::message::{Message, Payload};

pub use boundary::{boundary_from_content_type, detect_boundary};
pub use form::{multipart_to_tree, parse_multipart, FilePart, MultipartForm};

/// Default in-memory budget for file parts (32 MiB).
pub const DEFAULT_MAX_MEMORY: u64 = 32 << 20;

#[derive(Debug, Clone)]
pub struct MultipartMarshaler {
    max_memory: u64,
    output: JsonMarshaler,
    pool: Arc<BufferPool>,
}

impl MultipartMarshaler {
    pub fn new() -> Self {
        Self::with_max_memory(DEFAULT_MAX_MEMORY)
    }

    /// Zero selects [`DEFAULT_MAX_MEMORY`].
    pub fn with_max_memory(max_memory: u64) -> Self {
        let pool = BufferPool::global().clone();
        Self {
            max_memory: if max_memory == 0 {
                DEFAULT_MAX_MEMORY
            } else {
                max_memory
            },
            output: JsonMarshaler::with_pool(JsonOptions::default(), pool.clone()),
            pool,
        }
    }

    pub fn with_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.output = JsonMarshaler::with_pool(self.output.options().clone(), pool.clone());
        self.pool = pool;
        self
    }

    pub fn max_memory(&self) -> u64 {
        self.max_memory
    }

    /// Decode a complete body whose boundary is already known.
    pub fn unmarshal_with_boundary(
        &self,
        body: &[u8],
        boundary: &str,
        target: &mut dyn Message,
    ) -> CodecResult<()> {
        let form = parse_multipart(body, boundary, self.max_memory)?;
        let tree = multipart_to_tree(&form)?;
        tracing::debug!(
            values = form.values.len(),
            files = form.files.len(),
            message = target.message_name(),
            "Decoding multipart body"
        );

        let json = marshal_json(&JsonValue::Object(tree), &self.pool)?;
        target.decode_json(&json)
    }
}

impl Default for MultipartMarshaler {
    fn default() -> Self {
        Self::new()
    }
}

impl Marshaler for MultipartMarshaler {
    fn content_type(&self) -> &'static str {
        MIME_MULTIPART
    }

    fn marshal(&self, payload: Payload<'_>) -> CodecResult<Vec<u8>> {
        self.output.marshal(payload)
    }

    fn unmarshal(&self, _data: &[u8], _target: &mut dyn Message) -> CodecResult<()> {
        Err(CodecError::MultipartRequiresDecoder)
    }

    fn buffer_pool(&self) -> Option<&BufferPool> {
        Some(&self.pool)
    }

    fn decode_from(&self, reader: &mut dyn Read, target: &mut dyn Message) -> CodecResult<()> {
        let mut body = self.pool.acquire();
        reader.read_to_end(&mut body)?;
        let boundary = detect_boundary(&body).ok_or(CodecError::BoundaryNotFound)?;
        self.unmarshal_with_boundary(&body, boundary, target)
    }
}
