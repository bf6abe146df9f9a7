//! Content-type codecs.
//!
//! # Data Flow
//! ```text
//! request:  body bytes → Marshaler::unmarshal / decode_from → target message
//!             form, multipart: values → JsonValue tree → serde_json decode
//!             xml:             quick-xml deserialize
//!             binary:          `data` field, else bincode
//!             text:            configured string field, else `message`
//! response: Payload → Marshaler::marshal / encode_to → bytes
//! ```
//!
//! # Design Decisions
//! - Codecs hold configuration only and are shared via `Arc` across requests
//! - Every operation is synchronous and runs on the calling task
//! - Field lookups fall through to the next candidate before erroring

pub mod binary;
pub mod form;
pub mod multipart;
pub mod text;
pub mod xml;

use std::fmt;
use std::io::{Read, Write};

use crate::buffer::BufferPool;
use crate::error::CodecResult;
use crate::message::{Message, Payload};

pub use binary::BinaryMarshaler;
pub use form::FormMarshaler;
pub use multipart::MultipartMarshaler;
pub use text::TextMarshaler;
pub use xml::XmlMarshaler;

pub const MIME_JSON: &str = "application/json";
pub const MIME_FORM: &str = "application/x-www-form-urlencoded";
pub const MIME_XML: &str = "application/xml";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";
pub const MIME_MULTIPART: &str = "multipart/form-data";
pub const MIME_TEXT: &str = "text/plain";
/// Registry key used for the catch-all entry. Never matched by pattern.
pub const MIME_WILDCARD: &str = "*";

/// Converts between wire bytes of one content type and structured messages.
pub trait Marshaler: Send + Sync + fmt::Debug {
    /// MIME type this codec produces.
    fn content_type(&self) -> &'static str;

    fn marshal(&self, payload: Payload<'_>) -> CodecResult<Vec<u8>>;

    fn unmarshal(&self, data: &[u8], target: &mut dyn Message) -> CodecResult<()>;

    /// Pool used to buffer streamed bodies. `None` falls back to the global pool.
    fn buffer_pool(&self) -> Option<&BufferPool> {
        None
    }

    /// Streaming decode. Reads the whole body, then unmarshals it.
    fn decode_from(&self, reader: &mut dyn Read, target: &mut dyn Message) -> CodecResult<()> {
        let pool = self
            .buffer_pool()
            .unwrap_or_else(|| BufferPool::global().as_ref());
        let mut body = pool.acquire();
        reader.read_to_end(&mut body)?;
        self.unmarshal(&body, target)
    }

    /// Streaming encode.
    fn encode_to(&self, writer: &mut dyn Write, payload: Payload<'_>) -> CodecResult<()> {
        let bytes = self.marshal(payload)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}
