//! Wire-format transcoding for a request gateway.
//!
//! Converts inbound bodies (URL-encoded forms, XML, raw binary, multipart
//! uploads, plain text, JSON) into typed messages and encodes messages back
//! into those formats for responses.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod json;
pub mod message;
pub mod observability;
pub mod registry;

pub use buffer::BufferPool;
pub use codec::Marshaler;
pub use config::WireConfig;
pub use error::{CodecError, CodecResult, ErrorKind};
pub use message::{DynamicMessage, Message, Payload, Schema};
pub use registry::MarshalerRegistry;
