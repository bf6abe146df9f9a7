//! Structured message abstraction.
//!
//! # Responsibilities
//! - Give codecs an object-safe view of any serde message type
//! - Expose the conventional fields (`data` bytes, named strings) through
//!   explicit per-type accessors instead of name-based reflection
//! - Describe what a codec is asked to encode ([`Payload`])
//!
//! # Design Decisions
//! - Message types implement [`Schema`]; [`Message`] is blanket-implemented
//! - Decoding replaces the target wholesale; unknown JSON members are ignored
//! - Whole-message binary encoding is bincode

pub mod dynamic;
pub mod schema;

pub use dynamic::DynamicMessage;
pub use schema::{Message, Schema, DATA_FIELD, MESSAGE_FIELD};

/// The value handed to [`crate::codec::Marshaler::marshal`].
#[derive(Clone, Copy)]
pub enum Payload<'a> {
    /// A structured message.
    Message(&'a dyn Message),
    /// Raw bytes, passed through by byte-oriented codecs.
    Bytes(&'a [u8]),
    /// A plain string, passed through by text-oriented codecs.
    Text(&'a str),
}

impl Payload<'_> {
    /// Short description used in log events.
    pub fn describe(&self) -> &'static str {
        match self {
            Payload::Message(msg) => msg.message_name(),
            Payload::Bytes(_) => "bytes",
            Payload::Text(_) => "text",
        }
    }
}

impl std::fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Message(msg) => f.debug_tuple("Message").field(&msg.message_name()).finish(),
            Payload::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Payload::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Text(text)
    }
}
