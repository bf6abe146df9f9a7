//! Codec error definitions.
//!
//! Every codec failure is returned to the immediate caller. The gateway maps
//! [`CodecError::kind`] onto a transport status; nothing in this crate retries
//! or silently switches to another codec.

use thiserror::Error;

/// Coarse classification used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request body could not be parsed in the declared content type.
    MalformedInput,
    /// The codec was handed a value it has no path for.
    UnsupportedType,
    /// The target message lacks the conventional field the codec needs.
    MissingField,
    /// I/O or encoder failure not attributable to the client.
    Internal,
}

/// Errors that can occur while marshaling or unmarshaling.
#[derive(Debug, Error)]
pub enum CodecError {
    /// URL-encoded body was not valid form syntax.
    #[error("failed to parse form data: {0}")]
    InvalidForm(String),

    /// XML encode or decode failure.
    #[error("xml: {0}")]
    Xml(String),

    /// The first line of a multipart body is not a `--boundary` delimiter.
    #[error("multipart decoder: could not detect boundary")]
    BoundaryNotFound,

    /// Multipart bodies cannot be decoded from a bare byte slice.
    #[error("multipart marshaler: use a streaming decoder for multipart data")]
    MultipartRequiresDecoder,

    /// Multipart framing or part headers were invalid.
    #[error("multipart decoder: failed to parse form: {0}")]
    MalformedMultipart(String),

    /// Non-file parts exceeded the in-memory limit.
    #[error("multipart decoder: message too large (limit {limit} bytes)")]
    MultipartTooLarge { limit: u64 },

    /// A file part could not be read back (usually from its spill file).
    #[error("multipart: failed to read file {field}: {source}")]
    FileRead {
        field: String,
        #[source]
        source: std::io::Error,
    },

    /// The codec has no encoding path for the given payload.
    #[error("{codec} marshaler: unsupported type")]
    UnsupportedType { codec: &'static str },

    /// A JSON value that cannot be rendered (e.g. a non-finite float).
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// Text marshal could not find a string field to read.
    #[error("{codec} marshaler: no string field found")]
    NoStringField { codec: &'static str },

    /// Text unmarshal could not find a string field to write.
    #[error("{codec} marshaler: no string field found to set")]
    NoStringFieldToSet { codec: &'static str },

    /// Target has no raw-bytes field and whole-message decoding failed.
    #[error("binary marshaler: {message} has no data field and binary decoding failed: {source}")]
    BinaryFallback {
        message: &'static str,
        #[source]
        source: bincode::Error,
    },

    /// Input carried a member the target message does not declare.
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary: {0}")]
    Binary(#[from] bincode::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Codec constructed with settings it cannot honour.
    #[error("invalid codec configuration: {0}")]
    InvalidConfig(String),
}

impl CodecError {
    /// Map the error onto the gateway-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::InvalidForm(_)
            | CodecError::Xml(_)
            | CodecError::BoundaryNotFound
            | CodecError::MalformedMultipart(_)
            | CodecError::MultipartTooLarge { .. }
            | CodecError::UnknownField(_)
            | CodecError::Json(_) => ErrorKind::MalformedInput,
            CodecError::UnsupportedType { .. }
            | CodecError::UnsupportedValue(_)
            | CodecError::MultipartRequiresDecoder => ErrorKind::UnsupportedType,
            CodecError::NoStringField { .. }
            | CodecError::NoStringFieldToSet { .. }
            | CodecError::BinaryFallback { .. } => ErrorKind::MissingField,
            CodecError::FileRead { .. }
            | CodecError::Binary(_)
            | CodecError::Io(_)
            | CodecError::InvalidConfig(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
