//! JSON staging tree and the default JSON codec.
//!
//! # Data Flow
//! ```text
//! form / multipart values (strings)
//!     → infer.rs (bool | int | float | string)
//!     → value.rs (JsonValue tree, written with the pooled builder)
//!     → serde_json decode into the target message
//!
//! responses without a dedicated codec:
//!     message → marshaler.rs (naming, pruning, indentation) → bytes
//! ```
//!
//! # Design Decisions
//! - The staging tree is a closed enum; the writer matches it exhaustively
//! - Object keys live in a `BTreeMap`; callers must not rely on key order
//! - Type inference never fails: anything unparseable stays a string

pub mod infer;
pub mod marshaler;
pub mod value;

pub use infer::infer_type;
pub use marshaler::{JsonMarshaler, JsonOptions};
pub use value::{marshal_json, write_json, JsonObject, JsonValue};
