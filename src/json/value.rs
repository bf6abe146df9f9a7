//! Untyped JSON tree and its minimal writer.

use std::collections::BTreeMap;
use std::io::Write;

use crate::buffer::BufferPool;
use crate::error::{CodecError, CodecResult};

/// Object members of a [`JsonValue`].
pub type JsonObject = BTreeMap<String, JsonValue>;

/// Intermediate value staged before decoding into a message.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(JsonObject),
}

impl JsonValue {
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        JsonValue::Bool(v)
    }
}

impl From<i64> for JsonValue {
    fn from(v: i64) -> Self {
        JsonValue::Int(v)
    }
}

impl From<f64> for JsonValue {
    fn from(v: f64) -> Self {
        JsonValue::Float(v)
    }
}

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        JsonValue::String(v.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        JsonValue::String(v)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(v: Vec<JsonValue>) -> Self {
        JsonValue::Array(v)
    }
}

impl From<JsonObject> for JsonValue {
    fn from(v: JsonObject) -> Self {
        JsonValue::Object(v)
    }
}

/// Render `value` into a pooled buffer and return a copy of the bytes.
pub fn marshal_json(value: &JsonValue, pool: &BufferPool) -> CodecResult<Vec<u8>> {
    let mut buf = pool.acquire();
    write_json(&mut *buf, value)?;
    // The buffer goes back to the pool; hand out an owned copy.
    Ok(buf.to_vec())
}

/// Recursively write `value` as JSON.
pub fn write_json<W: Write>(w: &mut W, value: &JsonValue) -> CodecResult<()> {
    match value {
        JsonValue::Null => w.write_all(b"null")?,
        JsonValue::Bool(true) => w.write_all(b"true")?,
        JsonValue::Bool(false) => w.write_all(b"false")?,
        JsonValue::Int(int) => write!(w, "{int}")?,
        JsonValue::Float(float) => write_float(w, *float)?,
        JsonValue::String(s) => write_string(w, s)?,
        JsonValue::Array(items) => {
            w.write_all(b"[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    w.write_all(b",")?;
                }
                write_json(w, item)?;
            }
            w.write_all(b"]")?;
        }
        JsonValue::Object(members) => {
            w.write_all(b"{")?;
            for (i, (key, item)) in members.iter().enumerate() {
                if i > 0 {
                    w.write_all(b",")?;
                }
                write_string(w, key)?;
                w.write_all(b":")?;
                write_json(w, item)?;
            }
            w.write_all(b"}")?;
        }
    }
    Ok(())
}

/// Shortest round-trip digits; exponent form outside `[1e-4, 1e21)`.
fn write_float<W: Write>(w: &mut W, float: f64) -> CodecResult<()> {
    if !float.is_finite() {
        return Err(CodecError::UnsupportedValue(format!("non-finite float {float}")));
    }
    let abs = float.abs();
    if abs != 0.0 && !(1e-4..1e21).contains(&abs) {
        write!(w, "{float:e}")?;
    } else {
        write!(w, "{float}")?;
    }
    Ok(())
}

fn write_string<W: Write>(w: &mut W, s: &str) -> CodecResult<()> {
    w.write_all(b"\"")?;
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let escape: &[u8] = match b {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x00..=0x1f => {
                w.write_all(&bytes[start..i])?;
                write!(w, "\\u{b:04x}")?;
                start = i + 1;
                continue;
            }
            _ => continue,
        };
        w.write_all(&bytes[start..i])?;
        w.write_all(escape)?;
        start = i + 1;
    }
    w.write_all(&bytes[start..])?;
    w.write_all(b"\"")?;
    Ok(())
}
