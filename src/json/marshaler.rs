//! Default structured-message ↔ JSON codec.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::sync::Arc;

use crate::buffer::BufferPool;
use crate::codec::{Marshaler, MIME_JSON};
use crate::error::{CodecError, CodecResult};
use crate::message::{Message, Payload};

/// Options for the JSON codec.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Emit declared field names; `false` rewrites keys to lowerCamelCase.
    pub use_declared_names: bool,

    /// Emit members holding null/false/zero/empty values.
    pub emit_unpopulated: bool,

    /// Literal indent per nesting level. Empty means compact output.
    pub indent: String,

    /// Ignore input members the target message does not declare.
    pub discard_unknown: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            use_declared_names: true,
            emit_unpopulated: true,
            indent: String::new(),
            discard_unknown: true,
        }
    }
}

/// Handles `application/json`. Also the response encoder for input-only codecs.
#[derive(Debug, Clone)]
pub struct JsonMarshaler {
    options: JsonOptions,
    pool: Arc<BufferPool>,
}

impl JsonMarshaler {
    pub fn new(options: JsonOptions) -> Self {
        Self::with_pool(options, BufferPool::global().clone())
    }

    pub fn with_pool(options: JsonOptions, pool: Arc<BufferPool>) -> Self {
        Self { options, pool }
    }

    pub fn options(&self) -> &JsonOptions {
        &self.options
    }
}

impl Default for JsonMarshaler {
    fn default() -> Self {
        Self::new(JsonOptions::default())
    }
}

impl Marshaler for JsonMarshaler {
    fn content_type(&self) -> &'static str {
        MIME_JSON
    }

    fn marshal(&self, payload: Payload<'_>) -> CodecResult<Vec<u8>> {
        let mut value = match payload {
            Payload::Message(msg) => msg.to_json_value()?,
            Payload::Text(text) => Value::String(text.to_string()),
            Payload::Bytes(_) => return Err(CodecError::UnsupportedType { codec: "json" }),
        };

        if !self.options.use_declared_names {
            rename_keys(&mut value, &to_lower_camel);
        }
        if !self.options.emit_unpopulated {
            prune_unpopulated(&mut value);
        }

        let mut buf = self.pool.acquire();
        if self.options.indent.is_empty() {
            serde_json::to_writer(&mut *buf, &value)?;
        } else {
            let formatter = PrettyFormatter::with_indent(self.options.indent.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut *buf, formatter);
            value.serialize(&mut ser)?;
        }
        Ok(buf.to_vec())
    }

    /// On error the target's contents are unspecified.
    fn unmarshal(&self, data: &[u8], target: &mut dyn Message) -> CodecResult<()> {
        let mut value: Value = serde_json::from_slice(data)?;
        if !self.options.use_declared_names {
            rename_keys(&mut value, &to_snake_case);
        }

        let input = (!self.options.discard_unknown).then(|| value.clone());
        target.decode_json_value(value)?;

        if let Some(input) = input {
            let known = target.to_json_value()?;
            if let Some(path) = find_unknown(&input, &known, "") {
                return Err(CodecError::UnknownField(path));
            }
        }
        Ok(())
    }

    fn buffer_pool(&self) -> Option<&BufferPool> {
        Some(&self.pool)
    }
}

fn rename_keys(value: &mut Value, rename: &dyn Fn(&str) -> String) {
    match value {
        Value::Object(members) => {
            let old = std::mem::take(members);
            for (key, mut item) in old {
                rename_keys(&mut item, rename);
                members.insert(rename(&key), item);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| rename_keys(item, rename)),
        _ => {}
    }
}

/// `user_name` → `userName`.
fn to_lower_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// `userName` → `user_name`.
fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn is_unpopulated(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

fn prune_unpopulated(value: &mut Value) {
    match value {
        Value::Object(members) => {
            members.retain(|_, item| !is_unpopulated(item));
            members.values_mut().for_each(prune_unpopulated);
        }
        Value::Array(items) => items.iter_mut().for_each(prune_unpopulated),
        _ => {}
    }
}

/// First input member (as a dotted path) with no counterpart in `known`.
fn find_unknown(input: &Value, known: &Value, prefix: &str) -> Option<String> {
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}.{segment}")
        }
    };

    match (input, known) {
        (Value::Object(members), Value::Object(declared)) => {
            for (key, item) in members {
                match declared.get(key) {
                    Some(declared_item) => {
                        if let Some(path) = find_unknown(item, declared_item, &join(key)) {
                            return Some(path);
                        }
                    }
                    // Optional members that were skipped on output look absent.
                    None if item.is_null() => {}
                    None => return Some(join(key)),
                }
            }
            None
        }
        (Value::Array(items), Value::Array(declared)) => items
            .iter()
            .zip(declared)
            .enumerate()
            .find_map(|(i, (item, declared_item))| {
                find_unknown(item, declared_item, &join(&i.to_string()))
            }),
        _ => None,
    }
}
