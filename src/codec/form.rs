//! `application/x-www-form-urlencoded` codec.
//!
//! # Field Mapping
//! - Keys are declared field names: `name=John&age=30`
//! - Dot notation nests: `address.street=123` → `{"address":{"street":123}}`
//! - Repeated keys become arrays: `tags=a&tags=b`
//! - Every value goes through [`infer_type`]
//!
//! Forms are input-only; responses are encoded as JSON.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::buffer::BufferPool;
use crate::codec::{Marshaler, MIME_FORM};
use crate::error::{CodecError, CodecResult};
use crate::json::{infer_type, marshal_json, JsonMarshaler, JsonObject, JsonOptions, JsonValue};
use crate::message::{Message, Payload};

/// Decoded form: key → values in submission order.
pub type FormValues = BTreeMap<String, Vec<String>>;

/// Handles HTML form submissions.
#[derive(Debug, Clone)]
pub struct FormMarshaler {
    output: JsonMarshaler,
    pool: Arc<BufferPool>,
}

impl FormMarshaler {
    pub fn new() -> Self {
        Self::with_pool(BufferPool::global().clone())
    }

    pub fn with_pool(pool: Arc<BufferPool>) -> Self {
        Self {
            output: JsonMarshaler::with_pool(JsonOptions::default(), pool.clone()),
            pool,
        }
    }
}

impl Default for FormMarshaler {
    fn default() -> Self {
        Self::new()
    }
}

impl Marshaler for FormMarshaler {
    fn content_type(&self) -> &'static str {
        MIME_FORM
    }

    fn marshal(&self, payload: Payload<'_>) -> CodecResult<Vec<u8>> {
        self.output.marshal(payload)
    }

    fn unmarshal(&self, data: &[u8], target: &mut dyn Message) -> CodecResult<()> {
        let values = parse_form(data)?;
        let json = values_to_json(&values, &self.pool)?;
        tracing::debug!(
            fields = values.len(),
            message = target.message_name(),
            "Decoding form body"
        );
        target.decode_json(&json)
    }

    fn buffer_pool(&self) -> Option<&BufferPool> {
        Some(&self.pool)
    }
}

/// Parse a URL-encoded body, keeping every value of repeated keys.
pub fn parse_form(data: &[u8]) -> CodecResult<FormValues> {
    check_form_syntax(data)?;

    let mut values = FormValues::new();
    for (key, value) in url::form_urlencoded::parse(data) {
        values
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    Ok(values)
}

/// The decoder itself is lenient; reject what a strict query parser would.
fn check_form_syntax(data: &[u8]) -> CodecResult<()> {
    for (i, &b) in data.iter().enumerate() {
        match b {
            b';' => {
                return Err(CodecError::InvalidForm(
                    "invalid semicolon separator in query".to_string(),
                ))
            }
            b'%' => {
                let valid = matches!(
                    data.get(i + 1..i + 3),
                    Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
                );
                if !valid {
                    let end = (i + 3).min(data.len());
                    return Err(CodecError::InvalidForm(format!(
                        "invalid URL escape {:?}",
                        String::from_utf8_lossy(&data[i..end])
                    )));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Build the nested staging tree for a set of form values.
pub fn values_to_tree(values: &FormValues) -> JsonObject {
    let mut root = JsonObject::new();
    for (key, vals) in values {
        if let Some(value) = infer_values(vals) {
            insert_path(&mut root, key, value);
        }
    }
    root
}

/// One value is inferred on its own; repeats become an array.
pub(crate) fn infer_values(vals: &[String]) -> Option<JsonValue> {
    match vals {
        [] => None,
        [single] => Some(infer_type(single)),
        many => Some(JsonValue::Array(many.iter().map(|v| infer_type(v)).collect())),
    }
}

/// Serialize the staging tree for a set of form values.
pub fn values_to_json(values: &FormValues, pool: &BufferPool) -> CodecResult<Vec<u8>> {
    marshal_json(&JsonValue::Object(values_to_tree(values)), pool)
}

/// Set `value` at a dotted `key`, creating intermediate objects.
///
/// Conflicting paths such as `a` and `a.b` are not reconciled: whichever
/// is inserted later replaces the other.
fn insert_path(root: &mut JsonObject, key: &str, value: JsonValue) {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut current = root;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| JsonValue::Object(JsonObject::new()));
        if slot.as_object().is_none() {
            tracing::debug!(key, segment, "Form path conflicts with a scalar; replacing it");
            *slot = JsonValue::Object(JsonObject::new());
        }
        let JsonValue::Object(next) = slot else {
            return;
        };
        current = next;
    }

    if let Some(JsonValue::Object(_)) = current.insert(leaf.to_string(), value) {
        tracing::debug!(key, "Form value replaced a nested object");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &[&str])]) -> FormValues {
        pairs
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    fn tree_json(values: &FormValues) -> serde_json::Value {
        let pool = BufferPool::new(1);
        serde_json::from_slice(&values_to_json(values, &pool).unwrap()).unwrap()
    }

    #[test]
    fn test_content_type() {
        assert_eq!(FormMarshaler::new().content_type(), "application/x-www-form-urlencoded");
    }

    #[test]
    fn test_parse_form_keeps_repeats() {
        let parsed = parse_form(b"tags=a&tags=b&name=John+Smith&email=j%40x.io&flag").unwrap();
        assert_eq!(parsed["tags"], vec!["a", "b"]);
        assert_eq!(parsed["name"], vec!["John Smith"]);
        assert_eq!(parsed["email"], vec!["j@x.io"]);
        assert_eq!(parsed["flag"], vec![""]);
    }

    #[test]
    fn test_parse_form_rejects_bad_syntax() {
        assert!(matches!(parse_form(b"a=%zz"), Err(CodecError::InvalidForm(_))));
        assert!(matches!(parse_form(b"a=%4"), Err(CodecError::InvalidForm(_))));
        assert!(matches!(parse_form(b"a=1;b=2"), Err(CodecError::InvalidForm(_))));
    }

    #[test]
    fn test_simple_values() {
        let json = tree_json(&values(&[("name", &["John"]), ("age", &["30"])]));
        assert_eq!(json, serde_json::json!({"name": "John", "age": 30}));
    }

    #[test]
    fn test_boolean_value() {
        let json = tree_json(&values(&[("active", &["true"])]));
        assert_eq!(json["active"], true);
    }

    #[test]
    fn test_array_values() {
        let json = tree_json(&values(&[("tags", &["a", "b", "c"])]));
        assert_eq!(json["tags"], serde_json::json!(["a", "b", "c"]));
    }

    #[test]
    fn test_nested_values() {
        let json = tree_json(&values(&[
            ("address.street", &["123"]),
            ("address.city", &["Springfield"]),
            ("a.b.c", &["1.5"]),
        ]));
        assert_eq!(json["address"]["street"], 123);
        assert_eq!(json["address"]["city"], "Springfield");
        assert_eq!(json["a"]["b"]["c"], 1.5);
    }

    #[test]
    fn test_conflicting_paths_later_wins() {
        // Sorted iteration visits `a` before `a.b`, so the nested object wins.
        let json = tree_json(&values(&[("a", &["x"]), ("a.b", &["1"])]));
        assert_eq!(json, serde_json::json!({"a": {"b": 1}}));

        let mut root = JsonObject::new();
        insert_path(&mut root, "a.b", JsonValue::Int(1));
        insert_path(&mut root, "a", JsonValue::from("x"));
        assert_eq!(root["a"], JsonValue::from("x"));
    }
}
