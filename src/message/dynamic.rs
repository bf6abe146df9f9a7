//! Schema-less message backed by a JSON object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::message::Schema;

/// A message whose fields are whatever the decoded body contained.
///
/// Useful for inspecting bodies without a compiled schema. Every string
/// member is reachable through the text accessors; there is no raw-bytes
/// field, and whole-message binary decoding is unsupported because the
/// field set is not known up front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicMessage(Map<String, Value>);

impl DynamicMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Schema for DynamicMessage {
    fn string_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Creates the member as an empty string when absent.
    fn string_field_mut(&mut self, name: &str) -> Option<&mut String> {
        let slot = self
            .0
            .entry(name.to_string())
            .or_insert_with(|| Value::String(String::new()));
        match slot {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Element text arrives as `{"$text": ..}`; unwrap it to the plain value.
    fn xml_decoded(&mut self) {
        self.0.values_mut().for_each(collapse_text_nodes);
    }
}

/// Key quick-xml uses for the character data of an element.
const XML_TEXT_KEY: &str = "$text";

fn collapse_text_nodes(value: &mut Value) {
    match value {
        Value::Object(members) => {
            if members.len() == 1 {
                if let Some(text) = members.remove(XML_TEXT_KEY) {
                    *value = text;
                    collapse_text_nodes(value);
                    return;
                }
            }
            members.values_mut().for_each(collapse_text_nodes);
        }
        Value::Array(items) => items.iter_mut().for_each(collapse_text_nodes),
        _ => {}
    }
}
