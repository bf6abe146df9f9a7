//! Per-type field accessors and the object-safe message view.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};

/// Conventional name of the raw-bytes field used by the binary codec.
pub const DATA_FIELD: &str = "data";

/// Fallback string field used by the text codec.
pub const MESSAGE_FIELD: &str = "message";

/// Implemented by every message type a codec can populate.
///
/// The accessors are opt-in: a type only overrides the ones that map to a
/// field it actually declares. Names passed to the string accessors are the
/// declared (serde) field names, e.g. `"text"` or `"message"`.
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Default)]
/// struct Upload {
///     data: Vec<u8>,
///     text: String,
/// }
///
/// impl Schema for Upload {
///     fn raw_bytes(&self) -> Option<&[u8]> {
///         Some(&self.data)
///     }
///
///     fn raw_bytes_mut(&mut self) -> Option<&mut Vec<u8>> {
///         Some(&mut self.data)
///     }
///
///     fn string_field(&self, name: &str) -> Option<&str> {
///         (name == "text").then_some(self.text.as_str())
///     }
///
///     fn string_field_mut(&mut self, name: &str) -> Option<&mut String> {
///         (name == "text").then_some(&mut self.text)
///     }
/// }
/// ```
pub trait Schema: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The `data` bytes field, if declared.
    fn raw_bytes(&self) -> Option<&[u8]> {
        None
    }

    /// Mutable access to the `data` bytes field, if declared.
    fn raw_bytes_mut(&mut self) -> Option<&mut Vec<u8>> {
        None
    }

    /// A string field by declared name.
    fn string_field(&self, _name: &str) -> Option<&str> {
        None
    }

    /// Mutable access to a string field by declared name.
    fn string_field_mut(&mut self, _name: &str) -> Option<&mut String> {
        None
    }

    /// Called on a freshly XML-decoded value before it replaces the target.
    fn xml_decoded(&mut self) {}
}

/// Object-safe view of a [`Schema`] type, used by every codec.
pub trait Message: Send + Sync {
    /// Type name for log events and error messages.
    fn message_name(&self) -> &'static str;

    fn to_json_value(&self) -> CodecResult<serde_json::Value>;

    /// Replace `self` with the message decoded from JSON bytes.
    fn decode_json(&mut self, json: &[u8]) -> CodecResult<()>;

    fn decode_json_value(&mut self, value: serde_json::Value) -> CodecResult<()>;

    /// Serialize as compact XML rooted at the type name.
    fn to_xml(&self) -> CodecResult<String>;

    fn decode_xml(&mut self, xml: &str) -> CodecResult<()>;

    /// Whole-message binary encoding.
    fn encode_binary(&self) -> Result<Vec<u8>, bincode::Error>;

    fn decode_binary(&mut self, data: &[u8]) -> Result<(), bincode::Error>;

    fn data_field(&self) -> Option<&[u8]>;

    fn data_field_mut(&mut self) -> Option<&mut Vec<u8>>;

    fn named_string(&self, name: &str) -> Option<&str>;

    fn named_string_mut(&mut self, name: &str) -> Option<&mut String>;
}

impl<T: Schema> Message for T {
    fn message_name(&self) -> &'static str {
        short_type_name::<T>()
    }

    fn to_json_value(&self) -> CodecResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn decode_json(&mut self, json: &[u8]) -> CodecResult<()> {
        *self = serde_json::from_slice(json)?;
        Ok(())
    }

    fn decode_json_value(&mut self, value: serde_json::Value) -> CodecResult<()> {
        *self = serde_json::from_value(value)?;
        Ok(())
    }

    fn to_xml(&self) -> CodecResult<String> {
        let mut out = String::new();
        self.serialize(quick_xml::se::Serializer::new(&mut out))
            .map_err(|e| CodecError::Xml(e.to_string()))?;
        Ok(out)
    }

    fn decode_xml(&mut self, xml: &str) -> CodecResult<()> {
        let mut decoded: T =
            quick_xml::de::from_str(xml).map_err(|e| CodecError::Xml(e.to_string()))?;
        decoded.xml_decoded();
        *self = decoded;
        Ok(())
    }

    fn encode_binary(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    fn decode_binary(&mut self, data: &[u8]) -> Result<(), bincode::Error> {
        *self = bincode::deserialize(data)?;
        Ok(())
    }

    fn data_field(&self) -> Option<&[u8]> {
        Schema::raw_bytes(self)
    }

    fn data_field_mut(&mut self) -> Option<&mut Vec<u8>> {
        Schema::raw_bytes_mut(self)
    }

    fn named_string(&self, name: &str) -> Option<&str> {
        Schema::string_field(self, name)
    }

    fn named_string_mut(&mut self, name: &str) -> Option<&mut String> {
        Schema::string_field_mut(self, name)
    }
}

/// `my_crate::api::Widget` → `Widget`.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
